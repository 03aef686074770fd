use std::collections::HashMap;

use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Request;
use sha1::{Digest, Sha1};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::error::ValidationError;
use crate::http::upload_url_pool::UploadGrant;
use crate::http::{
    build_request, header_name, header_value, Error, Escape, CONTENT_SHA1_HEADER, DEFAULT_CONTENT_TYPE,
    FILE_NAME_HEADER, INFO_HEADER_PREFIX, MAX_FILE_INFO,
};

/// Parameters of `b2_upload_file`. The content is passed separately.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UploadFileRequest {
    /// Name of the file, UTF-8. Percent-encoded for transport.
    pub file_name: String,
    /// MIME type of the content. When absent the service guesses it from the file name.
    pub content_type: Option<String>,
    /// Custom metadata, at most 10 entries.
    pub file_info: HashMap<String, String>,
}

impl UploadFileRequest {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.file_info.insert(key.into(), value.into());
        self
    }

    /// Checks the name, then the presence of `data`, then the info count.
    pub(crate) fn validate<R>(&self, data: Option<R>) -> Result<R, ValidationError> {
        if self.file_name.is_empty() {
            return Err(ValidationError::MissingFileName);
        }
        let data = data.ok_or(ValidationError::MissingFileData)?;
        if self.file_info.len() > MAX_FILE_INFO {
            return Err(ValidationError::TooManyFileInfo(self.file_info.len()));
        }
        Ok(data)
    }
}

/// Upload content read into memory along with its hex encoded SHA-1.
pub(crate) struct Payload {
    pub(crate) data: Vec<u8>,
    pub(crate) sha1: String,
}

/// Reads `data` to the end once, hashing while buffering.
pub(crate) async fn read_payload<R: AsyncRead + Unpin>(mut data: R) -> Result<Payload, Error> {
    let mut buffer = Vec::new();
    let mut hasher = Sha1::new();
    let mut chunk = [0u8; 8 * 1024];
    loop {
        let read = data.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
        buffer.extend_from_slice(&chunk[..read]);
    }
    Ok(Payload {
        data: buffer,
        sha1: hex::encode(hasher.finalize()),
    })
}

pub(crate) fn build(grant: &UploadGrant, req: &UploadFileRequest, payload: Payload) -> Result<Request, Error> {
    let mut request = build_request("POST", &grant.upload_url, Some(&grant.authorization_token))?;
    let headers = request.headers_mut();
    headers.insert(
        header_name(FILE_NAME_HEADER)?,
        header_value(FILE_NAME_HEADER, &req.file_name.escape())?,
    );
    let content_type = req.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
    headers.insert(CONTENT_TYPE, header_value(CONTENT_TYPE.as_str(), content_type)?);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(payload.data.len()));
    headers.insert(
        header_name(CONTENT_SHA1_HEADER)?,
        header_value(CONTENT_SHA1_HEADER, &payload.sha1)?,
    );

    let mut info: Vec<_> = req.file_info.iter().collect();
    info.sort();
    for (key, value) in info {
        let name = format!("{INFO_HEADER_PREFIX}{}", key.escape_component());
        headers.insert(header_name(&name)?, header_value(&name, &value.escape_component())?);
    }

    *request.body_mut() = Some(payload.data.into());
    Ok(request)
}

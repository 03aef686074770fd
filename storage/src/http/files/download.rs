use std::collections::HashMap;
use std::str::FromStr;

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Request, Response, StatusCode};

use crate::http::account::Credential;
use crate::http::buckets::Bucket;
use crate::http::error::ValidationError;
use crate::http::files::{Action, File, FileMeta};
use crate::http::{
    build_request, decode_error, info_headers, unescape, Error, Escape, API_PATH, CONTENT_SHA1_HEADER,
    FILE_ID_HEADER, FILE_NAME_HEADER, UPLOAD_TIMESTAMP_HEADER,
};

/// Public buckets are read anonymously; private ones with the account token.
fn token<'a>(credential: &'a Credential, bucket: &Bucket) -> Option<&'a str> {
    if bucket.is_public() {
        tracing::trace!("anonymous download from public bucket {}", bucket.bucket_name);
        None
    } else {
        Some(&credential.authorization_token)
    }
}

pub(crate) fn build_by_name(credential: &Credential, bucket: &Bucket, file_name: &str) -> Result<Request, Error> {
    if file_name.is_empty() {
        return Err(ValidationError::MissingFileName.into());
    }
    if file_name.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(ValidationError::RelativePathSegment(file_name.to_string()).into());
    }
    let url = credential.download(&format!("file/{}/{}", bucket.bucket_name.escape(), file_name.escape()));
    build_request("GET", &url, token(credential, bucket))
}

pub(crate) fn build_by_id(credential: &Credential, bucket: &Bucket, file_id: &str) -> Result<Request, Error> {
    let url = credential.download(&format!(
        "{}/b2_download_file_by_id?fileId={}",
        API_PATH.trim_start_matches('/'),
        file_id.escape_component()
    ));
    build_request("GET", &url, token(credential, bucket))
}

/// Reads the file metadata out of the download headers and keeps the body as the file content.
pub(crate) async fn decode_file(response: Response, bucket_id: &str) -> Result<File, Error> {
    if response.status() != StatusCode::OK {
        let body = response.bytes().await?;
        return Err(decode_error(&body));
    }
    let meta = meta_from_headers(response.headers(), bucket_id)?;
    let data = response.bytes().await?;
    let meta = FileMeta {
        size: data.len() as u64,
        content_length: if meta.content_length == 0 {
            data.len() as u64
        } else {
            meta.content_length
        },
        ..meta
    };
    Ok(File { meta, data })
}

/// Reverse of the upload header encoding.
pub fn meta_from_headers(headers: &HeaderMap, bucket_id: &str) -> Result<FileMeta, Error> {
    let file_info: HashMap<String, String> = info_headers(headers)
        .into_iter()
        .map(|(k, v)| -> Result<_, Error> { Ok((unescape(&k)?, unescape(&v)?)) })
        .collect::<Result<_, _>>()?;

    Ok(FileMeta {
        file_id: header(headers, FILE_ID_HEADER)?.unwrap_or_default().to_string(),
        file_name: header(headers, FILE_NAME_HEADER)?
            .map(unescape)
            .transpose()?
            .unwrap_or_default(),
        bucket_id: bucket_id.to_string(),
        size: 0,
        content_length: parsed(headers, CONTENT_LENGTH.as_str())?.unwrap_or_default(),
        content_sha1: header(headers, CONTENT_SHA1_HEADER)?.unwrap_or_default().to_string(),
        content_type: header(headers, CONTENT_TYPE.as_str())?.unwrap_or_default().to_string(),
        action: Action::Upload,
        file_info,
        upload_timestamp: parsed(headers, UPLOAD_TIMESTAMP_HEADER)?.unwrap_or_default(),
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, Error> {
    headers
        .get(name)
        .map(|v| v.to_str().map_err(|_| Error::MalformedHeader(name.to_string())))
        .transpose()
}

fn parsed<T: FromStr>(headers: &HeaderMap, name: &str) -> Result<Option<T>, Error> {
    header(headers, name)?
        .map(|v| v.parse().map_err(|_| Error::MalformedHeader(name.to_string())))
        .transpose()
}

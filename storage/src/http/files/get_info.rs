use reqwest::Request;

use crate::http::account::Credential;
use crate::http::error::ValidationError;
use crate::http::{build_json_request, Error};

/// Request message for `b2_get_file_info`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetFileInfoRequest {
    pub file_id: String,
}

pub(crate) fn build(credential: &Credential, req: &GetFileInfoRequest) -> Result<Request, Error> {
    if req.file_id.is_empty() {
        return Err(ValidationError::MissingFileId.into());
    }
    build_json_request(
        "POST",
        &credential.api("b2_get_file_info"),
        req,
        Some(&credential.authorization_token),
    )
}

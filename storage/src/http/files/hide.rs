use reqwest::Request;

use crate::http::account::Credential;
use crate::http::error::ValidationError;
use crate::http::{build_json_request, Error};

/// Request message for `b2_hide_file`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HideFileRequest {
    pub bucket_id: String,
    pub file_name: String,
}

pub(crate) fn build(credential: &Credential, req: &HideFileRequest) -> Result<Request, Error> {
    if req.file_name.is_empty() {
        return Err(ValidationError::MissingFileName.into());
    }
    build_json_request(
        "POST",
        &credential.api("b2_hide_file"),
        req,
        Some(&credential.authorization_token),
    )
}

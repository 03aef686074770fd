use reqwest::Request;

use crate::http::account::Credential;
use crate::http::error::ValidationError;
use crate::http::{build_json_request, Error};

/// Request message for `b2_delete_file_version`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileVersionRequest {
    pub file_name: String,
    pub file_id: String,
}

/// The version that was deleted.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFile {
    pub file_id: String,
    pub file_name: String,
}

pub(crate) fn build(credential: &Credential, req: &DeleteFileVersionRequest) -> Result<Request, Error> {
    if req.file_name.is_empty() {
        return Err(ValidationError::MissingFileName.into());
    }
    if req.file_id.is_empty() {
        return Err(ValidationError::MissingFileId.into());
    }
    build_json_request(
        "POST",
        &credential.api("b2_delete_file_version"),
        req,
        Some(&credential.authorization_token),
    )
}

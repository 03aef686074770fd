use reqwest::Request;

use crate::http::account::Credential;
use crate::http::{build_json_request, Error};

/// Request message for `b2_get_upload_url`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetUploadUrlRequest {
    pub bucket_id: String,
}

/// An upload url as returned by the service. It carries no expiry.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetUploadUrlResponse {
    pub bucket_id: String,
    pub upload_url: String,
    pub authorization_token: String,
}

pub(crate) fn build(credential: &Credential, req: &GetUploadUrlRequest) -> Result<Request, Error> {
    build_json_request(
        "POST",
        &credential.api("b2_get_upload_url"),
        req,
        Some(&credential.authorization_token),
    )
}

use reqwest::Request;

use crate::http::account::Credential;
use crate::http::buckets::{AccountScoped, Bucket};
use crate::http::{build_json_request, Error};

/// Request message for `b2_list_buckets`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsRequest {
    /// Only return the bucket with this id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    /// Only return the bucket with this name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
}

#[derive(Clone, serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsResponse {
    pub buckets: Vec<Bucket>,
}

pub(crate) fn build(credential: &Credential, req: &ListBucketsRequest) -> Result<Request, Error> {
    let body = AccountScoped {
        account_id: &credential.account_id,
        inner: req,
    };
    build_json_request(
        "POST",
        &credential.api("b2_list_buckets"),
        &body,
        Some(&credential.authorization_token),
    )
}

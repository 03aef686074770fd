use reqwest::Request;

use crate::http::account::Credential;
use crate::http::buckets::{AccountScoped, BucketType};
use crate::http::{build_json_request, Error};

/// Request message for `b2_update_bucket`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBucketRequest {
    pub bucket_id: String,
    pub bucket_type: BucketType,
}

pub(crate) fn build(credential: &Credential, req: &UpdateBucketRequest) -> Result<Request, Error> {
    let body = AccountScoped {
        account_id: &credential.account_id,
        inner: req,
    };
    build_json_request(
        "POST",
        &credential.api("b2_update_bucket"),
        &body,
        Some(&credential.authorization_token),
    )
}

use reqwest::Request;

use crate::http::account::Credential;
use crate::http::buckets::{AccountScoped, BucketType};
use crate::http::{build_json_request, Error};

/// Request message for `b2_create_bucket`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketRequest {
    /// Bucket names are globally unique, 6 to 50 characters of letters, digits and `-`.
    pub bucket_name: String,
    pub bucket_type: BucketType,
}

pub(crate) fn build(credential: &Credential, req: &CreateBucketRequest) -> Result<Request, Error> {
    let body = AccountScoped {
        account_id: &credential.account_id,
        inner: req,
    };
    build_json_request(
        "POST",
        &credential.api("b2_create_bucket"),
        &body,
        Some(&credential.authorization_token),
    )
}

use reqwest::Request;

use crate::http::account::Credential;
use crate::http::buckets::AccountScoped;
use crate::http::{build_json_request, Error};

/// Request message for `b2_delete_bucket`. The bucket must not contain any file versions.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBucketRequest {
    pub bucket_id: String,
}

pub(crate) fn build(credential: &Credential, req: &DeleteBucketRequest) -> Result<Request, Error> {
    let body = AccountScoped {
        account_id: &credential.account_id,
        inner: req,
    };
    build_json_request(
        "POST",
        &credential.api("b2_delete_bucket"),
        &body,
        Some(&credential.authorization_token),
    )
}

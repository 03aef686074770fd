use std::sync::Arc;

use crate::http::upload_url_pool::UploadUrlPool;

pub mod create;
pub mod delete;
pub mod get_upload_url;
pub mod list;
pub mod update;

/// A bucket.
///
/// Clones share the same upload url pool.
#[derive(Clone, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// The account that owns the bucket.
    #[serde(default)]
    pub account_id: String,
    /// The unique identifier of the bucket.
    pub bucket_id: String,
    /// The globally unique name of the bucket.
    pub bucket_name: String,
    /// Whether files can be read without authorization.
    pub bucket_type: BucketType,
    /// Upload grants fetched for this bucket.
    #[serde(skip)]
    pub upload_urls: Arc<UploadUrlPool>,
}

impl Bucket {
    pub fn is_public(&self) -> bool {
        self.bucket_type == BucketType::AllPublic
    }

    /// Replaces the fields reported by the service, keeping the upload url pool.
    pub(crate) fn refresh(&mut self, other: Bucket) {
        self.account_id = other.account_id;
        self.bucket_id = other.bucket_id;
        self.bucket_name = other.bucket_name;
        self.bucket_type = other.bucket_type;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub enum BucketType {
    /// Reading files requires the account authorization token.
    #[default]
    AllPrivate,
    /// Anybody may download files.
    AllPublic,
    Snapshot,
    /// A type this client does not know. Can not be sent back to the service.
    #[serde(other, skip_serializing)]
    Unknown,
}

/// Prefixes a request body with the account id of the credential.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountScoped<'a, T> {
    pub(crate) account_id: &'a str,
    #[serde(flatten)]
    pub(crate) inner: &'a T,
}

use std::collections::HashMap;

use bytes::Bytes;

pub mod delete_version;
pub mod download;
pub mod get_info;
pub mod hide;
pub mod list;
pub mod upload;

/// Metadata of a single file version.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    /// The unique identifier of this version of the file.
    pub file_id: String,
    pub file_name: String,
    /// The bucket the file was listed, uploaded or downloaded through.
    #[serde(default)]
    pub bucket_id: String,
    /// Stored size in bytes. Zero for hide markers.
    #[serde(default)]
    pub size: u64,
    /// Number of bytes of file content.
    #[serde(default)]
    pub content_length: u64,
    /// Lower-case hex SHA-1 of the content. `none` for large files.
    #[serde(default, deserialize_with = "crate::http::null_as_default")]
    pub content_sha1: String,
    #[serde(default, deserialize_with = "crate::http::null_as_default")]
    pub content_type: String,
    #[serde(default)]
    pub action: Action,
    /// Custom metadata sent as `X-Bz-Info-*` headers on upload.
    #[serde(default, deserialize_with = "crate::http::null_as_default")]
    pub file_info: HashMap<String, String>,
    /// Milliseconds since the unix epoch.
    #[serde(default)]
    pub upload_timestamp: i64,
}

impl FileMeta {
    pub(crate) fn in_bucket(mut self, bucket_id: &str) -> Self {
        if self.bucket_id.is_empty() {
            self.bucket_id = bucket_id.to_string();
        }
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// A stored version of the file.
    #[default]
    Upload,
    /// A marker hiding the file from name listings.
    Hide,
    /// A large file that has been started but not finished.
    Start,
}

/// A downloaded file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct File {
    pub meta: FileMeta,
    pub data: Bytes,
}

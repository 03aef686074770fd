#![allow(clippy::result_large_err)]
//! # b2-storage
//!
//! Backblaze B2 Cloud Storage client library.
//!
//! * [About B2 Cloud Storage](https://www.backblaze.com/cloud-storage)
//! * [Native API Documentation](https://www.backblaze.com/apidocs/introduction-to-the-b2-native-api)
//!
//! ## Quick Start
//!
//! ### Authorization
//!
//! Every client starts by authorizing an application key. The resulting credential holds the
//! account token and the urls of the api and download servers.
//!
//! ```
//! use b2_storage::client::{Client, ClientConfig};
//!
//! async fn run() {
//!     let client = Client::authorize(ClientConfig::default(), "key id", "application key").await.unwrap();
//! }
//! ```
//!
//! `Client::authorize_from_env` reads the key from `B2_APPLICATION_KEY_ID` and `B2_APPLICATION_KEY`.
//!
//! ### Usage
//!
//! ```
//! use b2_storage::client::Client;
//! use b2_storage::http::Error;
//! use b2_storage::http::buckets::BucketType;
//! use b2_storage::http::buckets::create::CreateBucketRequest;
//! use b2_storage::http::files::list::ListFileNamesRequest;
//! use b2_storage::http::files::upload::UploadFileRequest;
//!
//! async fn run(client: Client) -> Result<(), Error> {
//!     let bucket = client.create_bucket(&CreateBucketRequest {
//!         bucket_name: "kittens".to_string(),
//!         bucket_type: BucketType::AllPrivate,
//!     }).await?;
//!
//!     // Upload the file. Upload urls are fetched on demand and reused per bucket.
//!     let uploaded = client.upload_file(
//!         &bucket,
//!         &UploadFileRequest::new("cats.txt").with_content_type("text/plain"),
//!         Some("cats cats cats cats".as_bytes()),
//!     ).await?;
//!
//!     // Download the file
//!     let file = client.download_file_by_id(&bucket, &uploaded.file_id).await?;
//!
//!     // List the files page by page
//!     let mut req = ListFileNamesRequest {
//!         bucket_id: bucket.bucket_id.clone(),
//!         max_file_count: Some(100),
//!         ..Default::default()
//!     };
//!     loop {
//!         let page = client.list_file_names(&req).await?;
//!         match page.next_file_name {
//!             Some(next) => req.start_file_name = Some(next),
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;

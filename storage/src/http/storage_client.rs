use std::sync::Arc;

use reqwest::Request;
use serde::de::DeserializeOwned;
use time::Duration;
use tokio::io::AsyncRead;

use crate::http::account::Credential;
use crate::http::buckets::create::CreateBucketRequest;
use crate::http::buckets::delete::DeleteBucketRequest;
use crate::http::buckets::get_upload_url::{GetUploadUrlRequest, GetUploadUrlResponse};
use crate::http::buckets::list::{ListBucketsRequest, ListBucketsResponse};
use crate::http::buckets::update::UpdateBucketRequest;
use crate::http::buckets::{self, Bucket, BucketType};
use crate::http::error::ValidationError;
use crate::http::files::delete_version::{DeleteFileVersionRequest, DeletedFile};
use crate::http::files::get_info::GetFileInfoRequest;
use crate::http::files::hide::HideFileRequest;
use crate::http::files::list::{
    ListFileNamesRequest, ListFileNamesResponse, ListFileVersionsRequest, ListFileVersionsResponse,
};
use crate::http::files::upload::{read_payload, UploadFileRequest};
use crate::http::files::{self, File, FileMeta};
use crate::http::transport::Transport;
use crate::http::upload_url_pool::UploadUrlPool;
use crate::http::{decode_response, Error};

#[derive(Clone)]
pub struct StorageClient {
    transport: Arc<dyn Transport>,
    credential: Arc<Credential>,
    upload_url_validity: Duration,
}

impl StorageClient {
    pub(crate) fn new(transport: Arc<dyn Transport>, credential: Arc<Credential>, upload_url_validity: Duration) -> Self {
        Self {
            transport,
            credential,
            upload_url_validity,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Lists the buckets of the account.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_buckets(&self, req: &ListBucketsRequest) -> Result<Vec<Bucket>, Error> {
        let request = buckets::list::build(&self.credential, req)?;
        let response: ListBucketsResponse = self.send(request).await?;
        Ok(response.buckets.into_iter().map(|b| self.adopt(b)).collect())
    }

    /// Creates a bucket.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_bucket(&self, req: &CreateBucketRequest) -> Result<Bucket, Error> {
        let request = buckets::create::build(&self.credential, req)?;
        let bucket = self.send(request).await?;
        Ok(self.adopt(bucket))
    }

    /// Changes the type of the bucket. The bucket is updated in place and keeps its upload urls.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn update_bucket(&self, bucket: &mut Bucket, bucket_type: BucketType) -> Result<(), Error> {
        let req = UpdateBucketRequest {
            bucket_id: bucket.bucket_id.clone(),
            bucket_type,
        };
        let request = buckets::update::build(&self.credential, &req)?;
        let updated = self.send(request).await?;
        bucket.refresh(updated);
        Ok(())
    }

    /// Deletes the bucket and returns it as it was before deletion.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete_bucket(&self, bucket: &Bucket) -> Result<Bucket, Error> {
        let req = DeleteBucketRequest {
            bucket_id: bucket.bucket_id.clone(),
        };
        let request = buckets::delete::build(&self.credential, &req)?;
        let deleted = self.send(request).await?;
        Ok(self.adopt(deleted))
    }

    /// Fetches a new upload url. The result is not pooled; [`StorageClient::upload_file`] pools the ones it fetches.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_upload_url(&self, bucket_id: &str) -> Result<GetUploadUrlResponse, Error> {
        let req = GetUploadUrlRequest {
            bucket_id: bucket_id.to_string(),
        };
        let request = buckets::get_upload_url::build(&self.credential, &req)?;
        self.send(request).await
    }

    /// Uploads `data` as a new version of `req.file_name`.
    ///
    /// The upload url comes from the bucket's pool. A grant the service reports as expired is
    /// dropped from the pool and the error is returned; the upload is not retried.
    ///
    /// ```
    /// use b2_storage::client::Client;
    /// use b2_storage::http::buckets::Bucket;
    /// use b2_storage::http::files::upload::UploadFileRequest;
    ///
    /// async fn run(client: Client, bucket: Bucket) {
    ///     let req = UploadFileRequest::new("hello.txt").with_info("author", "me");
    ///     let uploaded = client.upload_file(&bucket, &req, Some("hello world".as_bytes())).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn upload_file<R: AsyncRead + Unpin + Send>(
        &self,
        bucket: &Bucket,
        req: &UploadFileRequest,
        data: Option<R>,
    ) -> Result<FileMeta, Error> {
        let data = req.validate(data)?;
        let payload = read_payload(data).await?;

        let grant = bucket
            .upload_urls
            .acquire(|| self.get_upload_url(&bucket.bucket_id))
            .await?;
        let request = files::upload::build(&grant, req, payload)?;
        match self.send::<FileMeta>(request).await {
            Ok(meta) => Ok(meta.in_bucket(&bucket.bucket_id)),
            Err(Error::Response(e)) if e.is_auth_expired() => {
                tracing::debug!("upload url refused: {}", e);
                bucket.upload_urls.discard(&grant.upload_url);
                Err(Error::Response(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Downloads the latest version of a file by its name.
    ///
    /// Names with a `.` or `..` path segment are rejected before anything is sent.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn download_file_by_name(&self, bucket: &Bucket, file_name: &str) -> Result<File, Error> {
        let request = files::download::build_by_name(&self.credential, bucket, file_name)?;
        let response = self.transport.send(request).await?;
        files::download::decode_file(response, &bucket.bucket_id).await
    }

    /// Downloads a specific file version.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn download_file_by_id(&self, bucket: &Bucket, file_id: &str) -> Result<File, Error> {
        if file_id.is_empty() {
            return Err(ValidationError::MissingFileId.into());
        }
        let request = files::download::build_by_id(&self.credential, bucket, file_id)?;
        let response = self.transport.send(request).await?;
        files::download::decode_file(response, &bucket.bucket_id).await
    }

    /// Lists one page of file names in alphabetical order.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_file_names(&self, req: &ListFileNamesRequest) -> Result<ListFileNamesResponse, Error> {
        let request = files::list::build_names(&self.credential, req)?;
        let mut response: ListFileNamesResponse = self.send(request).await?;
        response.files = in_bucket(response.files, &req.bucket_id);
        Ok(response)
    }

    /// Lists one page of file versions, ordered by name and then by newest first.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_file_versions(&self, req: &ListFileVersionsRequest) -> Result<ListFileVersionsResponse, Error> {
        let request = files::list::build_versions(&self.credential, req)?;
        let mut response: ListFileVersionsResponse = self.send(request).await?;
        response.files = in_bucket(response.files, &req.bucket_id);
        Ok(response)
    }

    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_file_info(&self, req: &GetFileInfoRequest) -> Result<FileMeta, Error> {
        let request = files::get_info::build(&self.credential, req)?;
        self.send(request).await
    }

    /// Hides the file from name listings. Its versions are kept.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn hide_file(&self, req: &HideFileRequest) -> Result<FileMeta, Error> {
        let request = files::hide::build(&self.credential, req)?;
        let meta: FileMeta = self.send(request).await?;
        Ok(meta.in_bucket(&req.bucket_id))
    }

    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete_file_version(&self, req: &DeleteFileVersionRequest) -> Result<DeletedFile, Error> {
        let request = files::delete_version::build(&self.credential, req)?;
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, Error> {
        let response = self.transport.send(request).await?;
        decode_response(response).await
    }

    fn adopt(&self, mut bucket: Bucket) -> Bucket {
        bucket.upload_urls = Arc::new(UploadUrlPool::new(self.upload_url_validity));
        bucket
    }
}

fn in_bucket(files: Vec<FileMeta>, bucket_id: &str) -> Vec<FileMeta> {
    files.into_iter().map(|f| f.in_bucket(bucket_id)).collect()
}

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::{Request, Response};

use b2_storage::client::{Client, ClientConfig};
use b2_storage::http::account::Credential;
use b2_storage::http::buckets::list::ListBucketsRequest;
use b2_storage::http::files::hide::HideFileRequest;
use b2_storage::http::files::list::ListFileVersionsRequest;
use b2_storage::http::files::upload::UploadFileRequest;
use b2_storage::http::files::Action;
use b2_storage::http::transport::Transport;
use b2_storage::http::Error;

/// Answers each request with the next queued body.
#[derive(Default)]
struct Recorder {
    responses: Mutex<VecDeque<(u16, String)>>,
    paths: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Transport for Recorder {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        self.paths.lock().unwrap().push(request.url().path().to_string());
        let (status, body) = self.responses.lock().unwrap().pop_front().unwrap();
        Ok(http::Response::builder().status(status).body(body).unwrap().into())
    }
}

#[ctor::ctor]
fn init() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn credential() -> Credential {
    Credential {
        account_id: "account".to_string(),
        application_key: "key".to_string(),
        authorization_token: "account-token".to_string(),
        api_url: "https://api.example.com".to_string(),
        download_url: "https://f000.example.com".to_string(),
    }
}

fn file(name: &str, id: &str, action: &str) -> String {
    format!(
        r#"{{"fileId":"{id}","fileName":"{name}","contentLength":5,"contentSha1":"aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d","contentType":"text/plain","fileInfo":{{}},"action":"{action}","uploadTimestamp":1}}"#
    )
}

#[tokio::test]
async fn upload_hide_and_list_versions() {
    let recorder = Arc::new(Recorder::default());
    {
        let mut responses = recorder.responses.lock().unwrap();
        responses.push_back((
            200,
            r#"{"buckets":[{"accountId":"account","bucketId":"b1","bucketName":"kittens","bucketType":"allPrivate"}]}"#
                .to_string(),
        ));
        responses.push_back((
            200,
            r#"{"bucketId":"b1","uploadUrl":"https://pod.example.com/upload","authorizationToken":"upload-token"}"#
                .to_string(),
        ));
        responses.push_back((200, file("hello.txt", "v1", "upload")));
        responses.push_back((200, file("hello.txt", "v2", "upload")));
        responses.push_back((200, file("hello.txt", "v3", "hide")));
        responses.push_back((
            200,
            format!(
                r#"{{"files":[{},{},{}],"nextFileName":null,"nextFileId":null}}"#,
                file("hello.txt", "v3", "hide"),
                file("hello.txt", "v2", "upload"),
                file("hello.txt", "v1", "upload")
            ),
        ));
    }

    let client = Client::new(ClientConfig::default().with_transport(recorder.clone()), credential());
    let bucket = client
        .list_buckets(&ListBucketsRequest::default())
        .await
        .unwrap()
        .remove(0);

    for expected in ["v1", "v2"] {
        let uploaded = client
            .upload_file(&bucket, &UploadFileRequest::new("hello.txt"), Some("hello".as_bytes()))
            .await
            .unwrap();
        assert_eq!(uploaded.file_id, expected);
        assert_eq!(uploaded.bucket_id, "b1");
    }
    assert_eq!(bucket.upload_urls.len(), 1);

    let hidden = client
        .hide_file(&HideFileRequest {
            bucket_id: bucket.bucket_id.clone(),
            file_name: "hello.txt".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(hidden.action, Action::Hide);

    let versions = client
        .list_file_versions(&ListFileVersionsRequest {
            bucket_id: bucket.bucket_id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<_> = versions.files.iter().map(|f| f.file_id.as_str()).collect();
    assert_eq!(ids, ["v3", "v2", "v1"]);
    assert_eq!(versions.next_file_name, None);

    assert_eq!(
        *recorder.paths.lock().unwrap(),
        [
            "/b2api/v1/b2_list_buckets",
            "/b2api/v1/b2_get_upload_url",
            "/upload",
            "/upload",
            "/b2api/v1/b2_hide_file",
            "/b2api/v1/b2_list_file_versions",
        ]
    );
}

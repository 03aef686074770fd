use std::collections::HashMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub mod account;
pub mod buckets;
pub mod error;
pub mod files;
pub mod storage_client;
pub mod transport;
pub mod upload_url_pool;

/// Path prefix of every control plane endpoint.
pub const API_PATH: &str = "/b2api/v1";

/// Maximum number of `X-Bz-Info-*` entries a single file may carry.
pub const MAX_FILE_INFO: usize = 10;

/// Content type asking the service to detect the type from the file name.
pub const DEFAULT_CONTENT_TYPE: &str = "b2/x-auto";

pub const FILE_NAME_HEADER: &str = "x-bz-file-name";
pub const FILE_ID_HEADER: &str = "x-bz-file-id";
pub const CONTENT_SHA1_HEADER: &str = "x-bz-content-sha1";
pub const UPLOAD_TIMESTAMP_HEADER: &str = "x-bz-upload-timestamp";
/// Header names are case-insensitive and normalised to lowercase on both sides of the wire.
pub const INFO_HEADER_PREFIX: &str = "x-bz-info-";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error returned from the B2 service.
    #[error(transparent)]
    Response(#[from] error::ErrorResponse),

    /// An argument violated a precondition. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] error::ValidationError),

    /// An error from the underlying HTTP client.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    /// An error from one of the middleware used.
    #[error(transparent)]
    HttpMiddleware(anyhow::Error),

    #[error("invalid http method: {0}")]
    InvalidMethod(String),

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// The value can not be carried in the named header.
    #[error("invalid value for header {0}")]
    InvalidHeader(String),

    #[error("failed to serialize request body: {0}")]
    Serialize(serde_json::Error),

    /// A success response whose body did not have the expected shape, or an error response
    /// whose body could not be read as an error.
    #[error("malformed response: {0}")]
    MalformedResponse(serde_json::Error),

    #[error("malformed response header: {0}")]
    MalformedHeader(String),

    /// Reading the data to upload failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("environment variable {0} is not set")]
    MissingEnvironment(&'static str),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Middleware(err) => Error::HttpMiddleware(err),
            reqwest_middleware::Error::Reqwest(err) => Error::HttpClient(err),
        }
    }
}

/// Decodes a response into `T` when the status is `200 OK`, or into an [`error::ErrorResponse`] otherwise.
///
/// The response is consumed, so its body is drained and released on every path.
pub async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    let body = response.bytes().await?;
    if status == StatusCode::OK {
        serde_json::from_slice(&body).map_err(Error::MalformedResponse)
    } else {
        Err(decode_error(&body))
    }
}

pub(crate) fn decode_error(body: &[u8]) -> Error {
    match serde_json::from_slice::<error::ErrorResponse>(body) {
        Ok(response) => Error::Response(response),
        Err(err) => Error::MalformedResponse(err),
    }
}

/// Builds a bodiless request. The `Authorization` header is only attached when a token is given.
pub fn build_request(method: &str, url: &str, token: Option<&str>) -> Result<Request, Error> {
    let method = Method::from_bytes(method.as_bytes()).map_err(|_| Error::InvalidMethod(method.to_string()))?;
    let mut request = Request::new(method, Url::parse(url)?);
    if let Some(token) = token {
        request
            .headers_mut()
            .insert(AUTHORIZATION, header_value(AUTHORIZATION.as_str(), token)?);
    }
    Ok(request)
}

/// Builds a request carrying `payload` as its JSON body.
pub fn build_json_request<P: Serialize + ?Sized>(
    method: &str,
    url: &str,
    payload: &P,
    token: Option<&str>,
) -> Result<Request, Error> {
    let body = serde_json::to_vec(payload).map_err(Error::Serialize)?;
    let mut request = build_request(method, url, token)?;
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *request.body_mut() = Some(body.into());
    Ok(request)
}

/// Collects the per-file metadata headers, stripped of [`INFO_HEADER_PREFIX`].
///
/// Only the first value of a repeated header is kept. Values that are not visible ASCII are skipped.
pub fn info_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .keys()
        .filter_map(|name| {
            let key = name.as_str().strip_prefix(INFO_HEADER_PREFIX)?;
            let value = headers.get(name)?.to_str().ok()?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

pub(crate) fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(name.to_string()))
}

pub(crate) fn header_name(name: &str) -> Result<HeaderName, Error> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeader(name.to_string()))
}

pub(crate) trait Escape {
    /// Percent-encodes a file name, keeping `/` as the path separator.
    fn escape(&self) -> String;
    /// Percent-encodes a value that must survive as a header name or a query component.
    fn escape_component(&self) -> String;
}

impl Escape for str {
    fn escape(&self) -> String {
        utf8_percent_encode(self, FILE_NAME_ENCODE_SET).to_string()
    }

    fn escape_component(&self) -> String {
        utf8_percent_encode(self, COMPONENT_ENCODE_SET).to_string()
    }
}

const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const FILE_NAME_ENCODE_SET: &AsciiSet = &COMPONENT_ENCODE_SET.remove(b'/');

/// Reverses [`Escape`]. Fails when the decoded bytes are not UTF-8.
pub fn unescape(value: &str) -> Result<String, Error> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::MalformedHeader(value.to_string()))
}

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes continuation markers: absent, `null` and `""` all mean "no further page".
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod test {
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
    use reqwest::Method;
    use serde::Deserialize;

    use crate::http::transport::test::response;
    use crate::http::{
        build_json_request, build_request, decode_response, header_name, info_headers, unescape, Error, Escape,
    };

    #[ctor::ctor]
    fn init() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Account {
        account_id: String,
        api_url: String,
    }

    #[tokio::test]
    async fn decode_success() {
        let resp = response(200, r#"{"accountId":"1","apiUrl":"/"}"#);
        let account: Account = decode_response(resp).await.unwrap();
        assert_eq!(
            account,
            Account {
                account_id: "1".to_string(),
                api_url: "/".to_string()
            }
        );
    }

    #[tokio::test]
    async fn decode_api_errors() {
        for status in [400u16, 401] {
            let body = format!(r#"{{"status":{status},"code":"nope","message":"nope nope"}}"#);
            let err = decode_response::<Account>(response(status, &body)).await.unwrap_err();
            match err {
                Error::Response(e) => {
                    assert_eq!(e.status, status);
                    assert_eq!(e.code, "nope");
                    assert_eq!(e.message, "nope nope");
                }
                e => panic!("unexpected error {e:?}"),
            }
        }
    }

    #[tokio::test]
    async fn decode_malformed_success_body() {
        let err = decode_response::<Account>(response(200, r#"{"accountId":1}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn decode_malformed_error_body() {
        let err = decode_response::<Account>(response(503, "<html>unavailable</html>"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)), "{err:?}");
    }

    #[test]
    fn build_with_and_without_token() {
        let payload = serde_json::json!({"a": 1});
        for method in ["GET", "POST"] {
            let req = build_json_request(method, "https://example.com", &payload, Some("token")).unwrap();
            assert_eq!(req.method().as_str(), method);
            assert_eq!(req.headers().get(AUTHORIZATION).unwrap(), "token");
            assert_eq!(req.headers().get(CONTENT_TYPE).unwrap(), "application/json");
            assert_eq!(req.body().and_then(|b| b.as_bytes()).unwrap(), br#"{"a":1}"#);
        }

        let req = build_request("GET", "https://example.com/file", None).unwrap();
        assert_eq!(req.method(), Method::GET);
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn build_rejects_bad_input() {
        let err = build_json_request("BAD METHOD", "https://example.com", &(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidMethod(ref m) if m == "BAD METHOD"), "{err:?}");

        let err = build_request("GET", "not a url", None).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)), "{err:?}");

        let err = build_request("GET", "https://example.com", Some("line\nbreak")).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)), "{err:?}");
    }

    #[test]
    fn collects_info_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("kittens"));
        headers.insert(header_name("X-Bz-Info-kittens").unwrap(), HeaderValue::from_static("yes"));
        headers.insert("x-bz-info-thing", HeaderValue::from_static("one"));
        headers.append("x-bz-info-thing", HeaderValue::from_static("two"));

        let info = info_headers(&headers);
        assert_eq!(info.len(), 2);
        assert!(!info.contains_key("Content-Type"));
        assert_eq!(info["kittens"], "yes");
        assert_eq!(info["thing"], "one");
    }

    #[test]
    fn escape_roundtrip_non_ascii() {
        let escaped = "cats√.txt".escape();
        assert_eq!(escaped, "cats%E2%88%9A.txt");
        assert_eq!(unescape(&escaped).unwrap(), "cats√.txt");

        assert_eq!("photos/2024 trip.jpg".escape(), "photos/2024%20trip.jpg");
        assert_eq!("a/b".escape_component(), "a%2Fb");
    }

    #[test]
    fn unescape_rejects_invalid_utf8() {
        assert!(matches!(unescape("%FF%FE"), Err(Error::MalformedHeader(_))));
    }
}

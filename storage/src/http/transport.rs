use reqwest::{Request, Response};
use reqwest_middleware::ClientWithMiddleware;

use crate::http::Error;

/// Sends one request and yields the matching response.
///
/// Socket level concerns (TLS, redirects, timeouts) belong to the implementation.
/// Anything that is not an HTTP response is reported as an error; non-success statuses are
/// returned as responses and left to the decoder.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, Error>;
}

#[async_trait::async_trait]
impl Transport for ClientWithMiddleware {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        Ok(self.execute(request).await?)
    }
}

#[async_trait::async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        Ok(self.execute(request).await?)
    }
}

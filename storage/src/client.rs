use std::ops::Deref;
use std::sync::Arc;

use reqwest_middleware::ClientWithMiddleware;
use time::Duration;

use crate::http::account::authorize::{self, AuthorizeAccountResponse};
use crate::http::account::Credential;
use crate::http::storage_client::StorageClient;
use crate::http::transport::Transport;
use crate::http::upload_url_pool::DEFAULT_UPLOAD_URL_VALIDITY;
use crate::http::{decode_response, Error};

pub const ACCOUNT_ID_ENV: &str = "B2_APPLICATION_KEY_ID";
pub const APPLICATION_KEY_ENV: &str = "B2_APPLICATION_KEY";

pub struct ClientConfig {
    pub http: Option<ClientWithMiddleware>,
    /// Replaces `http` entirely when set.
    pub transport: Option<Arc<dyn Transport>>,
    pub authorize_endpoint: String,
    /// How long a fetched upload url is handed out before a new one is requested.
    pub upload_url_validity: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: None,
            transport: None,
            authorize_endpoint: "https://api.backblazeb2.com".to_string(),
            upload_url_validity: DEFAULT_UPLOAD_URL_VALIDITY,
        }
    }
}

impl ClientConfig {
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_upload_url_validity(mut self, validity: Duration) -> Self {
        self.upload_url_validity = validity;
        self
    }

    fn into_transport(self) -> (Arc<dyn Transport>, String, Duration) {
        let transport = match (self.transport, self.http) {
            (Some(transport), _) => transport,
            (None, Some(http)) => Arc::new(http),
            (None, None) => Arc::new(ClientWithMiddleware::from(reqwest::Client::default())),
        };
        (transport, self.authorize_endpoint, self.upload_url_validity)
    }
}

#[derive(Clone)]
pub struct Client {
    storage_client: StorageClient,
}

impl Deref for Client {
    type Target = StorageClient;

    fn deref(&self) -> &Self::Target {
        &self.storage_client
    }
}

impl Client {
    /// Creates a client from a credential obtained earlier.
    pub fn new(config: ClientConfig, credential: Credential) -> Self {
        let (transport, _, validity) = config.into_transport();
        Self {
            storage_client: StorageClient::new(transport, Arc::new(credential), validity),
        }
    }

    /// Authorizes the account and creates a client holding the resulting credential.
    ///
    /// ```
    /// use b2_storage::client::{Client, ClientConfig};
    ///
    /// async fn run() {
    ///     let client = Client::authorize(ClientConfig::default(), "account id", "application key").await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn authorize(config: ClientConfig, account_id: &str, application_key: &str) -> Result<Self, Error> {
        let (transport, endpoint, validity) = config.into_transport();
        let request = authorize::build(&endpoint, account_id, application_key)?;
        let response = transport.send(request).await?;
        let response: AuthorizeAccountResponse = decode_response(response).await?;
        tracing::debug!("authorized account {} api_url={}", response.account_id, response.api_url);
        let credential = response.into_credential(application_key);
        Ok(Self {
            storage_client: StorageClient::new(transport, Arc::new(credential), validity),
        })
    }

    /// Same as [`Client::authorize`] with the key read from `B2_APPLICATION_KEY_ID` and `B2_APPLICATION_KEY`.
    pub async fn authorize_from_env(config: ClientConfig) -> Result<Self, Error> {
        let account_id = std::env::var(ACCOUNT_ID_ENV).map_err(|_| Error::MissingEnvironment(ACCOUNT_ID_ENV))?;
        let key = std::env::var(APPLICATION_KEY_ENV).map_err(|_| Error::MissingEnvironment(APPLICATION_KEY_ENV))?;
        Self::authorize(config, &account_id, &key).await
    }
}

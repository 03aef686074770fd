use std::fmt;

pub mod authorize;

/// The result of the account authorization handshake.
///
/// Every control plane call is authenticated with `authorization_token` and addressed to `api_url`;
/// downloads go to `download_url`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub account_id: String,
    pub application_key: String,
    pub authorization_token: String,
    pub api_url: String,
    pub download_url: String,
}

impl Credential {
    /// Joins an endpoint name such as `b2_list_buckets` onto the api url.
    pub(crate) fn api(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.api_url.trim_end_matches('/'), crate::http::API_PATH, endpoint)
    }

    pub(crate) fn download(&self, path: &str) -> String {
        format!("{}/{}", self.download_url.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("account_id", &self.account_id)
            .field("api_url", &self.api_url)
            .field("download_url", &self.download_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use crate::http::account::Credential;

    pub(crate) fn credential() -> Credential {
        Credential {
            account_id: "account".to_string(),
            application_key: "secret".to_string(),
            authorization_token: "account-token".to_string(),
            api_url: "https://api.example.com".to_string(),
            download_url: "https://f000.example.com/".to_string(),
        }
    }

    #[test]
    fn endpoints() {
        let cred = credential();
        assert_eq!(cred.api("b2_list_buckets"), "https://api.example.com/b2api/v1/b2_list_buckets");
        assert_eq!(cred.download("file/b/c.txt"), "https://f000.example.com/file/b/c.txt");
    }

    #[test]
    fn debug_hides_secrets() {
        let out = format!("{:?}", credential());
        assert!(!out.contains("secret"));
        assert!(!out.contains("account-token"));
    }
}

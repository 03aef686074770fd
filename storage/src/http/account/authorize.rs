use base64::prelude::*;
use reqwest::header::AUTHORIZATION;
use reqwest::Request;

use crate::http::account::Credential;
use crate::http::{build_request, header_value, Error, API_PATH};

/// Response of `b2_authorize_account`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeAccountResponse {
    pub account_id: String,
    pub authorization_token: String,
    pub api_url: String,
    pub download_url: String,
}

impl AuthorizeAccountResponse {
    pub(crate) fn into_credential(self, application_key: &str) -> Credential {
        Credential {
            account_id: self.account_id,
            application_key: application_key.to_string(),
            authorization_token: self.authorization_token,
            api_url: self.api_url,
            download_url: self.download_url,
        }
    }
}

pub(crate) fn build(endpoint: &str, account_id: &str, application_key: &str) -> Result<Request, Error> {
    let url = format!("{}{}/b2_authorize_account", endpoint.trim_end_matches('/'), API_PATH);
    let mut request = build_request("GET", &url, None)?;
    let basic = format!("Basic {}", BASE64_STANDARD.encode(format!("{account_id}:{application_key}")));
    request
        .headers_mut()
        .insert(AUTHORIZATION, header_value(AUTHORIZATION.as_str(), &basic)?);
    Ok(request)
}

#[cfg(test)]
mod test {
    use reqwest::header::AUTHORIZATION;

    use crate::http::account::authorize::{build, AuthorizeAccountResponse};
    use crate::http::decode_response;
    use crate::http::transport::test::response;
    use crate::http::Error;

    #[test]
    fn basic_auth_header() {
        let req = build("https://api.example.com/", "id", "key").unwrap();
        assert_eq!(req.url().as_str(), "https://api.example.com/b2api/v1/b2_authorize_account");
        assert_eq!(req.headers().get(AUTHORIZATION).unwrap(), "Basic aWQ6a2V5");
        assert!(req.body().is_none());
    }

    #[tokio::test]
    async fn parse_credential() {
        let resp = response(
            200,
            r#"{"accountId":"1","authorizationToken":"1","apiUrl":"/","downloadUrl":"/","minimumPartSize":100}"#,
        );
        let cred = decode_response::<AuthorizeAccountResponse>(resp)
            .await
            .unwrap()
            .into_credential("key");
        assert_eq!(cred.account_id, "1");
        assert_eq!(cred.application_key, "key");
        assert_eq!(cred.authorization_token, "1");
        assert_eq!(cred.api_url, "/");
        assert_eq!(cred.download_url, "/");

        for status in [400u16, 401] {
            let body = format!(r#"{{"status":{status},"code":"nope","message":"nope nope"}}"#);
            let err = decode_response::<AuthorizeAccountResponse>(response(status, &body))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Response(_)));
            assert_eq!(err.to_string(), format!("Status: {status}, Code: nope, Message: nope nope"));
        }
    }
}

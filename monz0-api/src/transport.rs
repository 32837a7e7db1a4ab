//! The authenticated HTTP boundary to the banking API

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, Level};

use crate::{Credential, RequestError};

#[cfg(test)]
pub(crate) mod mock;

/// The default root of the Monzo API
pub const DEFAULT_API_URL: &str = "https://api.monzo.com";

/// An authenticated connection to the banking API.
///
/// Every call returns either the JSON payload of a successful response, or a
/// [`RequestError`] describing the failure (including the error payload of
/// non-success responses).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a `GET` request for the given path
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, RequestError>;

    /// Issue a state-changing `PUT` request for the given path
    async fn put(&self, path: &str, body: &Value) -> Result<Value, RequestError>;
}

/// How the bodies of state-changing requests are encoded
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// `application/json`
    #[default]
    Json,

    /// `application/x-www-form-urlencoded`
    Form,
}

/// A [`Transport`] talking to the API over HTTP with a bearer credential
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    credential: Credential,
    body_encoding: BodyEncoding,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidUrl`] if `base_url` cannot be parsed
    pub fn new(base_url: &str, credential: Credential) -> Result<Self, RequestError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| RequestError::InvalidUrl(e.to_string()))?;

        // relative joins replace the last path segment unless it ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            credential,
            body_encoding: BodyEncoding::default(),
        })
    }

    /// Set the encoding used for state-changing requests
    #[must_use]
    pub fn with_body_encoding(mut self, body_encoding: BodyEncoding) -> Self {
        self.body_encoding = body_encoding;
        self
    }

    fn url(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|e| RequestError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, RequestError> {
        let response = self
            .client
            .get(self.url(path)?)
            .bearer_auth(self.credential.secret())
            .query(query)
            .send()
            .await?;

        read_response(response).await
    }

    #[instrument(skip(self, body))]
    async fn put(&self, path: &str, body: &Value) -> Result<Value, RequestError> {
        let request = self
            .client
            .put(self.url(path)?)
            .bearer_auth(self.credential.secret());

        let request = match self.body_encoding {
            BodyEncoding::Json => request.json(body),
            BodyEncoding::Form => request.form(body),
        };

        read_response(request.send().await?).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<Value, RequestError> {
    let status = response.status();
    let text = response.text().await?;

    tracing::event!(Level::DEBUG, status = status.as_u16(), "received response");

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => Value::String(text),
            Err(e) => return Err(RequestError::Malformed(e.to_string())),
        }
    };

    if status.is_success() {
        Ok(body)
    } else {
        Err(RequestError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::RawQuery,
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE},
            HeaderMap, StatusCode,
        },
        routing::{get, put},
        Json, Router,
    };
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::transport::mock::serve;

    async fn transport(router: Router, body_encoding: BodyEncoding) -> HttpTransport {
        let base_url = serve(router).await;
        HttpTransport::new(&base_url, Credential::new("TOKEN"))
            .unwrap()
            .with_body_encoding(body_encoding)
    }

    /// Answers every request to `/pots` with the given status and body
    fn responding(status: StatusCode, body: &'static str) -> Router {
        Router::new().route("/pots", get(move || async move { (status, body) }))
    }

    /// Answers a deposit with the content type and raw body it was sent
    fn echo_deposit() -> Router {
        Router::new().route(
            "/pots/pot_1/deposit",
            put(|headers: HeaderMap, body: String| async move {
                Json(json!({
                    "content_type": headers[CONTENT_TYPE].to_str().unwrap(),
                    "body": body,
                }))
            }),
        )
    }

    fn deposit_body() -> Value {
        json!({
            "source_account_id": "acc_1",
            "amount": "100",
            "dedupe_id": "dedupe_1",
        })
    }

    #[test_case("https://api.monzo.com", "pots/pot_1/deposit" => "https://api.monzo.com/pots/pot_1/deposit"; "bare host")]
    #[test_case("http://localhost:8080/api", "accounts" => "http://localhost:8080/api/accounts"; "prefixed path")]
    #[test_case("http://localhost:8080/api/", "ping/whoami" => "http://localhost:8080/api/ping/whoami"; "trailing slash")]
    fn url(base: &str, path: &str) -> String {
        let transport = HttpTransport::new(base, Credential::new("TOKEN")).unwrap();
        transport.url(path).unwrap().to_string()
    }

    #[test]
    fn invalid_base_url() {
        assert!(matches!(
            HttpTransport::new("not a url", Credential::new("TOKEN")),
            Err(RequestError::InvalidUrl(_))
        ));
    }

    #[test]
    fn body_encoding_from_yaml() {
        let encoding: BodyEncoding = serde_yaml::from_str("form").unwrap();
        assert_eq!(encoding, BodyEncoding::Form);
    }

    #[tokio::test]
    async fn sends_credential_and_query() {
        let router = Router::new().route(
            "/pots",
            get(|headers: HeaderMap, RawQuery(query): RawQuery| async move {
                Json(json!({
                    "authorization": headers[AUTHORIZATION].to_str().unwrap(),
                    "query": query,
                }))
            }),
        );

        let body = transport(router, BodyEncoding::Json)
            .await
            .get("pots", &[("current_account_id", "acc_1")])
            .await
            .unwrap();

        assert_eq!(
            body,
            json!({
                "authorization": "Bearer TOKEN",
                "query": "current_account_id=acc_1",
            })
        );
    }

    #[tokio::test]
    async fn error_status_carries_payload() {
        let router = responding(StatusCode::FORBIDDEN, r#"{"code": "forbidden"}"#);

        let error = transport(router, BodyEncoding::Json)
            .await
            .get("pots", &[])
            .await
            .unwrap_err();

        match error {
            RequestError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, json!({"code": "forbidden"}));
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_keeps_text_payload() {
        let router = responding(StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable");

        let error = transport(router, BodyEncoding::Json)
            .await
            .get("pots", &[])
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            RequestError::Status { status: 500, body: Value::String(text) } if text == "upstream unavailable"
        ));
    }

    #[tokio::test]
    async fn empty_body_is_null() {
        let router = responding(StatusCode::OK, "");

        let body = transport(router, BodyEncoding::Json)
            .await
            .get("pots", &[])
            .await
            .unwrap();

        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn malformed_success_body() {
        let router = responding(StatusCode::OK, "{\"pots\": [");

        let error = transport(router, BodyEncoding::Json)
            .await
            .get("pots", &[])
            .await
            .unwrap_err();

        assert!(matches!(error, RequestError::Malformed(_)));
    }

    #[tokio::test]
    async fn json_body() {
        let echo = transport(echo_deposit(), BodyEncoding::Json)
            .await
            .put("pots/pot_1/deposit", &deposit_body())
            .await
            .unwrap();

        assert_eq!(echo["content_type"], "application/json");
        let sent: Value = serde_json::from_str(echo["body"].as_str().unwrap()).unwrap();
        assert_eq!(sent, deposit_body());
    }

    #[tokio::test]
    async fn form_body() {
        let echo = transport(echo_deposit(), BodyEncoding::Form)
            .await
            .put("pots/pot_1/deposit", &deposit_body())
            .await
            .unwrap();

        assert_eq!(echo["content_type"], "application/x-www-form-urlencoded");
        let mut fields: Vec<_> = echo["body"].as_str().unwrap().split('&').collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            ["amount=100", "dedupe_id=dedupe_1", "source_account_id=acc_1"]
        );
    }
}

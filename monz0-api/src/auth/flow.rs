use async_trait::async_trait;
use rand::{distr::Alphanumeric, Rng};
use reqwest::Url;
use serde::Deserialize;
use tracing::{instrument, Level};

use super::{Credential, CredentialSource, OAuthConfig};
use crate::AuthError;

const STATE_LENGTH: usize = 32;

/// An authorization request waiting for the user to grant access.
///
/// Holds the URL the user must visit and the anti-forgery state the callback
/// is checked against.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    url: Url,
    state: String,
}

impl PendingAuthorization {
    /// Start a new authorization request with a freshly generated state
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if the authorization URL cannot be
    /// parsed
    pub fn new(config: &OAuthConfig) -> Result<Self, AuthError> {
        Self::with_state(config, generate_state())
    }

    /// Start a new authorization request with the given state
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if the authorization URL cannot be
    /// parsed
    pub fn with_state(config: &OAuthConfig, state: impl Into<String>) -> Result<Self, AuthError> {
        let state = state.into();
        let url = Url::parse_with_params(
            &config.authorization_url,
            &[
                ("client_id", config.client_id.as_str()),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| AuthError::InvalidConfig(e.to_string()))?;

        Ok(Self { url, state })
    }

    /// The URL the user has to visit to grant access
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The anti-forgery state sent with the request
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Check a callback against this request, returning its authorization
    /// code
    ///
    /// # Errors
    ///
    /// - [`AuthError::Callback`] if the authorization server reported an error
    /// - [`AuthError::StateMismatch`] if the states differ
    /// - [`AuthError::MissingCode`] if the callback carries no code
    pub fn verify<'a>(&self, callback: &'a AuthorizationCallback) -> Result<&'a str, AuthError> {
        if let Some(error) = &callback.error {
            return Err(AuthError::Callback(error.clone()));
        }

        if callback.state != self.state {
            return Err(AuthError::StateMismatch {
                expected: self.state.clone(),
                received: callback.state.clone(),
            });
        }

        if callback.code.is_empty() {
            return Err(AuthError::MissingCode);
        }

        Ok(&callback.code)
    }
}

fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// The parameters the authorization server redirects back with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationCallback {
    /// The authorization code
    pub code: String,

    /// The anti-forgery state
    pub state: String,

    /// The error reported instead of a code, if any
    pub error: Option<String>,
}

impl AuthorizationCallback {
    /// Extract the callback parameters from the query of a redirect URL
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Callback`] if `redirect` is not a URL
    pub fn from_redirect(redirect: &str) -> Result<Self, AuthError> {
        let url = Url::parse(redirect.trim()).map_err(|e| AuthError::Callback(e.to_string()))?;
        Ok(Self::from_query(url.query_pairs()))
    }

    /// Extract the callback parameters from decoded query pairs
    pub fn from_query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut callback = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().to_string();
            match key.as_ref() {
                "code" => callback.code = value,
                "state" => callback.state = value,
                "error" => callback.error = Some(value),
                _ => (),
            }
        }
        callback
    }
}

/// Exchanges an authorization code for a bearer credential
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Perform the exchange
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Exchange`] if the request fails, or
    /// [`AuthError::MissingToken`] if no token is returned
    async fn exchange(&self, code: &str) -> Result<Credential, AuthError>;
}

/// Delivers the [`AuthorizationCallback`] once the user has granted access
#[async_trait]
pub trait CallbackReceiver: Send + Sync {
    /// Present the authorization request to the user and wait for the
    /// callback
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Callback`] if the callback cannot be received
    async fn receive(
        &self,
        pending: &PendingAuthorization,
    ) -> Result<AuthorizationCallback, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl TokenResponse {
    fn into_credential(self) -> Result<Credential, AuthError> {
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(Credential::new(token)),
            _ => Err(AuthError::MissingToken),
        }
    }
}

/// The OAuth2 token endpoint, reached over HTTP
#[derive(Debug)]
pub struct HttpTokenEndpoint {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl HttpTokenEndpoint {
    /// Create an endpoint for the given client registration
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    #[instrument(skip(self, code))]
    async fn exchange(&self, code: &str) -> Result<Credential, AuthError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Exchange(format!("status {}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        tracing::event!(Level::DEBUG, "token endpoint responded");

        token.into_credential()
    }
}

/// The OAuth2 authorization-code grant, as a [`CredentialSource`]
#[derive(Debug)]
pub struct AuthorizationCodeFlow<E, R> {
    config: OAuthConfig,
    endpoint: E,
    receiver: R,
}

impl<E, R> AuthorizationCodeFlow<E, R>
where
    E: TokenEndpoint,
    R: CallbackReceiver,
{
    /// Create a flow for the given client registration
    pub fn new(config: OAuthConfig, endpoint: E, receiver: R) -> Self {
        Self {
            config,
            endpoint,
            receiver,
        }
    }
}

impl<R> AuthorizationCodeFlow<HttpTokenEndpoint, R>
where
    R: CallbackReceiver,
{
    /// Create a flow that exchanges codes with the configured token endpoint
    pub fn over_http(config: OAuthConfig, receiver: R) -> Self {
        let endpoint = HttpTokenEndpoint::new(config.clone());
        Self::new(config, endpoint, receiver)
    }
}

#[async_trait]
impl<E, R> CredentialSource for AuthorizationCodeFlow<E, R>
where
    E: TokenEndpoint,
    R: CallbackReceiver,
{
    #[instrument(skip(self))]
    async fn credential(&self) -> Result<Credential, AuthError> {
        let pending = PendingAuthorization::new(&self.config)?;
        tracing::event!(Level::INFO, "started authorization flow");

        let callback = self.receiver.receive(&pending).await?;
        let code = pending.verify(&callback)?;

        let credential = self.endpoint.exchange(code).await?;
        tracing::event!(Level::INFO, "authorization flow completed");

        Ok(credential)
    }
}

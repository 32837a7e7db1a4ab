//! Obtaining and verifying the bearer credential

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, Level};

use crate::{AuthError, Transport};

mod flow;
pub use flow::{
    AuthorizationCallback, AuthorizationCodeFlow, CallbackReceiver, HttpTokenEndpoint,
    PendingAuthorization, TokenEndpoint,
};

/// The default authorization endpoint (browser redirect)
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://auth.monzo.com/";

/// The default token endpoint (code-for-token exchange)
pub const DEFAULT_TOKEN_URL: &str = "https://api.monzo.com/oauth2/token";

/// An opaque bearer token, held in memory for the duration of a run
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self(access_token.into())
    }

    /// The raw access token
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The client registration used for the OAuth2 authorization-code flow
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// The OAuth2 client ID
    pub client_id: String,

    /// The OAuth2 client secret
    pub client_secret: String,

    /// Where the authorization server sends the user back to
    pub redirect_uri: String,

    /// The authorization endpoint
    pub authorization_url: String,

    /// The token endpoint
    pub token_url: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: "CLIENT_ID".to_string(),
            client_secret: "CLIENT_SECRET".to_string(),
            redirect_uri: "http://127.0.0.1:8080/callback".to_string(),
            authorization_url: DEFAULT_AUTHORIZATION_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .field("authorization_url", &self.authorization_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Somewhere a [`Credential`] can be obtained from.
///
/// This separates *how* a token is acquired (pasted by the user, exchanged
/// through the OAuth2 flow, ...) from the clients that use it.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Produce a credential
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if no credential could be obtained. No
    /// partial credential is ever returned.
    async fn credential(&self) -> Result<Credential, AuthError>;
}

/// A previously issued access token, adopted as-is
#[derive(Debug, Clone)]
pub struct ExistingToken(Credential);

impl ExistingToken {
    /// Use the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self(Credential::new(access_token))
    }
}

#[async_trait]
impl CredentialSource for ExistingToken {
    async fn credential(&self) -> Result<Credential, AuthError> {
        tracing::event!(Level::INFO, "using existing access token");
        Ok(self.0.clone())
    }
}

/// Check that the transport's credential is accepted by the API.
///
/// Issues a `whoami` request and looks for the `authenticated` marker in the
/// response.
///
/// # Errors
///
/// Returns [`AuthError::Verification`] if the request fails or the marker is
/// absent.
#[instrument(skip(transport))]
pub async fn verify_credential(transport: &impl Transport) -> Result<(), AuthError> {
    let response = transport
        .get("ping/whoami", &[])
        .await
        .map_err(|e| AuthError::Verification(Some(e)))?;

    if response.get("authenticated").is_none() {
        return Err(AuthError::Verification(None));
    }

    tracing::event!(Level::INFO, "credential verified");
    Ok(())
}

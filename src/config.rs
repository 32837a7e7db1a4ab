use std::path::PathBuf;

use monz0_api::{transport::DEFAULT_API_URL, BodyEncoding, OAuthConfig, RetryPolicy};
use serde::{Deserialize, Serialize};

static BIN_NAME: &str = std::env!("CARGO_PKG_NAME");

static CONFIG_NAME: &str = "config";

const CLIENT_ID_VAR: &str = "MONZ0_POTS_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "MONZ0_POTS_CLIENT_SECRET";
const REDIRECT_URI_VAR: &str = "MONZ0_POTS_REDIRECT_URI";

/// How the OAuth2 redirect gets back to the program
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackMode {
    /// the user pastes the redirect URL into the console
    #[default]
    Manual,

    /// a local HTTP listener on the redirect URI receives it
    Local,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oauth: OAuthConfig,
    pub api_url: String,
    pub callback: CallbackMode,
    pub retry: RetryPolicy,
    pub body_encoding: BodyEncoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oauth: OAuthConfig::default(),
            api_url: DEFAULT_API_URL.to_string(),
            callback: CallbackMode::default(),
            retry: RetryPolicy::default(),
            body_encoding: BodyEncoding::default(),
        }
    }
}

impl Config {
    /// Replace the client registration with any values set in the
    /// environment
    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(client_id) = var(CLIENT_ID_VAR) {
            self.oauth.client_id = client_id;
        }
        if let Some(client_secret) = var(CLIENT_SECRET_VAR) {
            self.oauth.client_secret = client_secret;
        }
        if let Some(redirect_uri) = var(REDIRECT_URI_VAR) {
            self.oauth.redirect_uri = redirect_uri;
        }
        self
    }
}

pub fn load() -> Result<Config, confy::ConfyError> {
    let config: Config = confy::load(BIN_NAME, CONFIG_NAME)?;
    Ok(config.with_overrides(|key| std::env::var(key).ok()))
}

pub fn path() -> Result<PathBuf, confy::ConfyError> {
    confy::get_configuration_file_path(BIN_NAME, CONFIG_NAME)
}

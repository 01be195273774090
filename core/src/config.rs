//! Client configuration.

use std::env;
use std::fmt;

use crate::error::ApiError;

/// Base URL of the public top.gg API.
pub const BASE_URL: &str = "https://top.gg/api";

const ENV_TOKEN: &str = "TOPGG_TOKEN";
const ENV_SECRET: &str = "TOPGG_SECRET";
const ENV_BOT_ID: &str = "TOPGG_BOT_ID";
const ENV_BASE_URL: &str = "TOPGG_BASE_URL";

/// Credentials and defaults for a `Client`.
///
/// Immutable once handed to a client. `Debug` output never contains the
/// token or the webhook secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    token: String,
    secret: Option<String>,
    id: Option<String>,
    base_url: String,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: None,
            id: None,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Webhook secret. Kept for callers that verify incoming webhook
    /// payloads; it is never sent on API requests.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Default bot id used by `get_bot` and `get_stats` when called without
    /// an argument.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Reads `TOPGG_TOKEN` (required), `TOPGG_SECRET`, `TOPGG_BOT_ID` and
    /// `TOPGG_BASE_URL` from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let token = lookup(ENV_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_TOKEN} is not set")))?;

        let mut config = Self::new(token);
        if let Some(secret) = lookup(ENV_SECRET) {
            config = config.with_secret(secret);
        }
        if let Some(id) = lookup(ENV_BOT_ID) {
            config = config.with_id(id);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        Ok(config)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("id", &self.id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

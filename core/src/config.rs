//! Consumer and client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

pub const ENV_BASE_URL: &str = "CONSUMER_BASE_URL";
pub const ENV_BEARER_TOKEN: &str = "CONSUMER_BEARER_TOKEN";

/// Immutable settings captured by a `ResourceConsumer` at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Path of the resource collection, e.g. `users` or `api/v1/orders`.
    pub prefix: String,
    pub log_request: bool,
    pub log_response: bool,
}

impl ConsumerConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Settings for `HttpApiClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: Url,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            bearer_token: None,
            user_agent: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `CONSUMER_BASE_URL` and the optional `CONSUMER_BEARER_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(ENV_BASE_URL).map_err(|_| ConfigError::MissingEnv(ENV_BASE_URL))?;
        let mut config = Self::new(&base_url)?;
        config.bearer_token = std::env::var(ENV_BEARER_TOKEN).ok().filter(|t| !t.is_empty());
        Ok(config)
    }
}

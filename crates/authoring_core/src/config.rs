//! Publishing integration settings.
//!
//! # Responsibility
//! - Hold base URLs and the publishing API key as one explicit value.
//! - Reject unusable settings before any outbound call is attempted.
//!
//! # Invariants
//! - `publishing_url` is an absolute http(s) URL.
//! - `api_key` is non-blank.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Settings threaded into publishing clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishingConfig {
    /// Base URL of the publishing service (`http://publishing/`).
    pub publishing_url: String,
    /// Static key sent as `X-API-Key` on mutating calls.
    pub api_key: String,
    /// Public site used in role-acceptance links.
    #[serde(default)]
    pub webview_url: Option<String>,
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl { field: &'static str, value: String },
    BlankApiKey,
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl { field, value } => {
                write!(f, "`{field}` must be an absolute http(s) URL, got `{value}`")
            }
            Self::BlankApiKey => write!(f, "`api_key` must not be blank"),
            Self::Parse(err) => write!(f, "invalid publishing config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl PublishingConfig {
    /// Builds and validates settings.
    pub fn new(
        publishing_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            publishing_url: publishing_url.into(),
            api_key: api_key.into(),
            webview_url: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_webview_url(mut self, webview_url: impl Into<String>) -> Self {
        self.webview_url = Some(webview_url.into());
        self
    }

    /// Parses settings from a JSON document and validates them.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.publishing_url) {
            return Err(ConfigError::InvalidUrl {
                field: "publishing_url",
                value: self.publishing_url.clone(),
            });
        }
        if let Some(webview_url) = &self.webview_url {
            if !is_http_url(webview_url) {
                return Err(ConfigError::InvalidUrl {
                    field: "webview_url",
                    value: webview_url.clone(),
                });
            }
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::BlankApiKey);
        }
        Ok(())
    }

    /// Joins `path` onto the publishing base URL with exactly one slash.
    pub fn publishing_endpoint(&self, path: &str) -> String {
        join_url(&self.publishing_url, path)
    }
}

/// Joins a base URL and a relative path with exactly one separating slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.trim_matches('/').is_empty())
}

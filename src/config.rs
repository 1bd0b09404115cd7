use reqwest::Url;

use crate::error::ConfigError;

/// Environment variable holding the order service base URL.
pub const API_URL_ENV: &str = "ORDER_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Console settings: where the order service lives and how deep the
/// service mailbox is.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL without trailing slash.
    pub api_url: String,
    pub buffer_size: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ConsoleConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(api_url.into())?;
        Ok(Self {
            api_url,
            ..Self::default()
        })
    }

    /// Reads [`API_URL_ENV`], falling back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}

fn normalize_api_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let parsed = Url::parse(&trimmed).map_err(|e| ConfigError::InvalidApiUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            url: raw,
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(trimmed)
}

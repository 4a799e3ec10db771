//! Client configuration loaded from environment variables.

use noponto_shared::constants::{
    DEFAULT_GREETING, DEVELOPMENT_API_BASE_URL, PRODUCTION_API_BASE_URL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the answering service, without a trailing slash.
    /// Env: `NOPONTO_API_BASE_URL`
    /// Default: the production URL when `NOPONTO_ENV=production`, otherwise
    /// `http://localhost:3002`.
    pub api_base_url: String,

    /// First bot message of every new chat.
    /// Env: `NOPONTO_GREETING`
    pub greeting: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEVELOPMENT_API_BASE_URL.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if lookup("NOPONTO_ENV").as_deref() == Some("production") {
            config.api_base_url = PRODUCTION_API_BASE_URL.to_string();
        }

        if let Some(url) = lookup("NOPONTO_API_BASE_URL") {
            if url.starts_with("http://") || url.starts_with("https://") {
                config.api_base_url = normalize_base_url(&url);
            } else {
                tracing::warn!(value = %url, "Invalid NOPONTO_API_BASE_URL, using default");
            }
        }

        if let Some(greeting) = lookup("NOPONTO_GREETING") {
            if !greeting.trim().is_empty() {
                config.greeting = greeting;
            }
        }

        config
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

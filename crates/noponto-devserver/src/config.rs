//! Dev server configuration loaded from environment variables.
//!
//! Every setting has a default so `cargo run -p noponto-devserver` works with
//! no configuration, listening where the client's development build expects
//! the API.

use std::net::SocketAddr;

use noponto_shared::constants::{DEMO_EMAIL, DEMO_PASSWORD, SESSION_VALIDITY_MS};

#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`
    /// Default: `127.0.0.1:3002`
    pub http_addr: SocketAddr,

    /// The only email accepted by `/auth/login`.
    /// Env: `DEMO_EMAIL`
    pub demo_email: String,

    /// Password paired with `demo_email`.
    /// Env: `DEMO_PASSWORD`
    pub demo_password: String,

    /// How long an issued token is honoured, in milliseconds.
    /// Env: `TOKEN_TTL_SECS`
    /// Default: 8 hours
    pub token_ttl_ms: i64,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([127, 0, 0, 1], 3002).into(),
            demo_email: DEMO_EMAIL.to_string(),
            demo_password: DEMO_PASSWORD.to_string(),
            token_ttl_ms: SESSION_VALIDITY_MS,
        }
    }
}

impl DevServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(email) = std::env::var("DEMO_EMAIL") {
            if !email.is_empty() {
                config.demo_email = email;
            }
        }

        if let Ok(password) = std::env::var("DEMO_PASSWORD") {
            if !password.is_empty() {
                config.demo_password = password;
            }
        }

        if let Ok(val) = std::env::var("TOKEN_TTL_SECS") {
            match val.parse::<i64>() {
                Ok(secs) if secs > 0 => config.token_ttl_ms = secs.saturating_mul(1000),
                _ => tracing::warn!(value = %val, "Invalid TOKEN_TTL_SECS, using default"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DevServerConfig::default();
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 3002).into());
        assert_eq!(config.demo_email, "admin@teste.com");
        assert_eq!(config.token_ttl_ms, 8 * 60 * 60 * 1000);
    }
}

//! # noponto-client
//!
//! Client core of the No Ponto question-answering chat.
//!
//! - [`auth::AuthSessionManager`] owns the bearer-token session: login, lazy
//!   8-hour expiry, authenticated requests, clear-on-401
//! - [`transcript::ChatTranscript`] holds the active transcript and the saved
//!   conversations
//! - [`chat::ChatController`] wires user input to `/ask` and reports whether
//!   the caller must redirect to login

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod transcript;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use noponto_store::MemorySessionStore;
use tracing_subscriber::{fmt, EnvFilter};

pub use auth::{ApiResult, AskOutcome, AuthSessionManager, LoginFailure, LoginResult, RequestOptions};
pub use chat::{submit_login, ChatController, LoginFormOutcome, SendOutcome};
pub use config::ClientConfig;
pub use error::AuthError;
pub use transcript::ChatTranscript;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Calling it again is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("noponto_client=debug,noponto_store=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Build a chat controller for `config` backed by a fresh in-memory session.
pub fn connect(config: &ClientConfig) -> ChatController {
    let store = Arc::new(MemorySessionStore::new());
    let auth = Arc::new(AuthSessionManager::from_config(config, store));
    tracing::info!(base_url = %auth.base_url(), "Chat client ready");
    ChatController::new(auth, config.greeting.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_starts_logged_out_with_greeting() {
        let chat = connect(&ClientConfig::with_base_url("http://localhost:3002/"));
        assert_eq!(chat.auth().base_url(), "http://localhost:3002");
        assert!(!chat.auth().is_authenticated());
        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, noponto_shared::constants::DEFAULT_GREETING);
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}

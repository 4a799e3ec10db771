//! # noponto-devserver
//!
//! Local stand-in for the remote answering service.
//!
//! Serves the two endpoints the client talks to:
//! - `POST /auth/login` accepts a single demo account and issues random
//!   bearer tokens
//! - `POST /ask` checks the bearer token and answers with a canned reply
//!
//! The router is exported so tests can bind it to an ephemeral port.

pub mod api;
pub mod config;
pub mod error;
pub mod tokens;

pub use api::{build_router, serve, spawn_local, AppState};
pub use config::DevServerConfig;
pub use error::DevServerError;
pub use tokens::TokenRegistry;

use thiserror::Error;

use crate::constants::{MSG_INVALID_EMAIL, MSG_INVALID_PASSWORD};

/// Input rejected before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", MSG_INVALID_EMAIL)]
    InvalidEmail,

    #[error("{}", MSG_INVALID_PASSWORD)]
    InvalidPassword,
}

/// A response body that does not match the expected schema.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

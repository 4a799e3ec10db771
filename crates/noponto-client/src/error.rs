use thiserror::Error;

use noponto_shared::ProtocolError;

/// Failures of an authenticated call.
///
/// [`AuthError::NoToken`] and [`AuthError::SessionExpired`] both mean the
/// caller must send the user back to the login screen; no valid session
/// remains when either is returned. Every other variant is shown inline.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token de autenticação não encontrado")]
    NoToken,

    #[error("Sessão expirada. Faça login novamente.")]
    SessionExpired,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    MalformedResponse(#[from] ProtocolError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl AuthError {
    /// Whether the caller should redirect to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, AuthError::NoToken | AuthError::SessionExpired)
    }
}

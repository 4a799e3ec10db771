use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use noponto_shared::constants::MSG_INVALID_CREDENTIALS;
use noponto_shared::protocol::ErrorBody;

#[derive(Debug, Error)]
pub enum DevServerError {
    #[error("{}", MSG_INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Token ausente ou expirado")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for DevServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DevServerError::InvalidCredentials | DevServerError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            DevServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        (status, axum::Json(ErrorBody::new(message))).into_response()
    }
}

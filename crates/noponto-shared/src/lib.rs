//! # noponto-shared
//!
//! Types shared by the No Ponto client and the local dev server: chat domain
//! types, the JSON bodies of the `/auth/login` and `/ask` endpoints, input
//! sanitization and the error types they produce.

pub mod constants;
pub mod error;
pub mod protocol;
pub mod sanitize;
pub mod types;

pub use error::{ProtocolError, ValidationError};

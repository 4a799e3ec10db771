//! Auth session manager.
//!
//! The single authority over the bearer token: it logs in, decides whether
//! the stored token is still valid (lazily, on every read), attaches it to
//! outgoing requests and clears the session when the server answers 401.
//! Navigation is left to the caller: a cleared session is reported as
//! [`AuthError::SessionExpired`] or [`AuthError::NoToken`].

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use noponto_shared::constants::{
    ASK_PATH, LOGIN_PATH, MSG_CONNECTION_ERROR, MSG_INVALID_CREDENTIALS, MSG_LOGIN_OK,
    SESSION_VALIDITY_MS,
};
use noponto_shared::protocol::{AskRequest, AskResponse, LoginRequest, LoginResponse};
use noponto_shared::ProtocolError;
use noponto_store::{Clock, SessionStore, StoredToken, SystemClock};

use crate::config::ClientConfig;
use crate::error::AuthError;

/// Why a login did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginFailure {
    /// The server rejected the credentials.
    Credentials,
    /// The server could not be reached or sent an unreadable reply.
    Network,
}

/// Outcome of [`AuthSessionManager::login`]. Failures are values, meant to
/// be shown inline on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub success: bool,
    pub token: Option<String>,
    pub message: String,
    pub failure: Option<LoginFailure>,
}

impl LoginResult {
    fn succeeded(token: String) -> Self {
        Self {
            success: true,
            token: Some(token),
            message: MSG_LOGIN_OK.to_string(),
            failure: None,
        }
    }

    fn rejected(message: Option<String>) -> Self {
        Self {
            success: false,
            token: None,
            message: message.unwrap_or_else(|| MSG_INVALID_CREDENTIALS.to_string()),
            failure: Some(LoginFailure::Credentials),
        }
    }

    fn network_failure() -> Self {
        Self {
            success: false,
            token: None,
            message: MSG_CONNECTION_ERROR.to_string(),
            failure: Some(LoginFailure::Network),
        }
    }
}

/// Method, extra headers and JSON body of an authenticated request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Merged over the default `Content-Type`. An `Authorization` entry here
    /// is always replaced by the session's bearer token.
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Reply to an authenticated request that reached the server and was not a
/// 401. `success` mirrors the HTTP status class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    pub success: bool,
    pub status: u16,
    pub data: Option<Value>,
    pub message: Option<String>,
}

/// Result of asking a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Answer(String),
    /// The service refused the question; `message` is its explanation, if any.
    Rejected {
        status: u16,
        message: Option<String>,
    },
}

enum TokenState {
    Valid(String),
    Expired,
    Absent,
}

/// Gates every call to the answering service behind a valid bearer token.
pub struct AuthSessionManager {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl AuthSessionManager {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            clock,
        }
    }

    pub fn from_config(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        Self::new(config.api_base_url.clone(), store, Arc::new(SystemClock))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send credentials to the login endpoint and, on success, start a
    /// session. Never fails: rejected credentials and transport errors come
    /// back as an unsuccessful [`LoginResult`].
    pub async fn login(&self, email: &str, password: &str) -> LoginResult {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.client.post(self.url(LOGIN_PATH)).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Login request failed");
                return LoginResult::network_failure();
            }
        };

        let status = response.status();
        let body: LoginResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(%status, error = %e, "Unreadable login response");
                return LoginResult::network_failure();
            }
        };

        match body.issued_token() {
            Some(token) if bearer_header(token).is_err() => {
                error!(%status, "Login response carried a token unusable as a bearer header");
                LoginResult::network_failure()
            }
            Some(token) => {
                let token = token.to_string();
                self.store
                    .store_token(StoredToken::new(token.clone(), self.clock.now_ms()));
                self.store.store_display_email(email);
                info!(email = %email, "Logged in");
                LoginResult::succeeded(token)
            }
            None => {
                warn!(%status, email = %email, "Login rejected");
                self.store.clear();
                LoginResult::rejected(body.message)
            }
        }
    }

    fn token_state(&self) -> TokenState {
        let Some(stored) = self.store.load().token else {
            return TokenState::Absent;
        };

        let age_ms = stored.age_ms(self.clock.now_ms());
        if age_ms >= SESSION_VALIDITY_MS {
            info!(age_ms, "Session token expired");
            self.store.clear();
            return TokenState::Expired;
        }

        TokenState::Valid(stored.token)
    }

    /// The stored token, or `None` when there is none or it is 8 hours old or
    /// older. An expired token is cleared as a side effect.
    pub fn get_token(&self) -> Option<String> {
        match self.token_state() {
            TokenState::Valid(token) => Some(token),
            TokenState::Expired | TokenState::Absent => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Email of the logged-in user, while the session is valid.
    pub fn display_email(&self) -> Option<String> {
        if self.is_authenticated() {
            self.store.load().display_email
        } else {
            None
        }
    }

    /// Remove token, timestamp and display email. Idempotent.
    pub fn clear_session(&self) {
        self.store.clear();
    }

    pub fn logout(&self) {
        info!("Logging out");
        self.clear_session();
    }

    /// Issue a request to `path` carrying the session's bearer token.
    ///
    /// - no stored token: [`AuthError::NoToken`], nothing is sent
    /// - stored token aged out: session cleared, [`AuthError::SessionExpired`],
    ///   nothing is sent
    /// - HTTP 401: session cleared, [`AuthError::SessionExpired`], no retry
    /// - any other status: `Ok` with `success` set from the status class
    /// - transport failure: [`AuthError::Network`]
    pub async fn make_authenticated_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResult, AuthError> {
        let token = match self.token_state() {
            TokenState::Valid(token) => token,
            TokenState::Expired => return Err(AuthError::SessionExpired),
            TokenState::Absent => return Err(AuthError::NoToken),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        headers.insert(AUTHORIZATION, bearer_header(&token)?);

        let mut request = self
            .client
            .request(options.method.clone(), self.url(path))
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        debug!(method = %options.method, path = %path, "Authenticated request");

        let response = request.send().await.map_err(|e| {
            error!(path = %path, error = %e, "Authenticated request failed");
            AuthError::Network(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(path = %path, "Server rejected the session token");
            self.store.clear();
            return Err(AuthError::SessionExpired);
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(path = %path, error = %e, "Failed to read response body");
            AuthError::Network(e)
        })?;

        let data = match serde_json::from_slice::<Value>(&bytes) {
            Ok(data) => Some(data),
            Err(e) if status.is_success() => {
                error!(path = %path, %status, error = %e, "Response body is not JSON");
                return Err(ProtocolError::from(e).into());
            }
            Err(_) => None,
        };

        let message = data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        if !status.is_success() {
            warn!(path = %path, %status, message = ?message, "Request unsuccessful");
        }

        Ok(ApiResult {
            success: status.is_success(),
            status: status.as_u16(),
            data,
            message,
        })
    }

    /// Ask the answering service a question.
    ///
    /// Accepts exactly one reply shape, `{"success": true, "data": {"answer":
    /// "<text>"}}`; a successful reply with any other shape is
    /// [`AuthError::MalformedResponse`].
    pub async fn ask(&self, question: &str) -> Result<AskOutcome, AuthError> {
        let body = serde_json::to_value(AskRequest {
            question: question.to_string(),
        })
        .map_err(ProtocolError::from)?;
        let result = self
            .make_authenticated_request(ASK_PATH, RequestOptions::post(body))
            .await?;

        if !result.success {
            return Ok(AskOutcome::Rejected {
                status: result.status,
                message: result.message,
            });
        }

        let data = result
            .data
            .ok_or_else(|| ProtocolError::Malformed("empty response body".into()))?;
        let reply: AskResponse = serde_json::from_value(data).map_err(ProtocolError::from)?;

        if !reply.success {
            return Ok(AskOutcome::Rejected {
                status: result.status,
                message: reply.message,
            });
        }

        Ok(AskOutcome::Answer(reply.answer()?))
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

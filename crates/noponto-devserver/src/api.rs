use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use noponto_shared::constants::{ASK_PATH, LOGIN_PATH, MSG_LOGIN_OK};
use noponto_shared::protocol::{AskRequest, AskResponse, LoginRequest, LoginResponse};

use crate::config::DevServerConfig;
use crate::error::DevServerError;
use crate::tokens::TokenRegistry;

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenRegistry,
    pub config: Arc<DevServerConfig>,
}

impl AppState {
    pub fn new(config: DevServerConfig) -> Self {
        Self {
            tokens: TokenRegistry::new(config.token_ttl_ms),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(LOGIN_PATH, post(login))
        .route(ASK_PATH, post(ask))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, DevServerError> {
    let email_ok = constant_time_eq(&req.email, &state.config.demo_email);
    let password_ok = constant_time_eq(&req.password, &state.config.demo_password);
    if !(email_ok && password_ok) {
        debug!(email = %req.email, "Rejected login");
        return Err(DevServerError::InvalidCredentials);
    }

    let token = state.tokens.issue(&req.email).await;
    info!(email = %req.email, "Issued session token");

    Ok(Json(LoginResponse {
        success: true,
        token: Some(token),
        message: Some(MSG_LOGIN_OK.to_string()),
    }))
}

async fn ask(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, DevServerError> {
    let email = verify_bearer(&headers, &state.tokens).await?;

    let question = req.question.trim();
    if question.is_empty() {
        return Err(DevServerError::BadRequest("Pergunta vazia".into()));
    }

    info!(user = %email, chars = question.chars().count(), "Answering question");
    Ok(Json(AskResponse::answered(canned_answer(question))))
}

async fn verify_bearer(headers: &HeaderMap, tokens: &TokenRegistry) -> Result<String, DevServerError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(DevServerError::Unauthorized)?;

    tokens
        .validate(token)
        .await
        .ok_or(DevServerError::Unauthorized)
}

fn canned_answer(question: &str) -> String {
    format!(
        "**Servidor de desenvolvimento**\n\nRecebi sua pergunta: \"{question}\".\n\
         Conecte o cliente ao serviço real para obter respostas de verdade."
    )
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.as_bytes().ct_eq(b.as_bytes()).unwrap_u8() == 1
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve on an ephemeral loopback port in a background task and return the
/// bound address.
pub async fn spawn_local(state: AppState) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;
    let app = build_router(state);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Dev server stopped");
        }
    });

    Ok(addr)
}

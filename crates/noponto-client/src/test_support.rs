//! Shared fixtures for the client's unit tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use noponto_devserver::{spawn_local, AppState, DevServerConfig};
use noponto_store::{ManualClock, MemorySessionStore};

use crate::auth::AuthSessionManager;

/// Arbitrary fixed "now" for manual clocks.
pub const T0: i64 = 1_700_000_000_000;

pub struct Harness {
    pub auth: Arc<AuthSessionManager>,
    pub store: Arc<MemorySessionStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(base_url: &str) -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let auth = AuthSessionManager::new(base_url, store.clone(), clock.clone());
    Harness {
        auth: Arc::new(auth),
        store,
        clock,
    }
}

/// Start the dev server on a loopback port and return its base URL.
pub async fn dev_server() -> (String, AppState) {
    let state = AppState::new(DevServerConfig::default());
    let addr = spawn_local(state.clone()).await.unwrap();
    (base_url(addr), state)
}

/// Serve an ad-hoc router on a loopback port and return its base URL.
pub async fn serve_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    base_url(addr)
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    base_url(addr)
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

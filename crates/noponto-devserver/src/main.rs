//! Local development server for the No Ponto chat client.
//!
//! Run with `cargo run -p noponto-devserver` and point the client at
//! `http://localhost:3002` (the client's development default).

use tracing::info;
use tracing_subscriber::EnvFilter;

use noponto_devserver::{serve, AppState, DevServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,noponto_devserver=debug")),
        )
        .init();

    info!("Starting No Ponto dev server v{}", env!("CARGO_PKG_VERSION"));

    let config = DevServerConfig::from_env();
    info!(
        addr = %config.http_addr,
        demo_email = %config.demo_email,
        token_ttl_ms = config.token_ttl_ms,
        "Loaded configuration"
    );

    let http_addr = config.http_addr;
    let state = AppState::new(config);

    // Drop expired tokens every 10 minutes
    let tokens = state.tokens.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            tokens.purge_expired().await;
        }
    });

    tokio::select! {
        result = serve(state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

use inkwire_server::auth::SharedSecretVerifier;
use inkwire_server::storage::MemoryStore;
use inkwire_server::{routes, AppState};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkwire_server=info,tower_http=info".into()),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3030u16);
    let secret = std::env::var("INKWIRE_SECRET").unwrap_or_else(|_| "dev-secret".into());

    let state = Arc::new(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(SharedSecretVerifier::new(secret)),
    ));
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Inkwire relay server listening on {}", addr);
    info!("WebSocket endpoint: ws://localhost:{}/ws", port);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("server error: {err}");
        std::process::exit(1);
    }
}

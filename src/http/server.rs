//! HTTP server setup and management

use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;

use super::handlers::{get_content, health, AppState};

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get/", get(get_content))
        .route("/health", get(health))
        .with_state(state)
}

/// Start the HTTP server; returns once the listener shuts down
pub async fn start(
    bind: &str,
    port: u16,
    state: AppState,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, port)).await?;
    tracing::info!("HTTP server listening on http://{}:{}/get/", bind, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;
    Ok(())
}

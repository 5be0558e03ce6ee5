use anyhow::{Context, Result};
use apikit::ProblemLayerExt;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::programmers::{self, ProgrammerStore};

/// Build the application router.
///
/// The problem pipeline is installed last, making it the outermost layer:
/// request tracing and every route sit inside it.
#[must_use]
pub fn build_router() -> Router {
    Router::new()
        .nest("/api", programmers::router(ProgrammerStore::default()))
        .layer(TraceLayer::new_for_http())
        .with_problem_pipeline()
}

/// Serve the application until Ctrl+C.
///
/// # Errors
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(%addr, "apikit server listening");

    axum::serve(listener, build_router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with an error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

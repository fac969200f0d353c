//! Static chunk store server.
//!
//! Serves a directory tree of chunk files as-is. The bridge's client reads
//! from it; so do browser runtimes, hence the permissive CORS layer.

use std::path::Path;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use tilebridge_core::config::ServeConfig;

/// Router serving `root` at `/`. Missing files answer 404.
pub fn router(root: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback_service(ServeDir::new(root.as_ref()))
        .layer(cors)
}

pub async fn serve(config: &ServeConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    serve_on(listener, &config.root).await
}

/// Serve on an already bound listener.
pub async fn serve_on(listener: TcpListener, root: impl AsRef<Path>) -> anyhow::Result<()> {
    let root = root.as_ref();
    let addr = listener.local_addr()?;
    tracing::info!(%addr, root = %root.display(), "chunk store listening");
    axum::serve(listener, router(root)).await?;
    Ok(())
}

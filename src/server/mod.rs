//! HTTP server exposing the interaction loop as a JSON API next to the single page.

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::errors::ChatResult;

/// Serve the chat page and the `/api` routes on every interface until `shutdown_signal`
/// completes.
///
/// CORS accepts any origin, method and header: the session holds no credentials, and the
/// page may be opened from another host or port during development. Every request is
/// logged through a `TraceLayer` span at the level set by `RUST_LOG`. In-flight requests,
/// such as a long PDF processing run, finish before the server returns.
///
/// # Errors
/// Returns [`ChatError::Io`](crate::core::errors::ChatError::Io) if the port cannot be bound
/// or the accept loop fails.
pub async fn run_server_with_shutdown<F>(
    state: Arc<AppState>,
    port: u16,
    shutdown_signal: F,
) -> ChatResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app: Router = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("PDF chat listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

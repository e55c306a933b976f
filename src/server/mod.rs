//! Host Server
//!
//! Serves the built browser bundle together with the client configuration it
//! reads at startup, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /config.json` - [`ClientConfig`](crate::page::ClientConfig) as JSON
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//! - everything else - static files from the dist directory, `index.html` fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use table_chart::config::Config;
//! use table_chart::server::{serve, ServerState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     serve(ServerState::from_config(&config)).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod routes;
mod state;

pub use error::{ServerError, ServerResult};
pub use state::ServerState;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::page::CLIENT_CONFIG_PATH;

/// Build the router with all routes and middleware
pub fn build_router(state: ServerState) -> ServerResult<Router> {
    let dist = state.dist_dir().clone();
    let static_files = ServeDir::new(&dist).fallback(ServeFile::new(dist.join("index.html")));

    let health_routes = Router::new()
        .route("/live", get(routes::liveness))
        .route("/", get(routes::full_health));

    let cors = cors_layer(&state.config.cors_origins)?;

    let shared_state = Arc::new(state);

    let router = Router::new()
        .route(CLIENT_CONFIG_PATH, get(routes::client_config))
        .nest("/health", health_routes)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    Ok(router.with_state(shared_state))
}

/// CORS layer for the configured origins; none when the list is empty
fn cors_layer(origins: &[String]) -> ServerResult<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| ServerError::Config(format!("invalid CORS origin {:?}: {}", o, e)))
        })
        .collect::<ServerResult<Vec<_>>>()?;

    Ok(Some(CorsLayer::new().allow_origin(origins)))
}

/// Start the host server
pub async fn serve(state: ServerState) -> ServerResult<()> {
    let addr = state.config.addr();

    if !state.has_bundle() {
        tracing::warn!(
            "No UI bundle at {:?}; build table-chart-ui first",
            state.dist_dir()
        );
    }

    let router = build_router(state)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Table Chart listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Table Chart shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

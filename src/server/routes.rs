//! Routes
//!
//! - GET /config.json - Client configuration for the browser app
//! - GET /health/live - Liveness probe
//! - GET /health - Status, version, uptime, bundle presence

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use super::error::ServerResult;
use super::state::ServerState;
use crate::page::{server_endpoint, ClientConfig};

/// GET /config.json
///
/// A configured backend URL that cannot yield an endpoint is reported here
/// instead of inside every browser.
pub async fn client_config(State(state): State<Arc<ServerState>>) -> ServerResult<Json<ClientConfig>> {
    if let Some(url) = state.client.core_api_url.as_deref() {
        server_endpoint(Some(url), url)?;
    }

    Ok(Json(state.client.as_ref().clone()))
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub bundle: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health
pub async fn full_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let (status, bundle) = if state.has_bundle() {
        ("healthy", "ok")
    } else {
        ("degraded", "missing")
    };

    Json(HealthResponse {
        status: status.to_string(),
        bundle: bundle.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}

//! Server State
//!
//! Shared state accessible by all handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, ServerConfig};
use crate::page::ClientConfig;

/// Shared state for all handlers
#[derive(Clone)]
pub struct ServerState {
    /// Settings published to the browser app
    pub client: Arc<ClientConfig>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(client: ClientConfig, config: ServerConfig) -> Self {
        Self {
            client: Arc::new(client),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backend.clone(), config.server.clone())
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn dist_dir(&self) -> &PathBuf {
        &self.config.dist_dir
    }

    /// Whether the UI bundle has been built
    pub fn has_bundle(&self) -> bool {
        self.config.dist_dir.join("index.html").is_file()
    }
}

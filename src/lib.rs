//! # Table Chart
//!
//! Fetch or create a table on an analytics session server and render it as a
//! bar chart.
//!
//! ## Modules
//!
//! - [`session`]: Capability traits for the remote backend, plus an in-process backend
//! - [`table`]: Viewport snapshots and their flattening into chart points
//! - [`pipeline`]: Acquisition, presentation and the load status state machine
//! - [`chart`]: Bar chart geometry
//! - [`page`]: Query parameters, endpoint derivation, client configuration
//! - `config`, `server` (feature `server`): configuration files and the host server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use table_chart::pipeline::{self, LoadRequest, LoadStatus};
//! use table_chart::session::MemoryConnection;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let connection = MemoryConnection::example();
//!
//!     match pipeline::run(&connection, &LoadRequest::for_table(None)).await {
//!         LoadStatus::Loaded(points) => println!("{} points", points.len()),
//!         LoadStatus::Failed(message) => eprintln!("{}", message),
//!         LoadStatus::Loading => unreachable!(),
//!     }
//! }
//! ```

pub mod chart;
pub mod page;
pub mod pipeline;
pub mod session;
pub mod table;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;

// Re-export top-level types for convenience
pub use chart::{ChartLayout, ChartSize};

pub use page::{ClientConfig, EndpointError};

pub use pipeline::{
    LoadError, LoadRequest, LoadResult, LoadStatus, LoadTracker, MountGuard, TableSelection,
    TransitionError,
};

pub use session::{
    CommandResult, Connection, MemoryConnection, Session, Table, VariableDefinition, VariableKind,
};

pub use table::{CellValue, ChartPoint, Column, Row, ViewportData};

#[cfg(feature = "server")]
pub use config::{Config, ConfigError, LoggingConfig, ServerConfig};

#[cfg(feature = "server")]
pub use server::{build_router, serve, ServerError, ServerState};

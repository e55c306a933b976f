//! Session Backends
//!
//! The remote analytics server is reached through three capability traits:
//!
//! - [`Connection`]: one per application run, starts sessions
//! - [`Session`]: one execution context, fetches objects and runs code
//! - [`Table`]: a remote table handle, released by consuming it with [`Table::close`]
//!
//! The traits are `?Send` because browser-side handles live on a single
//! thread. [`MemoryConnection`] is an in-process implementation used by the
//! tests, the benches and `table-chart preview`.

mod memory;

pub use memory::{MemoryConnection, MemorySession, MemoryTable};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::pipeline::LoadResult;
use crate::table::ViewportData;

/// Kind of a server-side variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    Table,
    Figure,
    #[serde(other)]
    Other,
}

/// Reference to a named server-side object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
}

impl VariableDefinition {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Table,
        }
    }
}

/// Variables touched by a command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableChanges {
    #[serde(default)]
    pub created: Vec<VariableDefinition>,
    #[serde(default)]
    pub updated: Vec<VariableDefinition>,
    #[serde(default)]
    pub removed: Vec<VariableDefinition>,
}

/// Outcome of running code in a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub changes: VariableChanges,
}

impl CommandResult {
    /// The error message, treating an empty string as no error
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Handle to the analytics backend
#[async_trait(?Send)]
pub trait Connection {
    type Session: Session;

    /// Start an execution context for `language` (e.g. `python`)
    async fn start_session(&self, language: &str) -> LoadResult<Self::Session>;
}

/// A backend execution context
#[async_trait(?Send)]
pub trait Session {
    type Table: Table;

    /// Resolve a server-side object as a table handle
    async fn get_object(&self, definition: &VariableDefinition) -> LoadResult<Self::Table>;

    /// Run a command in the session's language
    async fn run_code(&self, code: &str) -> LoadResult<CommandResult>;
}

/// A remote table handle
#[async_trait(?Send)]
pub trait Table {
    /// Total row count
    fn size(&self) -> usize;

    /// Ask the server to materialize the row window `rows`
    fn set_viewport(&self, rows: Range<usize>) -> LoadResult<()>;

    /// Snapshot of the current viewport; waits for the server
    async fn viewport_data(&self) -> LoadResult<ViewportData>;

    /// Release server-side resources
    fn close(self);
}

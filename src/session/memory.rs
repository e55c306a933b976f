//! In-process session backend
//!
//! Tables and command outcomes are registered up front; the backend counts
//! open table handles so callers can check that every handle was released.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use super::{CommandResult, Connection, Session, Table, VariableChanges, VariableDefinition, VariableKind};
use crate::pipeline::acquire::{CREATE_COMMAND, EXAMPLE_ROWS, EXAMPLE_TABLE, IMPORT_COMMAND};
use crate::pipeline::{LoadError, LoadResult};
use crate::table::ViewportData;

/// What a registered command does when run
#[derive(Debug, Clone)]
enum Script {
    Creates(Vec<(String, ViewportData)>),
    Fails(String),
}

#[derive(Debug, Default)]
struct Backend {
    tables: RefCell<HashMap<String, ViewportData>>,
    scripts: RefCell<HashMap<String, Script>>,
    failing_viewports: RefCell<HashSet<String>>,
    executed: RefCell<Vec<String>>,
    unreachable: Cell<bool>,
    open_handles: Cell<usize>,
    released_handles: Cell<usize>,
}

/// In-process backend connection
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    backend: Rc<Backend>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that understands the example-table commands
    pub fn example() -> Self {
        Self::new().with_example_scripts()
    }

    /// Register an existing table
    pub fn with_table(self, name: impl Into<String>, data: ViewportData) -> Self {
        self.backend.tables.borrow_mut().insert(name.into(), data);
        self
    }

    /// Register a command that succeeds without creating anything
    pub fn with_command(self, code: impl Into<String>) -> Self {
        self.register(code, Script::Creates(Vec::new()))
    }

    /// Register a command that creates table `name`
    pub fn with_creating_command(
        self,
        code: impl Into<String>,
        name: impl Into<String>,
        data: ViewportData,
    ) -> Self {
        self.register(code, Script::Creates(vec![(name.into(), data)]))
    }

    /// Register a command whose result carries `error`
    pub fn with_failing_command(self, code: impl Into<String>, error: impl Into<String>) -> Self {
        self.register(code, Script::Fails(error.into()))
    }

    /// Register the import and create commands used for the example table
    pub fn with_example_scripts(self) -> Self {
        self.with_command(IMPORT_COMMAND)
            .with_creating_command(CREATE_COMMAND, EXAMPLE_TABLE, example_data())
    }

    /// Make viewport reads on table `name` fail
    pub fn with_failing_viewport(self, name: impl Into<String>) -> Self {
        self.backend.failing_viewports.borrow_mut().insert(name.into());
        self
    }

    /// Make session start fail as if the server could not be reached
    pub fn unreachable(self) -> Self {
        self.backend.unreachable.set(true);
        self
    }

    /// Table handles handed out and not yet closed
    pub fn open_handles(&self) -> usize {
        self.backend.open_handles.get()
    }

    /// Table handles closed so far
    pub fn released_handles(&self) -> usize {
        self.backend.released_handles.get()
    }

    /// Commands run so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.backend.executed.borrow().clone()
    }

    fn register(self, code: impl Into<String>, script: Script) -> Self {
        self.backend.scripts.borrow_mut().insert(code.into(), script);
        self
    }
}

/// The example dataset: `x = i`, `y = i * i` for `EXAMPLE_ROWS` rows
pub(crate) fn example_data() -> ViewportData {
    (0..EXAMPLE_ROWS as i64).fold(ViewportData::new(["x", "y"]), |data, i| {
        data.row([i, i * i])
    })
}

#[async_trait(?Send)]
impl Connection for MemoryConnection {
    type Session = MemorySession;

    async fn start_session(&self, language: &str) -> LoadResult<MemorySession> {
        if self.backend.unreachable.get() {
            return Err(LoadError::Transport("connection refused".to_string()));
        }

        Ok(MemorySession {
            backend: Rc::clone(&self.backend),
            language: language.to_string(),
        })
    }
}

/// Session on a [`MemoryConnection`]
#[derive(Debug)]
pub struct MemorySession {
    backend: Rc<Backend>,
    language: String,
}

impl MemorySession {
    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait(?Send)]
impl Session for MemorySession {
    type Table = MemoryTable;

    async fn get_object(&self, definition: &VariableDefinition) -> LoadResult<MemoryTable> {
        if definition.kind != VariableKind::Table {
            return Err(LoadError::Protocol(format!(
                "{} is not a table",
                definition.name
            )));
        }

        let data = self
            .backend
            .tables
            .borrow()
            .get(&definition.name)
            .cloned()
            .ok_or_else(|| LoadError::Lookup(definition.name.clone()))?;

        self.backend.open_handles.set(self.backend.open_handles.get() + 1);

        Ok(MemoryTable {
            backend: Rc::clone(&self.backend),
            fail_viewport: self
                .backend
                .failing_viewports
                .borrow()
                .contains(&definition.name),
            data,
            viewport: RefCell::new(None),
        })
    }

    async fn run_code(&self, code: &str) -> LoadResult<CommandResult> {
        self.backend.executed.borrow_mut().push(code.to_string());

        let script = self.backend.scripts.borrow().get(code).cloned();
        let result = match script {
            Some(Script::Creates(tables)) => {
                let mut created = Vec::with_capacity(tables.len());
                let mut registry = self.backend.tables.borrow_mut();
                for (name, data) in tables {
                    created.push(VariableDefinition::table(name.as_str()));
                    registry.insert(name, data);
                }
                CommandResult {
                    error: None,
                    changes: VariableChanges {
                        created,
                        ..Default::default()
                    },
                }
            }
            Some(Script::Fails(error)) => CommandResult {
                error: Some(error),
                ..Default::default()
            },
            None => CommandResult {
                error: Some(format!("SyntaxError: unrecognized command {:?}", code)),
                ..Default::default()
            },
        };

        Ok(result)
    }
}

/// Table handle from a [`MemorySession`]
#[derive(Debug)]
pub struct MemoryTable {
    backend: Rc<Backend>,
    data: ViewportData,
    viewport: RefCell<Option<Range<usize>>>,
    fail_viewport: bool,
}

#[async_trait(?Send)]
impl Table for MemoryTable {
    fn size(&self) -> usize {
        self.data.rows.len()
    }

    fn set_viewport(&self, rows: Range<usize>) -> LoadResult<()> {
        *self.viewport.borrow_mut() = Some(rows);
        Ok(())
    }

    async fn viewport_data(&self) -> LoadResult<ViewportData> {
        if self.fail_viewport {
            return Err(LoadError::Transport("viewport subscription closed".to_string()));
        }

        let rows = self
            .viewport
            .borrow()
            .clone()
            .ok_or_else(|| LoadError::Protocol("no viewport set".to_string()))?;

        Ok(self.data.window(rows))
    }

    fn close(self) {
        self.backend.open_handles.set(self.backend.open_handles.get() - 1);
        self.backend
            .released_handles
            .set(self.backend.released_handles.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_object_counts_handles() {
        let conn = MemoryConnection::new().with_table("t", example_data());
        let session = conn.start_session("python").await.unwrap();

        let table = session.get_object(&VariableDefinition::table("t")).await.unwrap();
        assert_eq!(conn.open_handles(), 1);
        assert_eq!(table.size(), 10);

        table.close();
        assert_eq!(conn.open_handles(), 0);
        assert_eq!(conn.released_handles(), 1);
    }

    #[tokio::test]
    async fn test_missing_table_is_lookup_error() {
        let conn = MemoryConnection::new();
        let session = conn.start_session("python").await.unwrap();

        let err = session
            .get_object(&VariableDefinition::table("nope"))
            .await
            .unwrap_err();
        assert_eq!(err, LoadError::Lookup("nope".to_string()));
        assert_eq!(conn.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_creating_command_registers_table() {
        let conn = MemoryConnection::example();
        let session = conn.start_session("python").await.unwrap();

        let result = session.run_code(CREATE_COMMAND).await.unwrap();
        assert_eq!(result.error_message(), None);
        assert_eq!(result.changes.created, vec![VariableDefinition::table(EXAMPLE_TABLE)]);

        let table = session.get_object(&result.changes.created[0]).await.unwrap();
        assert_eq!(table.size(), EXAMPLE_ROWS);
        table.close();
    }

    #[tokio::test]
    async fn test_unknown_command_reports_error() {
        let conn = MemoryConnection::new();
        let session = conn.start_session("python").await.unwrap();

        let result = session.run_code("print(1)").await.unwrap();
        assert!(result.error_message().unwrap().contains("unrecognized"));
        assert_eq!(conn.executed(), vec!["print(1)".to_string()]);
    }

    #[tokio::test]
    async fn test_viewport_window() {
        let conn = MemoryConnection::new().with_table("t", example_data());
        let session = conn.start_session("python").await.unwrap();
        let table = session.get_object(&VariableDefinition::table("t")).await.unwrap();

        assert!(table.viewport_data().await.is_err());

        table.set_viewport(2..5).unwrap();
        let data = table.viewport_data().await.unwrap();
        assert_eq!(data.offset, 2);
        assert_eq!(data.rows.len(), 3);
        table.close();
    }

    #[tokio::test]
    async fn test_unreachable() {
        let conn = MemoryConnection::new().unreachable();
        let err = conn.start_session("python").await.unwrap_err();
        assert!(matches!(err, LoadError::Transport(_)));
    }
}

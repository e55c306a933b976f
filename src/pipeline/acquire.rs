//! Data acquisition
//!
//! Obtains the table to chart: either an existing table looked up by name, or
//! a small example table created on demand.

use crate::session::{Session, VariableDefinition};

use super::error::{LoadError, LoadResult};

/// Imports the table construction primitives on the server
pub const IMPORT_COMMAND: &str = "from deephaven.TableTools import emptyTable";

/// Builds the example table: `x = i`, `y = i * i`
pub const CREATE_COMMAND: &str = r#"t = emptyTable(10).update("x=i", "y=i*i")"#;

/// Variable the example table is bound to
pub const EXAMPLE_TABLE: &str = "t";

/// Row count of the example table
pub const EXAMPLE_ROWS: usize = 10;

/// Which table the pipeline loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelection {
    /// Look up an existing table by name
    Named(String),
    /// Create the example table
    CreateExample,
}

impl TableSelection {
    /// Selection from an optional name; an empty name counts as absent
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) if !name.is_empty() => TableSelection::Named(name.to_string()),
            _ => TableSelection::CreateExample,
        }
    }
}

/// Resolve `selection` to a table handle
pub async fn acquire<S: Session>(session: &S, selection: &TableSelection) -> LoadResult<S::Table> {
    match selection {
        TableSelection::Named(name) => load_table(session, name).await,
        TableSelection::CreateExample => create_table(session).await,
    }
}

/// Fetch an existing table by name
pub async fn load_table<S: Session>(session: &S, name: &str) -> LoadResult<S::Table> {
    tracing::info!("Fetching table {}...", name);

    session.get_object(&VariableDefinition::table(name)).await
}

/// Create the example table and fetch the object the server reports as created
pub async fn create_table<S: Session>(session: &S) -> LoadResult<S::Table> {
    tracing::info!("Creating table...");

    run_checked(session, IMPORT_COMMAND).await?;
    let result = run_checked(session, CREATE_COMMAND).await?;

    let definition = result
        .changes
        .created
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::Protocol("command created no objects".to_string()))?;

    tracing::info!("Fetching table {}...", definition.name);

    session.get_object(&definition).await
}

/// Run `code`, turning an error in the result into [`LoadError::Execution`]
async fn run_checked<S: Session>(
    session: &S,
    code: &str,
) -> LoadResult<crate::session::CommandResult> {
    let result = session.run_code(code).await?;
    if let Some(error) = result.error_message() {
        return Err(LoadError::Execution(error.to_string()));
    }
    Ok(result)
}

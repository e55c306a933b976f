//! Session Bridge
//!
//! Implements the pipeline's session traits on top of the JS client handles.
//! Promise rejections become [`LoadError`]s; viewport snapshots are copied into
//! plain [`ViewportData`] before they reach the pipeline.

use async_trait::async_trait;
use std::ops::Range;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use table_chart::pipeline::{LoadError, LoadResult};
use table_chart::session::{
    CommandResult, Connection, Session, Table, VariableChanges, VariableDefinition,
};
use table_chart::table::{CellValue, Column, Row, ViewportData};

use crate::jsapi::{
    IdeConnection, IdeSession, JsColumn, JsCommandResult, JsRow, JsTable, JsViewportData,
};

/// Connection through the JS client
pub struct JsConnection {
    inner: IdeConnection,
}

impl JsConnection {
    /// Open a connection to `endpoint` (`scheme://host[:port]`)
    pub fn connect(endpoint: &str) -> LoadResult<Self> {
        tracing::info!("Starting connection...");
        let inner = IdeConnection::new(endpoint)
            .map_err(|e| LoadError::Transport(js_error_message(&e)))?;
        Ok(Self { inner })
    }
}

impl Drop for JsConnection {
    fn drop(&mut self) {
        self.inner.close();
    }
}

#[async_trait(?Send)]
impl Connection for JsConnection {
    type Session = JsSession;

    async fn start_session(&self, language: &str) -> LoadResult<JsSession> {
        let session = JsFuture::from(self.inner.start_session(language))
            .await
            .map_err(|e| LoadError::Transport(js_error_message(&e)))?;

        Ok(JsSession {
            inner: session.unchecked_into(),
        })
    }
}

/// Session through the JS client
pub struct JsSession {
    inner: IdeSession,
}

#[async_trait(?Send)]
impl Session for JsSession {
    type Table = JsTableHandle;

    async fn get_object(&self, definition: &VariableDefinition) -> LoadResult<JsTableHandle> {
        let js_definition = serde_wasm_bindgen::to_value(definition)
            .map_err(|e| LoadError::Protocol(e.to_string()))?;

        let table = JsFuture::from(self.inner.get_object(&js_definition))
            .await
            .map_err(|e| {
                LoadError::Lookup(format!("{} ({})", definition.name, js_error_message(&e)))
            })?;

        Ok(JsTableHandle {
            inner: table.unchecked_into(),
        })
    }

    async fn run_code(&self, code: &str) -> LoadResult<CommandResult> {
        let result: JsCommandResult = JsFuture::from(self.inner.run_code(code))
            .await
            .map_err(|e| LoadError::Execution(js_error_message(&e)))?
            .unchecked_into();

        let changes = result.changes();
        let changes = if changes.is_undefined() || changes.is_null() {
            VariableChanges::default()
        } else {
            serde_wasm_bindgen::from_value(changes)
                .map_err(|e| LoadError::Protocol(format!("unreadable command result: {}", e)))?
        };

        Ok(CommandResult {
            error: result.error().as_string(),
            changes,
        })
    }
}

/// Table handle through the JS client
pub struct JsTableHandle {
    inner: JsTable,
}

#[async_trait(?Send)]
impl Table for JsTableHandle {
    fn size(&self) -> usize {
        self.inner.size().max(0.0) as usize
    }

    fn set_viewport(&self, rows: Range<usize>) -> LoadResult<()> {
        // The JS client takes an inclusive last row
        let last = rows.end.saturating_sub(1).max(rows.start);
        self.inner
            .set_viewport(rows.start as f64, last as f64)
            .map_err(|e| LoadError::Transport(js_error_message(&e)))
    }

    async fn viewport_data(&self) -> LoadResult<ViewportData> {
        let data: JsViewportData = JsFuture::from(self.inner.get_viewport_data())
            .await
            .map_err(|e| LoadError::Transport(js_error_message(&e)))?
            .unchecked_into();

        Ok(copy_viewport(&data))
    }

    fn close(self) {
        self.inner.close();
    }
}

/// Copy a JS snapshot into a plain one, reading cells in column order
fn copy_viewport(data: &JsViewportData) -> ViewportData {
    let js_columns: Vec<JsColumn> = data
        .columns()
        .iter()
        .map(|c| c.unchecked_into::<JsColumn>())
        .collect();

    let columns = js_columns
        .iter()
        .enumerate()
        .map(|(i, c)| Column::new(i, c.name()))
        .collect();

    let rows = data
        .rows()
        .iter()
        .map(|row| {
            let row: JsRow = row.unchecked_into();
            Row::new(js_columns.iter().map(|c| cell_from_js(&row.get(c))).collect())
        })
        .collect();

    ViewportData {
        offset: data.offset().max(0.0) as usize,
        columns,
        rows,
    }
}

/// Convert a JS cell value
pub fn cell_from_js(value: &JsValue) -> CellValue {
    if value.is_null() || value.is_undefined() {
        return CellValue::Null;
    }
    if let Some(n) = value.as_f64() {
        return CellValue::Number(n);
    }
    if let Some(s) = value.as_string() {
        return CellValue::Text(s);
    }

    // Wrapped numerics (longs, big decimals) convert through `Number(value)`
    let n = js_sys::Number::new(value).value_of();
    if !n.is_nan() {
        return CellValue::Number(n);
    }

    CellValue::Text(String::from(
        value.unchecked_ref::<js_sys::Object>().to_string(),
    ))
}

/// Best-effort message out of a thrown or rejected JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}

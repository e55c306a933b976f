//! Analytics Server JS Client Bindings
//!
//! Declarations for the subset of the server's browser client (loaded by the
//! host page as the global `dh`) the pipeline uses. Every async call returns a
//! `Promise`; [`crate::bridge`] awaits them.

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Connection to the server's IDE endpoint
    #[wasm_bindgen(js_namespace = dh)]
    pub type IdeConnection;

    #[wasm_bindgen(constructor, js_namespace = dh, catch)]
    pub fn new(server_url: &str) -> Result<IdeConnection, JsValue>;

    /// Resolves to an [`IdeSession`]
    #[wasm_bindgen(method, js_name = startSession)]
    pub fn start_session(this: &IdeConnection, language: &str) -> Promise;

    #[wasm_bindgen(method)]
    pub fn close(this: &IdeConnection);

    /// A code session on the server
    pub type IdeSession;

    /// Resolves to a [`JsTable`]; `definition` is `{ name, type }`
    #[wasm_bindgen(method, js_name = getObject)]
    pub fn get_object(this: &IdeSession, definition: &JsValue) -> Promise;

    /// Resolves to a [`JsCommandResult`]
    #[wasm_bindgen(method, js_name = runCode)]
    pub fn run_code(this: &IdeSession, code: &str) -> Promise;

    /// Result of `runCode`
    pub type JsCommandResult;

    #[wasm_bindgen(method, getter)]
    pub fn error(this: &JsCommandResult) -> JsValue;

    #[wasm_bindgen(method, getter)]
    pub fn changes(this: &JsCommandResult) -> JsValue;

    /// Remote table handle
    #[wasm_bindgen(js_name = Table)]
    pub type JsTable;

    #[wasm_bindgen(method, getter)]
    pub fn size(this: &JsTable) -> f64;

    /// `last_row` is inclusive
    #[wasm_bindgen(method, js_name = setViewport, catch)]
    pub fn set_viewport(this: &JsTable, first_row: f64, last_row: f64) -> Result<(), JsValue>;

    /// Resolves to a [`JsViewportData`]
    #[wasm_bindgen(method, js_name = getViewportData)]
    pub fn get_viewport_data(this: &JsTable) -> Promise;

    #[wasm_bindgen(method)]
    pub fn close(this: &JsTable);

    /// Snapshot of a table viewport
    #[wasm_bindgen(js_name = ViewportData)]
    pub type JsViewportData;

    #[wasm_bindgen(method, getter)]
    pub fn offset(this: &JsViewportData) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn columns(this: &JsViewportData) -> Array;

    #[wasm_bindgen(method, getter)]
    pub fn rows(this: &JsViewportData) -> Array;

    /// Table column
    #[wasm_bindgen(js_name = Column)]
    pub type JsColumn;

    #[wasm_bindgen(method, getter)]
    pub fn name(this: &JsColumn) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn index(this: &JsColumn) -> f64;

    /// Viewport row
    #[wasm_bindgen(js_name = Row)]
    pub type JsRow;

    #[wasm_bindgen(method)]
    pub fn get(this: &JsRow, column: &JsColumn) -> JsValue;
}

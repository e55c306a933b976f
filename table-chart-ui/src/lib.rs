//! Table Chart UI
//!
//! Leptos (WASM) front-end: loads one table from the analytics server and
//! renders it as a bar chart.
//!
//! # Entry points
//!
//! The host page loads the server's JS client (global `dh`) and this bundle,
//! then calls one of:
//!
//! - [`start`]: render into the page body, table from `?tableName=`
//! - [`mount`]: render into a host element's shadow root (used by the
//!   `iris-grid` custom element, whose `name` attribute selects the table)
//!
//! Both return a [`MountHandle`]; [`MountHandle::unmount`] tears the view down
//! and drops any load result that arrives afterwards.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use leptos::*;
use table_chart::pipeline::MountGuard;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

mod api;
mod app;
pub mod bridge;
mod components;
pub mod jsapi;

use app::App;

const STYLES: &str = r#"
.table-chart { position: relative; width: 400px; height: 300px; font-family: sans-serif; }
.table-chart canvas { display: block; }
.loading-overlay { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; background: #1f2937; color: #e5e7eb; }
.loading-spinner { width: 32px; height: 32px; border: 3px solid #374151; border-top-color: #ff9800; border-radius: 50%; animation: spin 0.8s linear infinite; }
.load-error { color: #f87171; padding: 16px; text-align: center; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

static INIT: Once = Once::new();

/// Install the panic hook and the console tracing subscriber
fn init_once() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}

/// A mounted chart view
#[wasm_bindgen]
pub struct MountHandle {
    guard: MountGuard,
    container: HtmlElement,
    style: HtmlElement,
    /// Owner of the view's signals and effects; dropping it disposes them
    disposer: Rc<RefCell<Option<Disposer>>>,
}

#[wasm_bindgen]
impl MountHandle {
    /// Remove the view; a load still in flight is discarded when it settles
    pub fn unmount(&self) {
        if !self.guard.is_mounted() {
            return;
        }
        self.guard.release();
        drop(self.disposer.borrow_mut().take());
        self.container.set_inner_html("");
        self.container.remove();
        self.style.remove();
        tracing::debug!("Chart view unmounted");
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.guard.is_mounted()
    }

    /// Whether the view's reactive state is still alive
    #[wasm_bindgen(getter)]
    pub fn live(&self) -> bool {
        self.disposer.borrow().is_some()
    }
}

/// Render into the page body, reading `tableName` from the page URL
#[wasm_bindgen]
pub fn start() -> Result<MountHandle, JsValue> {
    init_once();

    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    mount(body, api::page_table_name())
}

/// Render into `host`'s shadow root. `name` selects the table; unset or empty
/// creates the example table.
#[wasm_bindgen]
pub fn mount(host: HtmlElement, name: Option<String>) -> Result<MountHandle, JsValue> {
    init_once();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let root = match host.shadow_root() {
        Some(root) => root,
        None => host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?,
    };

    let style: HtmlElement = document.create_element("style")?.unchecked_into();
    style.set_text_content(Some(STYLES));
    let container: HtmlElement = document.create_element("div")?.unchecked_into();
    attach(&root, &style, &container)?;

    tracing::info!(table = name.as_deref().unwrap_or(""), "Mounting chart view");

    let guard = MountGuard::new();
    let view_guard = guard.clone();
    let disposer = Rc::new(RefCell::new(None));

    // Render under a child owner so unmount can dispose it
    let render = as_child_of_current_owner(|(name, guard): (Option<String>, MountGuard)| {
        view! { <App table_name=name guard=guard /> }.into_view()
    });
    let slot = Rc::clone(&disposer);
    mount_to(container.clone(), move || {
        let (view, view_disposer) = render((name, view_guard));
        *slot.borrow_mut() = Some(view_disposer);
        view
    });

    Ok(MountHandle {
        guard,
        container,
        style,
        disposer,
    })
}

fn attach(root: &ShadowRoot, style: &HtmlElement, container: &HtmlElement) -> Result<(), JsValue> {
    root.append_child(style)?;
    root.append_child(container)?;
    Ok(())
}

//! App Root Component
//!
//! One chart view: starts a single load when created, renders the tracker's
//! status.

use leptos::*;
use table_chart::pipeline::{self, LoadStatus, LoadTracker, MountGuard};

use crate::api;
use crate::bridge::JsConnection;
use crate::components::{BarChart, LoadingOverlay};

/// Root component for one mounted chart
#[component]
pub fn App(table_name: Option<String>, guard: MountGuard) -> impl IntoView {
    let tracker = create_rw_signal(LoadTracker::new());

    let cleanup_guard = guard.clone();
    on_cleanup(move || cleanup_guard.release());

    let started = tracker
        .try_update(|t| t.begin().is_ok())
        .unwrap_or(false);

    if started {
        spawn_local(async move {
            let status = load(table_name.as_deref()).await;

            guard.if_mounted(move || {
                tracker.update(move |t| {
                    if let Err(e) = t.settle(status) {
                        tracing::warn!("Ignoring load result: {}", e);
                    }
                });
            });
        });
    }

    view! {
        <div class="table-chart">
            {move || tracker.with(|t| match t.status() {
                LoadStatus::Loaded(points) => {
                    view! { <BarChart points=points.clone() /> }.into_view()
                }
                LoadStatus::Failed(message) => {
                    view! { <LoadingOverlay error=Some(message.clone()) /> }.into_view()
                }
                LoadStatus::Loading => view! { <LoadingOverlay error=None /> }.into_view(),
            })}
        </div>
    }
}

/// Connect to the configured server and run the pipeline
async fn load(table_name: Option<&str>) -> LoadStatus {
    let config = api::fetch_client_config().await;
    let request = config.request(table_name);

    let endpoint = match config.endpoint(&api::page_origin()) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::error!("Unable to load table: {}", e);
            return LoadStatus::Failed(e.to_string());
        }
    };

    match JsConnection::connect(&endpoint) {
        Ok(connection) => pipeline::run(&connection, &request).await,
        Err(e) => {
            tracing::error!("Unable to load table: {}", e);
            LoadStatus::Failed(e.to_string())
        }
    }
}

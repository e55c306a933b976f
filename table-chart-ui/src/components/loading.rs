//! Loading Component
//!
//! Placeholder shown until the load settles, or the error when it fails.

use leptos::*;

/// Spinner while loading; the message once `error` is set
#[component]
pub fn LoadingOverlay(error: Option<String>) -> impl IntoView {
    view! {
        <div class="loading-overlay">
            {match error {
                Some(message) => view! { <div class="load-error">{message}</div> }.into_view(),
                None => view! { <div class="loading-spinner" /> }.into_view(),
            }}
        </div>
    }
}

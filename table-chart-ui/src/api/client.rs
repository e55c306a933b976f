//! Host API Client
//!
//! Reads the client configuration and the page's own URL.

use gloo_net::http::Request;
use table_chart::page::{table_name_from_url, CLIENT_CONFIG_PATH};
use table_chart::ClientConfig;

/// Fetch `/config.json`, falling back to defaults when it is missing or unreadable
pub async fn fetch_client_config() -> ClientConfig {
    match try_fetch_client_config().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Using default client config: {}", e);
            ClientConfig::default()
        }
    }
}

async fn try_fetch_client_config() -> Result<ClientConfig, String> {
    let response = Request::get(CLIENT_CONFIG_PATH)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Origin of the current page (`scheme://host[:port]`)
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// `tableName` from the current page URL, if set
pub fn page_table_name() -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    table_name_from_url(&href)
}

//! Page parameters
//!
//! Everything the browser host reads before the pipeline starts: the
//! `tableName` query parameter, the backend endpoint, and the client
//! configuration document served at `/config.json`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::pipeline::{LoadRequest, DEFAULT_LANGUAGE};

/// Query parameter selecting name-lookup mode
pub const TABLE_NAME_PARAM: &str = "tableName";

/// Path the host server publishes [`ClientConfig`] at
pub const CLIENT_CONFIG_PATH: &str = "/config.json";

/// Endpoint derivation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid server URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Server URL {0:?} has no host")]
    MissingHost(String),
}

/// Client-side settings, shared between the host server and the browser app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the analytics server; the page origin when unset
    #[serde(default)]
    pub core_api_url: Option<String>,

    #[serde(default = "default_session_language")]
    pub session_language: String,
}

fn default_session_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            core_api_url: None,
            session_language: default_session_language(),
        }
    }
}

impl ClientConfig {
    /// Endpoint for the backend connection, falling back to `page_origin`
    pub fn endpoint(&self, page_origin: &str) -> Result<String, EndpointError> {
        server_endpoint(self.core_api_url.as_deref(), page_origin)
    }

    /// Load request for an optional table name
    pub fn request(&self, table_name: Option<&str>) -> LoadRequest {
        LoadRequest::for_table(table_name).language(self.session_language.as_str())
    }
}

/// Connection endpoint from a base URL: scheme, host and port only.
///
/// `http://localhost:10000/jsapi` becomes `http://localhost:10000`. An unset
/// or blank `base` uses `page_origin` instead.
pub fn server_endpoint(base: Option<&str>, page_origin: &str) -> Result<String, EndpointError> {
    let raw = base
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(page_origin);

    let url = Url::parse(raw).map_err(|e| EndpointError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    // IPv6 hosts come back bracketed
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| EndpointError::MissingHost(raw.to_string()))?;

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Value of `tableName` in a query string (with or without the leading `?`)
pub fn table_name_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TABLE_NAME_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Table name from a full page URL
pub fn table_name_from_url(page_url: &str) -> Option<String> {
    Url::parse(page_url)
        .ok()
        .and_then(|url| url.query().and_then(table_name_from_query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TableSelection;

    #[test]
    fn test_endpoint_keeps_scheme_host_port() {
        assert_eq!(
            server_endpoint(Some("http://localhost:10000/jsapi"), "http://ignored").unwrap(),
            "http://localhost:10000"
        );
        assert_eq!(
            server_endpoint(Some("https://dh.example.com/ide/?x=1#f"), "http://ignored").unwrap(),
            "https://dh.example.com"
        );
    }

    #[test]
    fn test_endpoint_custom_scheme_and_ipv6() {
        assert_eq!(
            server_endpoint(Some("dh://host:10000/jsapi"), "http://x").unwrap(),
            "dh://host:10000"
        );
        assert_eq!(
            server_endpoint(Some("ws://[::1]:8080/socket"), "http://x").unwrap(),
            "ws://[::1]:8080"
        );
        assert_eq!(
            server_endpoint(Some("https://example.com:443/jsapi"), "http://x").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_endpoint_falls_back_to_origin() {
        assert_eq!(
            server_endpoint(None, "http://127.0.0.1:3000/?tableName=t").unwrap(),
            "http://127.0.0.1:3000"
        );
        assert_eq!(
            server_endpoint(Some("  "), "http://127.0.0.1:3000").unwrap(),
            "http://127.0.0.1:3000"
        );
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        assert!(matches!(
            server_endpoint(Some("not a url"), "http://x"),
            Err(EndpointError::InvalidUrl { .. })
        ));
        assert!(matches!(
            server_endpoint(Some("data:text/plain,hi"), "http://x"),
            Err(EndpointError::MissingHost(_))
        ));
    }

    #[test]
    fn test_table_name_from_query() {
        assert_eq!(table_name_from_query("?tableName=prices"), Some("prices".to_string()));
        assert_eq!(
            table_name_from_query("a=1&tableName=my%20table"),
            Some("my table".to_string())
        );
        assert_eq!(table_name_from_query("?other=1"), None);
        assert_eq!(table_name_from_query(""), None);
    }

    #[test]
    fn test_table_name_from_url() {
        assert_eq!(
            table_name_from_url("http://localhost:3000/?tableName=t2"),
            Some("t2".to_string())
        );
        assert_eq!(table_name_from_url("http://localhost:3000/"), None);
    }

    #[test]
    fn test_client_config_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.session_language, "python");

        let request = config.request(Some(""));
        assert_eq!(request.selection, TableSelection::CreateExample);
    }
}

//! Host API
//!
//! Requests to the server that published this bundle.

pub mod client;

pub use client::{fetch_client_config, page_origin, page_table_name};

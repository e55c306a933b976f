//! Tabular data
//!
//! Viewport snapshots read from remote tables and the chart points they
//! flatten into.

mod point;
mod viewport;

pub use point::{flatten, ChartPoint};
pub use viewport::{CellValue, Column, Row, ViewportData};

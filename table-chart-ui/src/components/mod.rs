//! UI Components

pub mod bar_chart;
pub mod loading;

pub use bar_chart::BarChart;
pub use loading::LoadingOverlay;

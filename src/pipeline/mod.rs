//! Load Pipeline
//!
//! Connect, fetch or create a table, flatten its rows into chart points.
//!
//! ## Stages
//!
//! 1. Start a session on the [`Connection`]
//! 2. [`acquire`](acquire::acquire) the table (by name, or create the example)
//! 3. [`read_chart_points`](present::read_chart_points): set the viewport,
//!    read the snapshot, flatten, release the handle
//!
//! Every stage awaits the one before it. Errors from any stage end the attempt;
//! [`run`] turns them into [`LoadStatus::Failed`].

pub mod acquire;
mod error;
pub mod present;
mod status;

pub use acquire::TableSelection;
pub use error::{LoadError, LoadResult, TransitionError};
pub use present::read_chart_points;
pub use status::{LoadStatus, LoadTracker, MountGuard};

use crate::session::Connection;
use crate::table::ChartPoint;

/// Default session language
pub const DEFAULT_LANGUAGE: &str = "python";

/// Parameters of one load attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub selection: TableSelection,
    pub language: String,
}

impl LoadRequest {
    pub fn new(selection: TableSelection) -> Self {
        Self {
            selection,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Request for an optional table name (see [`TableSelection::from_name`])
    pub fn for_table(name: Option<&str>) -> Self {
        Self::new(TableSelection::from_name(name))
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Run the whole pipeline, returning the chart points or the first error
pub async fn load_chart_points<C: Connection>(
    connection: &C,
    request: &LoadRequest,
) -> LoadResult<Vec<ChartPoint>> {
    tracing::info!("Starting session...");
    let session = connection.start_session(&request.language).await?;

    let table = acquire::acquire(&session, &request.selection).await?;

    read_chart_points(table).await
}

/// Run the pipeline and settle it into a terminal [`LoadStatus`]
pub async fn run<C: Connection>(connection: &C, request: &LoadRequest) -> LoadStatus {
    let result = load_chart_points(connection, request).await;

    match &result {
        Ok(points) => tracing::info!(points = points.len(), "Data successfully loaded!"),
        Err(e) => tracing::error!(error = %e, "Unable to load table"),
    }

    LoadStatus::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryConnection;
    use crate::table::{CellValue, ViewportData};

    #[tokio::test]
    async fn test_create_mode_yields_squares() {
        let conn = MemoryConnection::example();
        let status = run(&conn, &LoadRequest::for_table(None)).await;

        let points = status.data().expect("loaded");
        assert_eq!(points.len(), 10);
        for (i, point) in points.iter().enumerate() {
            let x = i as f64;
            assert_eq!(point.keys().collect::<Vec<_>>(), vec!["x", "y"]);
            assert_eq!(point.get("x"), Some(x));
            assert_eq!(point.get("y"), Some(x * x));
        }
        assert_eq!(conn.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_named_mode_missing_table_fails() {
        let conn = MemoryConnection::example();
        let status = run(&conn, &LoadRequest::for_table(Some("missing"))).await;

        assert_eq!(status, LoadStatus::Failed("Table not found: missing".to_string()));
        assert!(status.data().is_none());
    }

    #[tokio::test]
    async fn test_named_mode_existing_table() {
        let data = ViewportData::new(["x", "y"])
            .row([0i64, 0])
            .row([1i64, 1])
            .row([2i64, 4]);
        let conn = MemoryConnection::new().with_table("squares", data);

        let status = run(&conn, &LoadRequest::for_table(Some("squares"))).await;
        let expected = vec![
            ChartPoint::new().with("x", 0.0).with("y", 0.0),
            ChartPoint::new().with("x", 1.0).with("y", 1.0),
            ChartPoint::new().with("x", 2.0).with("y", 4.0),
        ];
        assert_eq!(status, LoadStatus::Loaded(expected));
    }

    #[tokio::test]
    async fn test_named_table_with_label_column_loads() {
        let mut data = ViewportData::new(["Sym", "x", "y"]);
        for i in 0..3i64 {
            data.push_row([CellValue::from("AAPL"), CellValue::from(i), CellValue::from(i * i)]);
        }
        let conn = MemoryConnection::new().with_table("quotes", data);

        let status = run(&conn, &LoadRequest::for_table(Some("quotes"))).await;
        let points = status.data().expect("loaded");
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.len() == 3));
        assert_eq!(points[2].get("y"), Some(4.0));
        assert_eq!(conn.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_settles_failed() {
        let conn = MemoryConnection::example().unreachable();
        let status = run(&conn, &LoadRequest::for_table(None)).await;

        assert_eq!(status.error(), Some("Transport error: connection refused"));
    }

    #[tokio::test]
    async fn test_tracker_settles_exactly_once() {
        let conn = MemoryConnection::example();
        let mut tracker = LoadTracker::new();

        tracker.begin().unwrap();
        assert!(tracker.status().is_loading());

        let status = run(&conn, &LoadRequest::for_table(None)).await;
        tracker.settle(status).unwrap();

        let settled = tracker.status();
        assert!(settled.data().is_some() ^ settled.error().is_some());
        assert!(!settled.is_loading());
    }

    #[tokio::test]
    async fn test_late_result_after_unmount_is_dropped() {
        let conn = MemoryConnection::example();
        let guard = MountGuard::new();
        let mut tracker = LoadTracker::new();
        tracker.begin().unwrap();

        let status = run(&conn, &LoadRequest::for_table(None)).await;
        guard.release();
        guard.if_mounted(|| {
            let _ = tracker.settle(status);
        });

        assert!(tracker.status().is_loading());
    }

    #[tokio::test]
    async fn test_language_is_forwarded() {
        let request = LoadRequest::for_table(None).language("groovy");
        assert_eq!(request.language, "groovy");

        let conn = MemoryConnection::example();
        let session = conn.start_session(&request.language).await.unwrap();
        assert_eq!(session.language(), "groovy");
    }
}

//! Presentation adapter
//!
//! Reads a table's full row range and flattens it into chart points. The
//! table handle is consumed and closed on every path out.

use crate::session::Table;
use crate::table::{flatten, ChartPoint};

use super::error::LoadResult;

/// Read every row of `table` as chart points, then release the handle
pub async fn read_chart_points<T: Table>(table: T) -> LoadResult<Vec<ChartPoint>> {
    let result = materialize(&table).await;
    table.close();
    result
}

async fn materialize<T: Table>(table: &T) -> LoadResult<Vec<ChartPoint>> {
    table.set_viewport(0..table.size())?;

    let data = table.viewport_data().await?;

    Ok(flatten(&data))
}

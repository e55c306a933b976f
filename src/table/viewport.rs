//! Viewport snapshots
//!
//! A bounded row window materialized from a remote table. Columns keep the
//! order the server reports; rows expose per-column lookups.

use serde::{Deserialize, Serialize};

/// A column of a viewport snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Position of the column within the snapshot
    pub index: usize,
    /// Column name as reported by the server
    pub name: String,
}

impl Column {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// A single cell read from a viewport row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// The numeric value, if the cell holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) | CellValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// One row of a viewport snapshot, cells stored in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell for the given column. Short rows read as null.
    pub fn get(&self, column: &Column) -> &CellValue {
        self.cells.get(column.index).unwrap_or(&NULL_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Snapshot of rows x columns over a viewport window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportData {
    /// Index of the first row in the window
    pub offset: usize,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ViewportData {
    /// Build a snapshot from column names; column indexes follow their position
    pub fn new<S: Into<String>>(column_names: impl IntoIterator<Item = S>) -> Self {
        let columns = column_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(i, name))
            .collect();
        Self {
            offset: 0,
            columns,
            rows: Vec::new(),
        }
    }

    /// Builder-style row append
    pub fn row<C: Into<CellValue>>(mut self, cells: impl IntoIterator<Item = C>) -> Self {
        self.push_row(cells);
        self
    }

    pub fn push_row<C: Into<CellValue>>(&mut self, cells: impl IntoIterator<Item = C>) {
        self.rows
            .push(Row::new(cells.into_iter().map(Into::into).collect()));
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Copy of the rows in `range`, clamped to the snapshot
    pub fn window(&self, range: std::ops::Range<usize>) -> ViewportData {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        ViewportData {
            offset: self.offset + start,
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_by_column() {
        let data = ViewportData::new(["x", "label"]).row([CellValue::from(3.0), "three".into()]);
        let label = data.column("label").unwrap();
        assert_eq!(data.rows[0].get(label), &CellValue::Text("three".to_string()));
    }

    #[test]
    fn test_short_row_reads_null() {
        let data = ViewportData::new(["x", "y"]).row([1.0]);
        let y = data.column("y").unwrap();
        assert_eq!(data.rows[0].get(y), &CellValue::Null);
    }

    #[test]
    fn test_window_clamps() {
        let mut data = ViewportData::new(["x"]);
        for i in 0..5i64 {
            data.push_row([i]);
        }

        let w = data.window(3..10);
        assert_eq!(w.offset, 3);
        assert_eq!(w.rows.len(), 2);

        let empty = data.window(7..9);
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::Null.as_number(), None);
        assert_eq!(CellValue::Text("a".into()).as_number(), None);
        assert!(CellValue::Null.is_null());
    }
}

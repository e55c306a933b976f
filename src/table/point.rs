//! Chart points
//!
//! Flattening turns a viewport snapshot into one plain record per row, keyed
//! by column name, in the snapshot's row and column order. Cells keep their
//! type; consumers pick out the numeric values they need.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::viewport::{CellValue, ViewportData};

/// One chart-ready record derived from a single table row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPoint {
    entries: Vec<(String, CellValue)>,
}

impl ChartPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Numeric value under `key`; `None` if absent, null or text
    pub fn get(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(CellValue::as_number)
    }

    /// Cell under `key`, whatever its type
    pub fn value(&self, key: &str) -> Option<&CellValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Flatten a snapshot into chart points.
///
/// Every row produces exactly one point holding every column of the snapshot,
/// each cell copied as-is under its column name.
pub fn flatten(data: &ViewportData) -> Vec<ChartPoint> {
    data.rows
        .iter()
        .map(|row| {
            let entries = data
                .columns
                .iter()
                .map(|column| (column.name.clone(), row.get(column).clone()))
                .collect();
            ChartPoint { entries }
        })
        .collect()
}

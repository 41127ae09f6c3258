//! StockDataset — the validated, read-only collection every stage consumes.

use super::record::{StockRecord, REQUIRED_FIELDS};
use serde::Serialize;

/// Ordered stock records sharing one column layout.
///
/// Built once per run by the fetcher and never mutated afterwards. `columns`
/// is the canonical export order: field names in the order they were first
/// seen in the source payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockDataset {
    columns: Vec<String>,
    records: Vec<StockRecord>,
}

impl StockDataset {
    /// Assemble a dataset from already-validated parts.
    ///
    /// Required columns missing from `columns` are appended in
    /// [`REQUIRED_FIELDS`] order so every record field has a header.
    pub fn new(mut columns: Vec<String>, records: Vec<StockRecord>) -> Self {
        for field in REQUIRED_FIELDS {
            if !columns.iter().any(|c| c == field) {
                columns.push(field.to_string());
            }
        }
        Self { columns, records }
    }

    /// Dataset whose columns are exactly [`REQUIRED_FIELDS`].
    pub fn from_records(records: Vec<StockRecord>) -> Self {
        Self::new(Vec::new(), records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cells of `record` in column order; absent extras become empty cells.
    pub fn row(&self, record: &StockRecord) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| record.field(c).map(|v| v.into_owned()).unwrap_or_default())
            .collect()
    }

    /// All rows in record order.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(|r| self.row(r)).collect()
    }

    /// Records matching `predicate`, in dataset order.
    pub fn filter<F>(&self, predicate: F) -> Vec<&StockRecord>
    where
        F: Fn(&StockRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }
}

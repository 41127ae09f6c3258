//! StockRecord — one row of dealership inventory state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const TECHNICIAN: &str = "Technician";
pub const STOCK_NUMBER: &str = "Stock Number";
pub const DATE: &str = "Date";
pub const KEY_STATUS: &str = "Key Status";
pub const PRIORITY: &str = "Priority";

/// Fields every record must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 5] = [TECHNICIAN, STOCK_NUMBER, DATE, KEY_STATUS, PRIORITY];

/// A validated stock record.
///
/// `stock_number` is opaque; uniqueness across records is not enforced.
/// Fields outside [`REQUIRED_FIELDS`] are kept as text in `extras` so they
/// survive into the exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub technician: String,
    pub stock_number: String,
    pub date: NaiveDate,
    pub key_status: String,
    pub priority: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl StockRecord {
    pub fn new(
        technician: impl Into<String>,
        stock_number: impl Into<String>,
        date: NaiveDate,
        key_status: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            technician: technician.into(),
            stock_number: stock_number.into(),
            date,
            key_status: key_status.into(),
            priority: priority.into(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(column.into(), value.into());
        self
    }

    /// Text value of a column, as written to exports. Dates render as ISO `YYYY-MM-DD`.
    pub fn field(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            TECHNICIAN => Some(Cow::Borrowed(&self.technician)),
            STOCK_NUMBER => Some(Cow::Borrowed(&self.stock_number)),
            DATE => Some(Cow::Owned(self.date.format("%Y-%m-%d").to_string())),
            KEY_STATUS => Some(Cow::Borrowed(&self.key_status)),
            PRIORITY => Some(Cow::Borrowed(&self.priority)),
            other => self.extras.get(other).map(|v| Cow::Borrowed(v.as_str())),
        }
    }
}

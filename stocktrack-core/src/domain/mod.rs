//! Domain types for the stock tracker

pub mod dataset;
pub mod record;

pub use dataset::StockDataset;
pub use record::{StockRecord, REQUIRED_FIELDS};

//! Stocktrack Core — dealership stock pipeline.
//!
//! One linear pass per run:
//! - Fetch stock records from the dealership API and validate their shape
//! - Check the record count against the configured stock limit
//! - Write daily / weekly / monthly CSV extracts
//! - Mirror the full dataset into a shared spreadsheet
//!
//! Pipeline functions return status values; everything user-visible goes
//! through [`events::PipelineObserver`].

pub mod config;
pub mod data;
pub mod domain;
pub mod events;
pub mod limit;
pub mod pipeline;
pub mod report;
pub mod sheets;

pub use config::{ConfigError, TrackerConfig};
pub use data::{FetchError, HttpStockProvider, SchemaError, StockProvider};
pub use domain::{StockDataset, StockRecord, REQUIRED_FIELDS};
pub use events::{EventLevel, PipelineEvent, PipelineObserver, RecordingObserver, TracingObserver};
pub use limit::{LimitChecker, LimitStatus};
pub use pipeline::{PipelineError, RunSummary, StockTracker};
pub use report::{PersistenceError, ReportPaths, ReportWindow, Reporter};
pub use sheets::{GoogleSheetsSync, SheetSync, SyncError};

//! Spreadsheet mirror of the validated dataset.
//!
//! The mirror runs last and is fully isolated: whatever goes wrong here is
//! reported as a [`SyncError`] and logged by the pipeline, never propagated.

pub mod auth;
pub mod google;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use google::GoogleSheetsSync;

use crate::domain::StockDataset;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot load credentials from {path}: {reason}")]
    Credentials { path: PathBuf, reason: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("spreadsheet not found: {0}")]
    NotFound(String),

    #[error("spreadsheet API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("spreadsheet request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transport(e.to_string())
    }
}

/// Target that mirrors a full dataset, replacing whatever it held before.
pub trait SheetSync {
    /// Name of the target, for log lines.
    fn target(&self) -> &str;

    /// Clear the target and write the header row followed by every record.
    ///
    /// Returns the number of data rows written.
    fn replace_contents(&self, dataset: &StockDataset) -> Result<usize, SyncError>;
}

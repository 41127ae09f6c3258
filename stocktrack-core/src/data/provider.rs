//! Stock provider trait and fetch error types.
//!
//! The StockProvider trait abstracts over where records come from so the
//! pipeline can run against the live API or an in-memory dataset in tests.

use super::validate::SchemaError;
use crate::domain::StockDataset;
use thiserror::Error;

/// Why a fetch produced no dataset.
///
/// Both variants are terminal for the run; there is no partial dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not complete, or the API answered with a non-2xx status.
    #[error("failed to fetch data from API: {0}")]
    Transport(String),

    /// The response arrived but does not describe a valid stock batch.
    #[error("invalid stock data: {0}")]
    Schema(#[from] SchemaError),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, FetchError::Schema(_))
    }
}

/// Source of one validated stock batch per call.
pub trait StockProvider {
    /// Human-readable name of this provider (URL or label).
    fn name(&self) -> &str;

    /// Fetch and validate the full batch.
    fn fetch(&self) -> Result<StockDataset, FetchError>;
}

/// Provider that hands out a fixed dataset. Used for dry runs and tests.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    dataset: StockDataset,
}

impl StaticProvider {
    pub fn new(dataset: StockDataset) -> Self {
        Self { dataset }
    }
}

impl StockProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> Result<StockDataset, FetchError> {
        Ok(self.dataset.clone())
    }
}

//! HTTP stock provider.
//!
//! One blocking GET against the configured endpoint. No retries: a transport
//! problem ends the run.

use super::provider::{FetchError, StockProvider};
use super::validate::{parse_payload, SchemaError};
use crate::domain::StockDataset;
use serde_json::Value;

/// Fetches `{"stocks": [...]}` from a dealership API endpoint.
pub struct HttpStockProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpStockProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("stocktrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl StockProvider for HttpStockProvider {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<StockDataset, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP {status} from {}",
                self.url
            )));
        }

        let text = resp
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        let body: Value =
            serde_json::from_str(&text).map_err(|e| SchemaError::Decode(e.to_string()))?;

        Ok(parse_payload(&body)?)
    }
}

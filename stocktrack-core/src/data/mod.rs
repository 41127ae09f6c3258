//! Stock data acquisition and validation

pub mod http;
pub mod provider;
pub mod validate;

pub use http::HttpStockProvider;
pub use provider::{FetchError, StaticProvider, StockProvider};
pub use validate::{parse_date, parse_payload, SchemaError};

//! Payload validation — turns a decoded API body into a StockDataset.
//!
//! Validation is all-or-nothing: the first problem rejects the whole batch.
//! No row-level filtering happens here or anywhere downstream.

use crate::domain::record::{DATE, KEY_STATUS, PRIORITY, STOCK_NUMBER, TECHNICIAN};
use crate::domain::{StockDataset, StockRecord, REQUIRED_FIELDS};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Key holding the record array in the API body.
pub const STOCKS_KEY: &str = "stocks";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    #[error("API response is empty or missing the 'stocks' collection")]
    MissingStocks,

    #[error("'stocks' collection is empty")]
    EmptyStocks,

    #[error("record {index} is not an object")]
    NotAnObject { index: usize },

    #[error("missing column '{0}' in API data")]
    MissingColumn(String),

    #[error("record {index} has no value for '{field}'")]
    NullField { index: usize, field: String },

    #[error("record {index} has unparseable date '{value}'")]
    InvalidDate { index: usize, value: String },
}

/// Validate a decoded API body and build the dataset.
pub fn parse_payload(body: &Value) -> Result<StockDataset, SchemaError> {
    let stocks = body
        .as_object()
        .and_then(|obj| obj.get(STOCKS_KEY))
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingStocks)?;

    if stocks.is_empty() {
        return Err(SchemaError::EmptyStocks);
    }

    let objects = stocks
        .iter()
        .enumerate()
        .map(|(index, v)| v.as_object().ok_or(SchemaError::NotAnObject { index }))
        .collect::<Result<Vec<_>, _>>()?;

    // Column order is first appearance across the batch.
    let mut columns: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|f| !columns.iter().any(|c| c == *f))
    {
        return Err(SchemaError::MissingColumn(missing.to_string()));
    }

    let records = objects
        .iter()
        .enumerate()
        .map(|(index, obj)| parse_record(index, obj))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StockDataset::new(columns, records))
}

fn parse_record(index: usize, obj: &Map<String, Value>) -> Result<StockRecord, SchemaError> {
    let required = |field: &str| -> Result<String, SchemaError> {
        match obj.get(field) {
            None | Some(Value::Null) => Err(SchemaError::NullField {
                index,
                field: field.to_string(),
            }),
            Some(v) => Ok(cell_text(v)),
        }
    };

    let raw_date = required(DATE)?;
    let date = parse_date(&raw_date).ok_or_else(|| SchemaError::InvalidDate {
        index,
        value: raw_date.clone(),
    })?;

    let extras: BTreeMap<String, String> = obj
        .iter()
        .filter(|(k, _)| !REQUIRED_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), cell_text(v)))
        .collect();

    Ok(StockRecord {
        technician: required(TECHNICIAN)?,
        stock_number: required(STOCK_NUMBER)?,
        date,
        key_status: required(KEY_STATUS)?,
        priority: required(PRIORITY)?,
        extras,
    })
}

/// Parse a record date. Time-of-day and offsets are accepted and dropped;
/// the calendar date is taken as written.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Render a JSON value the way it lands in a CSV cell.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(date: &str) -> Value {
        json!({
            "Technician": "Ann",
            "Stock Number": "S-1",
            "Date": date,
            "Key Status": "In Box",
            "Priority": "High"
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_payload_parses() {
        let body = json!({ "stocks": [record("2024-01-05"), record("2024-01-01")] });
        let ds = parse_payload(&body).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].date, date(2024, 1, 5));
        assert_eq!(ds.columns(), REQUIRED_FIELDS);
    }

    #[test]
    fn missing_stocks_key_is_rejected() {
        let err = parse_payload(&json!({ "vehicles": [] })).unwrap_err();
        assert_eq!(err, SchemaError::MissingStocks);
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(parse_payload(&json!([])).unwrap_err(), SchemaError::MissingStocks);
        assert_eq!(parse_payload(&Value::Null).unwrap_err(), SchemaError::MissingStocks);
    }

    #[test]
    fn stocks_not_an_array_is_rejected() {
        let err = parse_payload(&json!({ "stocks": { "a": 1 } })).unwrap_err();
        assert_eq!(err, SchemaError::MissingStocks);
    }

    #[test]
    fn empty_stocks_is_schema_failure() {
        let err = parse_payload(&json!({ "stocks": [] })).unwrap_err();
        assert_eq!(err, SchemaError::EmptyStocks);
    }

    #[test]
    fn each_missing_required_column_is_named() {
        for field in REQUIRED_FIELDS {
            let mut r = record("2024-01-05");
            r.as_object_mut().unwrap().remove(field);
            let err = parse_payload(&json!({ "stocks": [r] })).unwrap_err();
            assert_eq!(err, SchemaError::MissingColumn(field.to_string()));
        }
    }

    #[test]
    fn field_missing_from_one_record_fails_whole_batch() {
        let mut second = record("2024-01-02");
        second.as_object_mut().unwrap().remove("Priority");
        let body = json!({ "stocks": [record("2024-01-01"), second] });
        let err = parse_payload(&body).unwrap_err();
        assert_eq!(
            err,
            SchemaError::NullField {
                index: 1,
                field: "Priority".into()
            }
        );
    }

    #[test]
    fn null_required_value_fails_batch() {
        let mut r = record("2024-01-02");
        r["Technician"] = Value::Null;
        let err = parse_payload(&json!({ "stocks": [r] })).unwrap_err();
        assert!(matches!(err, SchemaError::NullField { index: 0, .. }));
    }

    #[test]
    fn bad_date_fails_whole_batch() {
        let body = json!({ "stocks": [record("2024-01-01"), record("next tuesday"), record("2024-01-03")] });
        let err = parse_payload(&body).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidDate {
                index: 1,
                value: "next tuesday".into()
            }
        );
    }

    #[test]
    fn minute_precision_and_compact_offset_dates_pass_batch() {
        let body = json!({ "stocks": [
            record("2024-01-05T08:00"),
            record("2024-01-05 17:30"),
            record("2024-01-06T09:00:00+0000")
        ] });
        let ds = parse_payload(&body).unwrap();
        let dates: Vec<NaiveDate> = ds.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, [date(2024, 1, 5), date(2024, 1, 5), date(2024, 1, 6)]);
    }

    #[test]
    fn malformed_timestamp_fails_whole_batch() {
        let body = json!({ "stocks": [record("2024-01-05T08:00"), record("2024-01-05T8")] });
        let err = parse_payload(&body).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidDate {
                index: 1,
                value: "2024-01-05T8".into()
            }
        );
    }

    #[test]
    fn non_object_record_is_rejected() {
        let body = json!({ "stocks": [record("2024-01-01"), 42] });
        assert_eq!(
            parse_payload(&body).unwrap_err(),
            SchemaError::NotAnObject { index: 1 }
        );
    }

    #[test]
    fn extra_columns_keep_first_seen_order() {
        let mut a = record("2024-01-01");
        a["Location"] = json!("Lot A");
        let mut b = record("2024-01-02");
        b["Mileage"] = json!(48210);
        b["Location"] = json!("Lot C");
        let ds = parse_payload(&json!({ "stocks": [a, b] })).unwrap();
        assert_eq!(
            ds.columns(),
            ["Technician", "Stock Number", "Date", "Key Status", "Priority", "Location", "Mileage"]
        );
        assert_eq!(ds.row(&ds.records()[0])[6], "");
        assert_eq!(ds.row(&ds.records()[1])[6], "48210");
    }

    #[test]
    fn numeric_stock_number_is_rendered_as_text() {
        let mut r = record("2024-01-01");
        r["Stock Number"] = json!(10042);
        let ds = parse_payload(&json!({ "stocks": [r] })).unwrap();
        assert_eq!(ds.records()[0].stock_number, "10042");
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_date("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date(" 2024-01-05 "), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T17:45:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T17:45:00.250"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 08:00:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T23:30:00-05:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T01:00:00Z"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T08:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 08:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T08:00:00+0000"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T22:15:00.5-0600"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 08:00:00+0130"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2024-01-05T25:00"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}

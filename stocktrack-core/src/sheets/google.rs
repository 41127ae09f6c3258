//! Google Sheets mirror.
//!
//! Flow per run: sign in with the service-account key, look the spreadsheet
//! up by title through Drive, clear its first worksheet, then write the
//! header and all rows starting at A1.

use super::auth::{ServiceAccountKey, TokenProvider};
use super::{SheetSync, SyncError};
use crate::domain::StockDataset;
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Worksheet>,
}

#[derive(Debug, Deserialize)]
struct Worksheet {
    properties: WorksheetProperties,
}

#[derive(Debug, Deserialize)]
struct WorksheetProperties {
    title: String,
}

/// Mirrors datasets into the first worksheet of a named spreadsheet.
pub struct GoogleSheetsSync {
    client: Client,
    spreadsheet_name: String,
    credentials_path: PathBuf,
    sheets_base: String,
    drive_base: String,
}

impl GoogleSheetsSync {
    pub fn new(
        spreadsheet_name: impl Into<String>,
        credentials_path: impl Into<PathBuf>,
    ) -> Result<Self, SyncError> {
        let client = Client::builder()
            .user_agent(concat!("stocktrack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            spreadsheet_name: spreadsheet_name.into(),
            credentials_path: credentials_path.into(),
            sheets_base: SHEETS_API_BASE.to_string(),
            drive_base: DRIVE_API_BASE.to_string(),
        })
    }

    /// Point the Sheets and Drive calls at other hosts.
    pub fn with_endpoints(mut self, sheets_base: impl Into<String>, drive_base: impl Into<String>) -> Self {
        self.sheets_base = sheets_base.into();
        self.drive_base = drive_base.into();
        self
    }

    fn url(&self, base: &str, segments: &[&str]) -> Result<Url, SyncError> {
        let mut url = Url::parse(base)
            .map_err(|e| SyncError::Transport(format!("invalid API base {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::Transport(format!("API base {base} cannot take a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn find_spreadsheet(&self, token: &str) -> Result<String, SyncError> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            escape_query_literal(&self.spreadsheet_name)
        );
        let url = self.url(&self.drive_base, &["drive", "v3", "files"])?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()?;

        let list: FileList = parse_json(check_status(resp)?)?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SyncError::NotFound(self.spreadsheet_name.clone()))
    }

    fn first_worksheet(&self, token: &str, spreadsheet_id: &str) -> Result<String, SyncError> {
        let url = self.url(&self.sheets_base, &["v4", "spreadsheets", spreadsheet_id])?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()?;

        let spreadsheet: Spreadsheet = parse_json(check_status(resp)?)?;
        spreadsheet
            .sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| {
                SyncError::NotFound(format!("{} has no worksheets", self.spreadsheet_name))
            })
    }

    fn clear(&self, token: &str, spreadsheet_id: &str, worksheet: &str) -> Result<(), SyncError> {
        let range = format!("{}:clear", quote_sheet_title(worksheet));
        let url = self.url(
            &self.sheets_base,
            &["v4", "spreadsheets", spreadsheet_id, "values", range.as_str()],
        )?;
        let resp = self.client.post(url).bearer_auth(token).json(&json!({})).send()?;
        check_status(resp)?;
        Ok(())
    }

    fn write_values(
        &self,
        token: &str,
        spreadsheet_id: &str,
        worksheet: &str,
        values: &[Vec<String>],
    ) -> Result<(), SyncError> {
        let range = format!("{}!A1", quote_sheet_title(worksheet));
        let url = self.url(
            &self.sheets_base,
            &["v4", "spreadsheets", spreadsheet_id, "values", range.as_str()],
        )?;
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });
        let resp = self
            .client
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()?;
        check_status(resp)?;
        Ok(())
    }
}

impl SheetSync for GoogleSheetsSync {
    fn target(&self) -> &str {
        &self.spreadsheet_name
    }

    fn replace_contents(&self, dataset: &StockDataset) -> Result<usize, SyncError> {
        let key = ServiceAccountKey::from_file(&self.credentials_path)?;
        let token = TokenProvider::new(&self.client, &key).access_token()?;

        let spreadsheet_id = self.find_spreadsheet(&token)?;
        let worksheet = self.first_worksheet(&token, &spreadsheet_id)?;
        tracing::debug!(spreadsheet_id = %spreadsheet_id, worksheet = %worksheet, "sheet located");

        self.clear(&token, &spreadsheet_id, &worksheet)?;

        let mut values = Vec::with_capacity(dataset.len() + 1);
        values.push(dataset.columns().to_vec());
        values.extend(dataset.rows());
        self.write_values(&token, &spreadsheet_id, &worksheet, &values)?;

        Ok(dataset.len())
    }
}

fn check_status(resp: Response) -> Result<Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(SyncError::Api {
        status: status.as_u16(),
        body,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, SyncError> {
    resp.json()
        .map_err(|e| SyncError::Transport(format!("malformed API response: {e}")))
}

/// Drive query string literal: backslash and single quote are escaped.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A1-notation sheet reference: wrapped in single quotes, inner quotes doubled.
fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_query_literal_is_escaped() {
        assert_eq!(escape_query_literal("Bob's Lot"), "Bob\\'s Lot");
        assert_eq!(escape_query_literal("a\\b"), "a\\\\b");
    }

    #[test]
    fn sheet_titles_are_quoted() {
        assert_eq!(quote_sheet_title("Sheet1"), "'Sheet1'");
        assert_eq!(quote_sheet_title("Bob's"), "'Bob''s'");
    }

    #[test]
    fn url_segments_are_appended_to_base() {
        let sync = GoogleSheetsSync::new("Dealership Stock Tracker", "creds.json")
            .unwrap()
            .with_endpoints("http://127.0.0.1:9/", "http://127.0.0.1:9");
        let url = sync
            .url(&sync.sheets_base, &["v4", "spreadsheets", "abc123"])
            .unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc123");
        let url = sync.url(&sync.drive_base, &["drive", "v3", "files"]).unwrap();
        assert_eq!(url.path(), "/drive/v3/files");
    }
}

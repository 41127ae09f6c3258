//! Dated CSV extracts — one file per report window.
//!
//! Each run writes `daily_report_<date>.csv`, `weekly_report_<date>.csv` and
//! `monthly_report_<date>.csv` into the reports directory, overwriting any
//! earlier files for the same date. Windows are computed independently, so a
//! record can appear in all three files.

pub mod window;

pub use window::ReportWindow;

use crate::domain::{StockDataset, StockRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to create reports directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One written export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFile {
    pub window: ReportWindow,
    pub path: PathBuf,
    /// Data rows written, excluding the header.
    pub rows: usize,
}

/// The three exports of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub as_of: NaiveDate,
    pub daily: ReportFile,
    pub weekly: ReportFile,
    pub monthly: ReportFile,
}

impl ReportPaths {
    pub fn files(&self) -> [&ReportFile; 3] {
        [&self.daily, &self.weekly, &self.monthly]
    }
}

/// Writes windowed exports of a dataset into one directory.
#[derive(Debug, Clone)]
pub struct Reporter {
    reports_dir: PathBuf,
}

impl Reporter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Generate all three reports for today's local date.
    pub fn generate_today(&self, dataset: &StockDataset) -> Result<ReportPaths, PersistenceError> {
        self.generate(dataset, chrono::Local::now().date_naive())
    }

    /// Generate all three reports for `as_of`.
    ///
    /// The reports directory is created if needed. The first write failure
    /// aborts; files already written stay on disk.
    pub fn generate(
        &self,
        dataset: &StockDataset,
        as_of: NaiveDate,
    ) -> Result<ReportPaths, PersistenceError> {
        std::fs::create_dir_all(&self.reports_dir).map_err(|source| {
            PersistenceError::CreateDir {
                path: self.reports_dir.clone(),
                source,
            }
        })?;

        Ok(ReportPaths {
            as_of,
            daily: self.write_window(dataset, ReportWindow::Daily, as_of)?,
            weekly: self.write_window(dataset, ReportWindow::Weekly, as_of)?,
            monthly: self.write_window(dataset, ReportWindow::Monthly, as_of)?,
        })
    }

    fn write_window(
        &self,
        dataset: &StockDataset,
        window: ReportWindow,
        as_of: NaiveDate,
    ) -> Result<ReportFile, PersistenceError> {
        let path = self.reports_dir.join(window.file_name(as_of));
        let selected = dataset.filter(|r| window.contains(r.date, as_of));

        write_csv(&path, dataset, &selected).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            window = window.label(),
            path = %path.display(),
            rows = selected.len(),
            "report written"
        );

        Ok(ReportFile {
            window,
            path,
            rows: selected.len(),
        })
    }
}

/// Header plus one row per record; an empty selection still gets the header.
fn write_csv(path: &Path, dataset: &StockDataset, records: &[&StockRecord]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(dataset.columns())?;
    for record in records {
        wtr.write_record(dataset.row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

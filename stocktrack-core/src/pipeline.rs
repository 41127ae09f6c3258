//! Run orchestration: fetch → limit check → reports → sheet mirror.
//!
//! Failure policy:
//! - fetch failure: logged, run aborted, nothing written
//! - report write failure: logged, run aborted, no sync
//! - sheet mirror failure: logged, run still succeeds

use crate::config::TrackerConfig;
use crate::data::{FetchError, HttpStockProvider, StockProvider};
use crate::events::{PipelineEvent, PipelineObserver};
use crate::limit::{LimitChecker, LimitStatus};
use crate::report::{PersistenceError, ReportPaths, Reporter};
use crate::sheets::{GoogleSheetsSync, SheetSync};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("pipeline setup failed: {0}")]
    Setup(String),
}

/// What a completed run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: u64,
    pub limit: LimitStatus,
    pub reports: ReportPaths,
    /// True once the sheet mirror accepted the full dataset.
    pub synced: bool,
    pub sync_error: Option<String>,
}

/// One configured tracker: a source, a reporter, a limit and an optional mirror.
pub struct StockTracker {
    provider: Box<dyn StockProvider>,
    reporter: Reporter,
    checker: LimitChecker,
    sheet: Option<Box<dyn SheetSync>>,
}

impl StockTracker {
    pub fn new(provider: Box<dyn StockProvider>, reporter: Reporter, checker: LimitChecker) -> Self {
        Self {
            provider,
            reporter,
            checker,
            sheet: None,
        }
    }

    pub fn with_sheet_sync(mut self, sheet: Box<dyn SheetSync>) -> Self {
        self.sheet = Some(sheet);
        self
    }

    /// Wire the live HTTP provider and Google Sheets mirror from a config.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, PipelineError> {
        config
            .validate()
            .map_err(|e| PipelineError::Setup(e.to_string()))?;

        let provider = HttpStockProvider::new(config.api.url.clone())?;
        let sheet = GoogleSheetsSync::new(&config.sheet.name, &config.sheet.credentials_path)
            .map_err(|e| PipelineError::Setup(e.to_string()))?;

        Ok(Self::new(
            Box::new(provider),
            Reporter::new(&config.reports_dir),
            LimitChecker::new(config.stock_limit),
        )
        .with_sheet_sync(Box::new(sheet)))
    }

    /// Run once with reports dated today (local time).
    pub fn run_today(&self, observer: &dyn PipelineObserver) -> Result<RunSummary, PipelineError> {
        self.run(observer, chrono::Local::now().date_naive())
    }

    /// Run once with reports dated `as_of`.
    pub fn run(
        &self,
        observer: &dyn PipelineObserver,
        as_of: NaiveDate,
    ) -> Result<RunSummary, PipelineError> {
        observer.on_event(&PipelineEvent::RunStarted);
        observer.on_event(&PipelineEvent::FetchStarted {
            source: self.provider.name().to_string(),
        });

        let dataset = match self.provider.fetch() {
            Ok(ds) => ds,
            Err(e) => {
                observer.on_event(&PipelineEvent::FetchFailed {
                    error: e.to_string(),
                });
                return Err(e.into());
            }
        };
        observer.on_event(&PipelineEvent::FetchSucceeded {
            records: dataset.len(),
        });

        let limit = self.checker.check(&dataset);
        if limit.near_limit {
            observer.on_event(&PipelineEvent::NearLimit {
                count: limit.count,
                limit: limit.limit,
            });
        }
        if limit.exceeded {
            observer.on_event(&PipelineEvent::LimitExceeded {
                count: limit.count,
                limit: limit.limit,
                excess: limit.excess(),
            });
        }
        observer.on_event(&PipelineEvent::TotalProcessed { count: limit.count });

        let reports = match self.reporter.generate(&dataset, as_of) {
            Ok(paths) => paths,
            Err(e) => {
                observer.on_event(&PipelineEvent::ReportsFailed {
                    error: e.to_string(),
                });
                return Err(e.into());
            }
        };
        observer.on_event(&PipelineEvent::ReportsWritten {
            dir: self.reporter.reports_dir().to_path_buf(),
            daily_rows: reports.daily.rows,
            weekly_rows: reports.weekly.rows,
            monthly_rows: reports.monthly.rows,
        });

        let (synced, sync_error) = match &self.sheet {
            Some(sheet) => match sheet.replace_contents(&dataset) {
                Ok(rows) => {
                    observer.on_event(&PipelineEvent::SheetUploaded {
                        sheet: sheet.target().to_string(),
                        rows,
                    });
                    (true, None)
                }
                Err(e) => {
                    observer.on_event(&PipelineEvent::SheetSyncFailed {
                        error: e.to_string(),
                    });
                    (false, Some(e.to_string()))
                }
            },
            None => (false, None),
        };

        observer.on_event(&PipelineEvent::RunCompleted);

        Ok(RunSummary {
            total: limit.count,
            limit,
            reports,
            synced,
            sync_error,
        })
    }
}

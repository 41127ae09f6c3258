//! Pipeline events and observers.
//!
//! Pipeline stages return plain status values; the orchestrator turns them
//! into [`PipelineEvent`]s and hands them to a [`PipelineObserver`]. The
//! binary uses [`TracingObserver`]; tests use [`RecordingObserver`].

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warn,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    RunStarted,
    FetchStarted { source: String },
    FetchSucceeded { records: usize },
    FetchFailed { error: String },
    NearLimit { count: u64, limit: u64 },
    LimitExceeded { count: u64, limit: u64, excess: u64 },
    TotalProcessed { count: u64 },
    ReportsWritten {
        dir: PathBuf,
        daily_rows: usize,
        weekly_rows: usize,
        monthly_rows: usize,
    },
    ReportsFailed { error: String },
    SheetUploaded { sheet: String, rows: usize },
    SheetSyncFailed { error: String },
    RunCompleted,
}

impl PipelineEvent {
    pub fn level(&self) -> EventLevel {
        match self {
            Self::NearLimit { .. } => EventLevel::Warn,
            Self::LimitExceeded { .. }
            | Self::FetchFailed { .. }
            | Self::ReportsFailed { .. }
            | Self::SheetSyncFailed { .. } => EventLevel::Alert,
            _ => EventLevel::Info,
        }
    }

    /// Stable snake_case name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted => "run_started",
            Self::FetchStarted { .. } => "fetch_started",
            Self::FetchSucceeded { .. } => "fetch_succeeded",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::NearLimit { .. } => "near_limit",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::TotalProcessed { .. } => "total_processed",
            Self::ReportsWritten { .. } => "reports_written",
            Self::ReportsFailed { .. } => "reports_failed",
            Self::SheetUploaded { .. } => "sheet_uploaded",
            Self::SheetSyncFailed { .. } => "sheet_sync_failed",
            Self::RunCompleted => "run_completed",
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunStarted => write!(f, "Running dealership stock tracker"),
            Self::FetchStarted { source } => write!(f, "Fetching stock data from {source}"),
            Self::FetchSucceeded { records } => {
                write!(f, "Stock data fetched successfully ({records} records)")
            }
            Self::FetchFailed { error } => write!(f, "Fetch failed: {error}"),
            Self::NearLimit { count, limit } => {
                write!(f, "90% of stock limit reached ({count}/{limit})")
            }
            Self::LimitExceeded {
                count,
                limit,
                excess,
            } => write!(
                f,
                "Stock limit exceeded ({count}/{limit}): {excess} extra stocks will be billed"
            ),
            Self::TotalProcessed { count } => write!(f, "Total stock processed: {count}"),
            Self::ReportsWritten {
                dir,
                daily_rows,
                weekly_rows,
                monthly_rows,
            } => write!(
                f,
                "Reports generated in {} (daily: {daily_rows}, weekly: {weekly_rows}, monthly: {monthly_rows})",
                dir.display()
            ),
            Self::ReportsFailed { error } => write!(f, "Report generation failed: {error}"),
            Self::SheetUploaded { sheet, rows } => {
                write!(f, "Data uploaded to sheet '{sheet}' ({rows} rows)")
            }
            Self::SheetSyncFailed { error } => write!(f, "Sheet upload failed: {error}"),
            Self::RunCompleted => write!(f, "All tasks completed"),
        }
    }
}

/// Receives every event the pipeline emits, in order.
pub trait PipelineObserver {
    fn on_event(&self, event: &PipelineEvent);
}

/// Forwards events to `tracing` at a level matching [`EventLevel`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        let kind = event.kind();
        match event.level() {
            EventLevel::Info => tracing::info!(event = kind, "{event}"),
            EventLevel::Warn => tracing::warn!(event = kind, "{event}"),
            EventLevel::Alert => tracing::error!(event = kind, alert = true, "{event}"),
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(PipelineEvent::kind).collect()
    }

    pub fn at_level(&self, level: EventLevel) -> Vec<PipelineEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == level)
            .collect()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

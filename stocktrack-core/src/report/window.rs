//! Report windows — date filters anchored on the report date.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar period containing the report date, applied to the dataset to
/// produce one export.
///
/// Daily covers `as_of` only. Weekly covers the Monday-to-Sunday week holding
/// `as_of`; monthly covers its calendar month. "Through `as_of`" is read as
/// "through the end of `as_of`'s period": a weekly report dated Wednesday
/// includes a record dated that Friday, and a monthly report dated the 5th
/// includes one dated the 28th. Records from the next period are not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportWindow {
    Daily,
    Weekly,
    Monthly,
}

impl ReportWindow {
    pub const ALL: [ReportWindow; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// First date covered by the window.
    pub fn start(self, as_of: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => as_of,
            // ISO weeks start on Monday.
            Self::Weekly => as_of - Duration::days(as_of.weekday().num_days_from_monday() as i64),
            Self::Monthly => as_of - Duration::days(as_of.day0() as i64),
        }
    }

    /// Last date covered by the window (inclusive).
    pub fn end(self, as_of: NaiveDate) -> NaiveDate {
        let start = self.start(as_of);
        match self {
            Self::Daily => as_of,
            Self::Weekly => start + Duration::days(6),
            Self::Monthly => start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(self, date: NaiveDate, as_of: NaiveDate) -> bool {
        self.start(as_of) <= date && date <= self.end(as_of)
    }

    /// `{label}_report_{YYYY-MM-DD}.csv`
    pub fn file_name(self, as_of: NaiveDate) -> String {
        format!("{}_report_{}.csv", self.label(), as_of.format("%Y-%m-%d"))
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_start_is_monday() {
        // 2024-01-05 is a Friday
        assert_eq!(ReportWindow::Weekly.start(date(2024, 1, 5)), date(2024, 1, 1));
        // Monday maps to itself
        assert_eq!(ReportWindow::Weekly.start(date(2024, 1, 1)), date(2024, 1, 1));
        // Sunday belongs to the week that began six days earlier
        assert_eq!(ReportWindow::Weekly.start(date(2024, 1, 7)), date(2024, 1, 1));
    }

    #[test]
    fn weekly_start_crosses_month_and_year() {
        // 2025-01-01 is a Wednesday
        assert_eq!(ReportWindow::Weekly.start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn monthly_start_is_first_of_month() {
        assert_eq!(ReportWindow::Monthly.start(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(ReportWindow::Monthly.start(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn daily_contains_only_exact_date() {
        let as_of = date(2024, 1, 5);
        assert!(ReportWindow::Daily.contains(as_of, as_of));
        assert!(!ReportWindow::Daily.contains(date(2024, 1, 4), as_of));
        assert!(!ReportWindow::Daily.contains(date(2024, 1, 6), as_of));
    }

    #[test]
    fn period_end_dates() {
        assert_eq!(ReportWindow::Daily.end(date(2024, 1, 5)), date(2024, 1, 5));
        assert_eq!(ReportWindow::Weekly.end(date(2024, 1, 5)), date(2024, 1, 7));
        assert_eq!(ReportWindow::Monthly.end(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(ReportWindow::Monthly.end(date(2024, 12, 31)), date(2024, 12, 31));
    }

    #[test]
    fn weekly_and_monthly_stay_inside_their_period() {
        let as_of = date(2024, 1, 5);
        // later the same week / month
        assert!(ReportWindow::Weekly.contains(date(2024, 1, 7), as_of));
        assert!(ReportWindow::Monthly.contains(date(2024, 1, 31), as_of));
        // next week / month
        assert!(!ReportWindow::Weekly.contains(date(2024, 1, 8), as_of));
        assert!(!ReportWindow::Monthly.contains(date(2024, 2, 1), as_of));
        // before the period
        assert!(!ReportWindow::Weekly.contains(date(2023, 12, 31), as_of));
        assert!(!ReportWindow::Monthly.contains(date(2023, 12, 31), as_of));
    }

    #[test]
    fn file_names_are_dated() {
        let as_of = date(2024, 1, 5);
        assert_eq!(ReportWindow::Daily.file_name(as_of), "daily_report_2024-01-05.csv");
        assert_eq!(ReportWindow::Weekly.file_name(as_of), "weekly_report_2024-01-05.csv");
        assert_eq!(ReportWindow::Monthly.file_name(as_of), "monthly_report_2024-01-05.csv");
    }
}

//! Stock limit advisory.
//!
//! Purely informational: the count is never used to reject or truncate the
//! dataset.

use crate::domain::StockDataset;
use serde::Serialize;

/// Outcome of one limit check. Both flags can be set together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimitStatus {
    pub count: u64,
    pub limit: u64,
    /// `count >= 90%` of the limit.
    pub near_limit: bool,
    /// `count > limit`.
    pub exceeded: bool,
}

impl LimitStatus {
    /// Records above the limit; these are the ones billed as extra stock.
    pub fn excess(&self) -> u64 {
        self.count.saturating_sub(self.limit)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LimitChecker {
    limit: u64,
}

impl LimitChecker {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// Count every record (duplicates by stock number included) and compare.
    pub fn check(&self, dataset: &StockDataset) -> LimitStatus {
        self.check_count(dataset.len() as u64)
    }

    pub fn check_count(&self, count: u64) -> LimitStatus {
        LimitStatus {
            count,
            limit: self.limit,
            // count >= 0.9 * limit, kept in integers
            near_limit: count.saturating_mul(10) >= self.limit.saturating_mul(9),
            exceeded: count > self.limit,
        }
    }
}

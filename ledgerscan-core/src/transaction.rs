//! Canonical transaction record produced by every statement format.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Normalized output of the extraction core (bank-agnostic).
///
/// Field names are the export contract: `date, description, debit, credit,
/// balance, page, source_file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Always fully resolved, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub description: String,
    /// Money out. Non-negative, `0.0` when the line is a credit.
    pub debit: f64,
    /// Money in. Non-negative, `0.0` when the line is a debit.
    pub credit: f64,
    /// Running balance as printed (negative when overdrawn).
    pub balance: Option<f64>,
    /// 1-based page index within the originating document
    pub page: u32,
    /// Caller-assigned document identifier, carried through untouched
    pub source_file: String,
}

impl TransactionRecord {
    /// Positive = money in, negative = money out.
    pub fn net_amount(&self) -> f64 {
        self.credit - self.debit
    }

    pub fn is_debit(&self) -> bool {
        self.debit > 0.0
    }

    /// Grouping key used by monthly aggregation.
    pub fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

//! Per-month statistics over an extracted transaction collection.
//!
//! Rows are derived, never edited: recompute whenever the collection changes.

use std::collections::{BTreeMap, BTreeSet};

use ledgerscan_core::{TransactionRecord, from_cents, to_cents};
use serde::{Deserialize, Serialize};

/// One row per calendar month present in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_debit: f64,
    pub total_credit: f64,
    /// `None` when no record in the month prints a balance
    pub lowest_balance: Option<f64>,
    pub highest_balance: Option<f64>,
    /// Balance of the last record of the month in input order (not the largest)
    pub ending_balance: Option<f64>,
    pub transaction_count: usize,
    pub source_files: BTreeSet<String>,
}

impl MonthlySummary {
    /// `YYYY-MM`
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn net_flow(&self) -> f64 {
        from_cents(to_cents(self.total_credit) - to_cents(self.total_debit))
    }
}

#[derive(Default)]
struct MonthAccumulator {
    debit_cents: i64,
    credit_cents: i64,
    lowest: Option<f64>,
    highest: Option<f64>,
    ending: Option<f64>,
    count: usize,
    sources: BTreeSet<String>,
}

impl MonthAccumulator {
    fn add(&mut self, txn: &TransactionRecord) {
        self.debit_cents += to_cents(txn.debit);
        self.credit_cents += to_cents(txn.credit);
        self.count += 1;
        self.sources.insert(txn.source_file.clone());

        if let Some(balance) = txn.balance {
            self.lowest = Some(self.lowest.map_or(balance, |low| low.min(balance)));
            self.highest = Some(self.highest.map_or(balance, |high| high.max(balance)));
            // later in input order always wins
            self.ending = Some(balance);
        }
    }
}

/// Group by the resolved `(year, month)` of each record, oldest month first.
///
/// `txns` must be in extraction order; it is not re-sorted by date.
pub fn summarize_by_month(txns: &[TransactionRecord]) -> Vec<MonthlySummary> {
    let mut groups: BTreeMap<(i32, u32), MonthAccumulator> = BTreeMap::new();
    for txn in txns {
        groups.entry(txn.year_month()).or_default().add(txn);
    }

    groups
        .into_iter()
        .map(|((year, month), acc)| MonthlySummary {
            year,
            month,
            total_debit: from_cents(acc.debit_cents),
            total_credit: from_cents(acc.credit_cents),
            lowest_balance: acc.lowest,
            highest_balance: acc.highest,
            ending_balance: acc.ending,
            transaction_count: acc.count,
            source_files: acc.sources,
        })
        .collect()
}

/// Whole-batch totals, for report footers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTotals {
    pub total_debit: f64,
    pub total_credit: f64,
    pub transaction_count: usize,
    pub months: usize,
}

pub fn batch_totals(txns: &[TransactionRecord]) -> BatchTotals {
    let debit: i64 = txns.iter().map(|t| to_cents(t.debit)).sum();
    let credit: i64 = txns.iter().map(|t| to_cents(t.credit)).sum();
    let months: BTreeSet<_> = txns.iter().map(|t| t.year_month()).collect();
    BatchTotals {
        total_debit: from_cents(debit),
        total_credit: from_cents(credit),
        transaction_count: txns.len(),
        months: months.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: (i32, u32, u32), debit: f64, credit: f64, balance: Option<f64>, src: &str) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: "x".to_string(),
            debit,
            credit,
            balance,
            page: 1,
            source_file: src.to_string(),
        }
    }

    #[test]
    fn test_january_row() {
        let txns = vec![
            txn((2025, 1, 5), 0.0, 100.0, Some(100.0), "a.pdf"),
            txn((2025, 1, 20), 20.0, 0.0, Some(80.0), "a.pdf"),
            txn((2025, 2, 1), 30.0, 0.0, Some(50.0), "b.pdf"),
        ];
        let rows = summarize_by_month(&txns);
        assert_eq!(rows.len(), 2);

        let jan = &rows[0];
        assert_eq!(jan.period(), "2025-01");
        assert_eq!(jan.lowest_balance, Some(80.0));
        assert_eq!(jan.highest_balance, Some(100.0));
        assert_eq!(jan.ending_balance, Some(80.0));
        assert_eq!(jan.transaction_count, 2);
        assert_eq!(jan.net_flow(), 80.0);
        assert_eq!(rows[1].source_files.iter().collect::<Vec<_>>(), vec!["b.pdf"]);
    }

    #[test]
    fn test_ending_balance_follows_input_order_not_date() {
        // a later page can carry an earlier date; input order decides
        let txns = vec![
            txn((2025, 3, 28), 1.0, 0.0, Some(10.0), "a.pdf"),
            txn((2025, 3, 2), 1.0, 0.0, Some(99.0), "a.pdf"),
        ];
        assert_eq!(summarize_by_month(&txns)[0].ending_balance, Some(99.0));
    }

    #[test]
    fn test_sums_are_exact() {
        let txns: Vec<_> = (0..10)
            .map(|_| txn((2025, 4, 1), 0.10, 0.0, None, "a.pdf"))
            .collect();
        let row = &summarize_by_month(&txns)[0];
        assert_eq!(row.total_debit, 1.0);
        assert_eq!(row.lowest_balance, None);
        assert_eq!(row.ending_balance, None);
    }

    #[test]
    fn test_months_sorted_across_years() {
        let txns = vec![
            txn((2025, 1, 3), 1.0, 0.0, None, "a.pdf"),
            txn((2024, 12, 30), 1.0, 0.0, None, "a.pdf"),
        ];
        let periods: Vec<_> = summarize_by_month(&txns).iter().map(|r| r.period()).collect();
        assert_eq!(periods, vec!["2024-12", "2025-01"]);
    }

    #[test]
    fn test_batch_totals() {
        let txns = vec![
            txn((2025, 1, 3), 12.34, 0.0, None, "a.pdf"),
            txn((2025, 2, 3), 0.0, 100.0, None, "a.pdf"),
        ];
        let totals = batch_totals(&txns);
        assert_eq!(totals.total_debit, 12.34);
        assert_eq!(totals.total_credit, 100.0);
        assert_eq!(totals.months, 2);
        assert_eq!(batch_totals(&[]), BatchTotals::default());
    }
}

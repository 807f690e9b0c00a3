//! ledgerscan-finance: statistics derived from extracted transactions.

pub mod monthly_summary;

pub use monthly_summary::{BatchTotals, MonthlySummary, batch_totals, summarize_by_month};

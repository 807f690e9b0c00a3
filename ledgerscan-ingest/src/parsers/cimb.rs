//! CIMB statement recognizer (table cells)
//!
//! CIMB prints withdrawals and deposits in separate columns with no sign
//! marker, so the flattened text cannot tell them apart. This recognizer reads
//! the page's table grid instead:
//!
//!   | Date       | Description          | Cheque / Ref | Withdrawal | Deposits | Balance  |
//!   | 02/03/2025 | DUITNOW TO ACCOUNT   | 889211       | 300.00     |          | 1,200.00 |
//!   | 05/03/2025 | SALARY ACME SDN BHD  |              |            | 4,000.00 | 5,200.00 |

use ledgerscan_core::{NormalizeError, compose_date, expand_year, parse_amount};
use tracing::{debug, trace};

use crate::recognizer::{Recognition, Recognizer};
use crate::types::{Page, RawTransaction, Row, Side, StatementDate};

/// Column positions within a CIMB transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CimbColumns {
    pub date: usize,
    pub description: usize,
    pub reference: Option<usize>,
    pub withdrawal: usize,
    pub deposit: usize,
    pub balance: usize,
}

impl Default for CimbColumns {
    fn default() -> Self {
        Self {
            date: 0,
            description: 1,
            reference: Some(2),
            withdrawal: 3,
            deposit: 4,
            balance: 5,
        }
    }
}

impl CimbColumns {
    /// Column layout from a header row, or `None` if the row is not a header.
    ///
    /// A row carrying a `DD/MM/YYYY` cell is a transaction, whatever its
    /// description says, and each required column must sit in its own cell.
    pub fn from_header(cells: &[String]) -> Option<Self> {
        if cells.iter().any(|c| date_parts(c.trim()).is_some()) {
            return None;
        }
        let upper: Vec<String> = cells.iter().map(|c| c.to_uppercase()).collect();
        let find = |needles: &[&str]| upper.iter().position(|c| needles.iter().any(|n| c.contains(n)));

        let date = find(&["DATE", "TARIKH"])?;
        let balance = find(&["BALANCE", "BAKI"])?;
        let withdrawal = find(&["WITHDRAWAL", "DEBIT"])?;
        let deposit = find(&["DEPOSIT", "CREDIT"])?;
        let required = [date, balance, withdrawal, deposit];
        if required.iter().enumerate().any(|(i, a)| required[i + 1..].contains(a)) {
            return None;
        }
        let defaults = Self::default();
        Some(Self {
            date,
            description: find(&["DESCRIPTION", "DISKRIPSI", "TRANSACTION"])
                .unwrap_or(defaults.description),
            reference: find(&["CHEQUE", "REF", "NO CEK"]),
            withdrawal,
            deposit,
            balance,
        })
    }

    pub fn recognize(&self, cells: &[String]) -> Recognition {
        let cell = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or("");

        let Some((d, m, y)) = date_parts(cell(self.date)) else {
            return Recognition::NoMatch;
        };

        let withdrawal = cell(self.withdrawal);
        let deposit = cell(self.deposit);
        let (amount_text, side) = match (withdrawal.is_empty(), deposit.is_empty()) {
            (false, true) => (withdrawal, Side::Debit),
            (true, false) => (deposit, Side::Credit),
            // opening/closing balance rows, or a row we cannot attribute
            _ => return Recognition::NoMatch,
        };

        let mut description = join_cell(cell(self.description));
        if let Some(reference) = self.reference.map(cell).filter(|r| !r.is_empty()) {
            description.push(' ');
            description.push_str(&join_cell(reference));
        }

        self.build(d, m, y, amount_text, side, &description, cell(self.balance))
            .into()
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        day: &str,
        month: &str,
        year: &str,
        amount_text: &str,
        side: Side,
        description: &str,
        balance_text: &str,
    ) -> Result<RawTransaction, NormalizeError> {
        let invalid = |s: &str| NormalizeError::InvalidDate(s.to_string());
        let day: u32 = day.parse().map_err(|_| invalid(day))?;
        let month: u32 = month.parse().map_err(|_| invalid(month))?;
        let date = compose_date(expand_year(year)?, month, day)?;

        let amount = parse_amount(amount_text)?;
        let balance = if balance_text.is_empty() {
            None
        } else {
            Some(parse_amount(balance_text)?)
        };
        RawTransaction::new(
            StatementDate::Full(date),
            description,
            amount,
            side,
            balance,
        )
    }
}

/// Splits a `DD/MM/YY(YY)` cell into its digit groups.
fn date_parts(cell: &str) -> Option<(&str, &str, &str)> {
    let mut parts = cell.split('/');
    let (Some(d), Some(m), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    [d, m, y]
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .then_some((d, m, y))
}

/// Cells wrap long text over several lines; collapse to single spaces.
fn join_cell(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CimbRecognizer;

impl Recognizer for CimbRecognizer {
    fn id(&self) -> &'static str {
        "cimb"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cimb-bank"]
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["CIMB"]
    }

    fn recognize(&self, row: Row<'_>) -> Recognition {
        match row {
            Row::Cells(cells) => CimbColumns::default().recognize(cells),
            Row::Line(_) => Recognition::NoMatch,
        }
    }

    fn scan_page(&self, page: &Page) -> Vec<RawTransaction> {
        let mut out = Vec::new();
        for (t, table) in page.tables.iter().enumerate() {
            let mut columns = CimbColumns::default();
            for cells in &table.rows {
                if let Some(header) = CimbColumns::from_header(cells) {
                    debug!(page = page.number, table = t, ?header, "cimb header row");
                    columns = header;
                    continue;
                }
                match columns.recognize(cells) {
                    Recognition::Matched(txn) => out.push(txn),
                    Recognition::Rejected(err) => {
                        trace!(format = "cimb", kind = err.kind(), error = %err, "row rejected");
                    }
                    Recognition::NoMatch => {}
                }
            }
        }
        out
    }
}

use chrono::{Datelike, NaiveDate};
use ledgerscan_core::{NormalizeError, TransactionRecord};
use serde::{Deserialize, Serialize};

/// One page of already-extracted statement content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page index within the document
    pub number: u32,
    /// Flattened page text, possibly multi-line
    pub text: String,
    /// Cell grids for table-structured formats (empty for text-only input)
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Page {
    pub fn text(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_tables(mut self, tables: Vec<Table>) -> Self {
        self.tables = tables;
        self
    }
}

/// A grid of text cells, row-major, as produced by layout extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// What a recognizer is asked to interpret.
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    /// A trimmed, non-empty line of page text
    Line(&'a str),
    /// One table row
    Cells(&'a [String]),
}

/// Date as printed on the statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementDate {
    /// `DD/MM` rows; the year comes from the statement-year resolver
    DayMonth { day: u32, month: u32 },
    Full(NaiveDate),
}

impl StatementDate {
    pub fn month(&self) -> u32 {
        match self {
            StatementDate::DayMonth { month, .. } => *month,
            StatementDate::Full(date) => date.month(),
        }
    }
}

/// Which side of the ledger a sign marker puts the amount on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    /// `-`/`DR` is money out, `+`/`CR` is money in.
    pub fn from_marker(marker: &str) -> Option<Side> {
        match marker.trim().to_ascii_uppercase().as_str() {
            "-" | "DR" => Some(Side::Debit),
            "+" | "CR" => Some(Side::Credit),
            _ => None,
        }
    }
}

/// Recognizer output before year resolution and provenance stamping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub date: StatementDate,
    pub description: String,
    pub debit: f64,
    pub credit: f64,
    pub balance: Option<f64>,
}

impl RawTransaction {
    /// A signed row must move money: a zero amount is rejected rather than
    /// leaving both sides empty.
    pub fn new(
        date: StatementDate,
        description: &str,
        amount: f64,
        side: Side,
        balance: Option<f64>,
    ) -> Result<Self, NormalizeError> {
        let amount = amount.abs();
        if amount == 0.0 {
            return Err(NormalizeError::MalformedAmount(format!("{amount:.2}")));
        }
        let (debit, credit) = match side {
            Side::Debit => (amount, 0.0),
            Side::Credit => (0.0, amount),
        };
        Ok(Self {
            date,
            description: description.trim().to_string(),
            debit,
            credit,
            balance,
        })
    }

    pub fn into_record(self, date: NaiveDate, page: u32, source_file: &str) -> TransactionRecord {
        TransactionRecord {
            date,
            description: self.description,
            debit: self.debit,
            credit: self.credit,
            balance: self.balance,
            page,
            source_file: source_file.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_markers() {
        assert_eq!(Side::from_marker("-"), Some(Side::Debit));
        assert_eq!(Side::from_marker("cr"), Some(Side::Credit));
        assert_eq!(Side::from_marker("x"), None);
    }

    #[test]
    fn test_raw_transaction_puts_amount_on_one_side() {
        let date = StatementDate::DayMonth { day: 3, month: 4 };
        let out = RawTransaction::new(date, "  ATM WITHDRAWAL ", 50.0, Side::Debit, Some(10.0)).unwrap();
        assert_eq!((out.debit, out.credit), (50.0, 0.0));
        assert_eq!(out.description, "ATM WITHDRAWAL");
        assert_eq!(date.month(), 4);
    }

    #[test]
    fn test_zero_amount_is_malformed() {
        let date = StatementDate::DayMonth { day: 1, month: 1 };
        let err = RawTransaction::new(date, "PROFIT PAID", 0.0, Side::Credit, Some(100.0)).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedAmount(_)));
    }
}

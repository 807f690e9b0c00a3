//! RHB statement recognizer (text)
//!
//! RHB rows carry a full date with a month name, and print the running
//! balance before the transaction amount. The amount has a trailing sign.
//!
//!   DATE        DESCRIPTION                       BALANCE        AMOUNT
//!   07-Jan-25   DUITNOW QR MERCHANT 88123        2,310.45        45.60-
//!   09-Jan-2025 INWARD IBG SALARY                6,810.45     4,500.00+

use std::sync::OnceLock;

use ledgerscan_core::{NormalizeError, compose_date, expand_year, parse_amount, resolve_month_name};
use regex::{Captures, Regex};

use super::AMOUNT;
use crate::recognizer::{Recognition, Recognizer};
use crate::types::{RawTransaction, Row, Side, StatementDate};

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<day>\d{{2}})-(?P<mon>[A-Za-z]{{3}})-(?P<year>\d{{4}}|\d{{2}})\s+(?P<desc>.+?)\s+(?P<balance>-?{AMOUNT})\s+(?P<amount>{AMOUNT})(?P<sign>[+-])\s*$"
        ))
        .expect("rhb row regex")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RhbRecognizer;

fn build(caps: &Captures<'_>) -> Result<RawTransaction, NormalizeError> {
    let month = resolve_month_name(&caps["mon"])?;
    let year = expand_year(&caps["year"])?;
    let day: u32 = caps["day"]
        .parse()
        .map_err(|_| NormalizeError::InvalidDate(caps["day"].to_string()))?;
    let date = compose_date(year, month, day)?;

    let balance = parse_amount(&caps["balance"])?;
    let amount = parse_amount(&caps["amount"])?;
    let side = Side::from_marker(&caps["sign"]).unwrap_or(Side::Debit);
    RawTransaction::new(
        StatementDate::Full(date),
        &caps["desc"],
        amount,
        side,
        Some(balance),
    )
}

impl Recognizer for RhbRecognizer {
    fn id(&self) -> &'static str {
        "rhb"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rhb-bank"]
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["RHB"]
    }

    fn recognize(&self, row: Row<'_>) -> Recognition {
        let Row::Line(line) = row else {
            return Recognition::NoMatch;
        };
        match row_re().captures(line) {
            Some(caps) => build(&caps).into(),
            None => Recognition::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Page;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_rhb_rows() {
        let text = r#"
RHB BANK BERHAD
DATE        DESCRIPTION                       BALANCE        AMOUNT
            B/F BALANCE                      2,356.05
07-Jan-25   DUITNOW QR MERCHANT 88123        2,310.45        45.60-
09-Jan-2025 INWARD IBG SALARY                6,810.45     4,500.00+
"#;
        let txns = RhbRecognizer.scan_page(&Page::text(1, text));
        assert_eq!(txns.len(), 2);
        assert_eq!(
            txns[0].date,
            StatementDate::Full(NaiveDate::from_ymd_opt(2025, 1, 7).unwrap())
        );
        assert_eq!(txns[0].description, "DUITNOW QR MERCHANT 88123");
        assert_eq!((txns[0].debit, txns[0].credit), (45.60, 0.0));
        assert_eq!(txns[0].balance, Some(2310.45));
        assert_eq!((txns[1].debit, txns[1].credit), (0.0, 4500.0));
    }

    #[test]
    fn test_negative_balance() {
        let Recognition::Matched(txn) =
            RhbRecognizer.recognize(Row::Line("12-Feb-25 SERVICE CHARGE -12.00 10.00-"))
        else {
            panic!("expected a match");
        };
        assert_eq!(txn.balance, Some(-12.0));
        assert_eq!(txn.debit, 10.0);
    }

    #[test]
    fn test_bad_calendar_date_is_rejected() {
        let out = RhbRecognizer.recognize(Row::Line("30-Feb-25 SERVICE CHARGE 12.00 10.00-"));
        assert!(matches!(out, Recognition::Rejected(NormalizeError::InvalidDate(_))));
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let out = RhbRecognizer.recognize(Row::Line("12-Feb-25 REVERSAL 22.00 0.00+"));
        assert!(matches!(out, Recognition::Rejected(NormalizeError::MalformedAmount(_))));
    }
}

//! Maybank statement recognizer (text)
//!
//! Two row layouts show up in Maybank statements:
//!
//! MTASB (savings/current), sign glued to the amount, year from the header:
//!   STATEMENT DATE : 31/01/25
//!   01/01     TRANSFER FR A/C  ALI BIN ABU        1,250.00+       5,430.10
//!   03/01     DEBIT CARD  TESCO KLANG               88.40-        5,341.70
//!
//! MBB, full date and a separate sign column:
//!   05 Jan 2025   IBG PAYMENT TNB            120.00 -    3,120.55

use std::sync::OnceLock;

use ledgerscan_core::{NormalizeError, compose_date, parse_amount, parse_day_month, resolve_month_name};
use regex::{Captures, Regex};

use super::AMOUNT;
use crate::recognizer::{Recognition, Recognizer};
use crate::types::{RawTransaction, Row, Side, StatementDate};

fn mtasb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<date>\d{{2}}/\d{{2}})\s+(?P<desc>.+?)\s+(?P<amount>{AMOUNT})(?P<sign>[+-])\s+(?P<balance>{AMOUNT})"
        ))
        .expect("maybank mtasb regex")
    })
}

fn mbb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<day>\d{{2}})\s+(?P<mon>[A-Za-z]{{3}})\s+(?P<year>\d{{4}})\s+(?P<desc>.+?)\s+(?P<amount>{AMOUNT})\s+(?P<sign>[+-])\s+(?P<balance>{AMOUNT})"
        ))
        .expect("maybank mbb regex")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaybankRecognizer;

impl MaybankRecognizer {
    fn from_mtasb(caps: &Captures<'_>) -> Result<RawTransaction, NormalizeError> {
        let (day, month) = parse_day_month(&caps["date"])?;
        build(StatementDate::DayMonth { day, month }, caps)
    }

    fn from_mbb(caps: &Captures<'_>) -> Result<RawTransaction, NormalizeError> {
        let month = resolve_month_name(&caps["mon"])?;
        let day: u32 = caps["day"]
            .parse()
            .map_err(|_| NormalizeError::InvalidDate(caps["day"].to_string()))?;
        let year: i32 = caps["year"]
            .parse()
            .map_err(|_| NormalizeError::InvalidDate(caps["year"].to_string()))?;
        build(StatementDate::Full(compose_date(year, month, day)?), caps)
    }
}

fn build(date: StatementDate, caps: &Captures<'_>) -> Result<RawTransaction, NormalizeError> {
    let amount = parse_amount(&caps["amount"])?;
    let balance = parse_amount(&caps["balance"])?;
    // the regex only admits + or -
    let side = Side::from_marker(&caps["sign"]).unwrap_or(Side::Debit);
    RawTransaction::new(date, &caps["desc"], amount, side, Some(balance))
}

impl Recognizer for MaybankRecognizer {
    fn id(&self) -> &'static str {
        "maybank"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["mbb", "mtasb"]
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["MAYBANK", "MALAYAN BANKING"]
    }

    fn recognize(&self, row: Row<'_>) -> Recognition {
        let Row::Line(line) = row else {
            return Recognition::NoMatch;
        };
        if let Some(caps) = mtasb_re().captures(line) {
            return Self::from_mtasb(&caps).into();
        }
        if let Some(caps) = mbb_re().captures(line) {
            return Self::from_mbb(&caps).into();
        }
        Recognition::NoMatch
    }
}

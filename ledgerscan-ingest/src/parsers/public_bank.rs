//! Public Bank (PBB/PBe) statement recognizer (text)
//!
//! Rows print `DD/MM` only, with the debit/credit marker in its own column
//! between the amount and the balance. An `OD` suffix marks an overdrawn
//! balance.
//!
//!   DATE   TRANSACTION                         AMOUNT        BALANCE
//!   02/05  DUITNOW TRSF CR 012345 ACME SDN    1,500.00 CR    6,210.00
//!   04/05  CHQ WITHDRAWAL 100234                 750.00 DR      240.00 OD

use std::sync::OnceLock;

use ledgerscan_core::{NormalizeError, parse_amount, parse_day_month};
use regex::{Captures, Regex};

use super::AMOUNT;
use crate::recognizer::{Recognition, Recognizer};
use crate::types::{RawTransaction, Row, Side, StatementDate};

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<date>\d{{2}}/\d{{2}})\s+(?P<desc>.+?)\s+(?P<amount>{AMOUNT})\s+(?P<side>(?i:DR|CR))\s+(?P<balance>{AMOUNT})(?:\s*(?P<od>(?i:OD)))?\s*$"
        ))
        .expect("public bank row regex")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PublicBankRecognizer;

fn build(caps: &Captures<'_>) -> Result<RawTransaction, NormalizeError> {
    let (day, month) = parse_day_month(&caps["date"])?;
    let amount = parse_amount(&caps["amount"])?;
    let mut balance = parse_amount(&caps["balance"])?;
    if caps.name("od").is_some() {
        balance = -balance;
    }
    let side = Side::from_marker(&caps["side"]).unwrap_or(Side::Debit);
    RawTransaction::new(
        StatementDate::DayMonth { day, month },
        &caps["desc"],
        amount,
        side,
        Some(balance),
    )
}

impl Recognizer for PublicBankRecognizer {
    fn id(&self) -> &'static str {
        "pbb"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["public-bank", "publicbank", "pbe"]
    }

    fn keywords(&self) -> &'static [&'static str] {
        &["PUBLIC BANK", "PBEBANK", "PBB"]
    }

    fn recognize(&self, row: Row<'_>) -> Recognition {
        match row {
            Row::Line(line) => match row_re().captures(line) {
                Some(caps) => build(&caps).into(),
                None => Recognition::NoMatch,
            },
            Row::Cells(_) => Recognition::NoMatch,
        }
    }
}

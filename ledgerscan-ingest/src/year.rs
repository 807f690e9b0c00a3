//! Statement-year inference for rows that only print `DD/MM`.
//!
//! The year comes from a `STATEMENT DATE` declaration when the header carries
//! one, otherwise from the caller's fallback. A month <= Feb that follows a
//! month >= Nov bumps the year by one.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use ledgerscan_core::{NormalizeError, compose_date, expand_year};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::StatementDate;

fn statement_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)STATEMENT\s+DATE\s*:?\s*\d{2}/\d{2}/(\d{2,4})")
            .expect("statement date regex")
    })
}

/// Year of the `STATEMENT DATE : DD/MM/YY[YY]` declaration, if the page has one.
pub fn detect_declared_year(full_page_text: &str) -> Option<i32> {
    let caps = statement_date_re().captures(full_page_text)?;
    expand_year(&caps[1]).ok()
}

/// How far one resolver's memory reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearScope {
    /// Fresh state per document
    #[default]
    Document,
    /// One state for the whole batch, in caller order
    Session,
}

impl FromStr for YearScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "file" => Ok(YearScope::Document),
            "session" | "batch" => Ok(YearScope::Session),
            other => Err(format!("unknown year scope: {other} (expected document|session)")),
        }
    }
}

impl fmt::Display for YearScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearScope::Document => f.write_str("document"),
            YearScope::Session => f.write_str("session"),
        }
    }
}

/// Resolver memory for one statement scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementYearState {
    /// Year from a `STATEMENT DATE` header; searched for until found, then fixed
    pub declared_year: Option<i32>,
    pub resolved_year: Option<i32>,
    pub last_seen_month: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct StatementYearResolver {
    fallback_year: Option<i32>,
    state: StatementYearState,
}

impl StatementYearResolver {
    pub fn new(fallback_year: Option<i32>) -> Self {
        Self {
            fallback_year,
            state: StatementYearState::default(),
        }
    }

    pub fn state(&self) -> &StatementYearState {
        &self.state
    }

    /// Feed the full text of the next page, in page order.
    pub fn observe_page(&mut self, full_page_text: &str) -> Option<i32> {
        if self.state.declared_year.is_none() {
            if let Some(year) = detect_declared_year(full_page_text) {
                debug!(year, "statement year declared");
                self.state.declared_year = Some(year);
                self.state.resolved_year = Some(year);
            }
        }
        self.state.declared_year
    }

    /// Year for the next `DD/MM` row of the given month.
    ///
    /// `None` when neither a declaration nor a fallback is available, or when
    /// a rollover would run past `i32::MAX`.
    pub fn advance(&mut self, month: u32) -> Option<i32> {
        let year = match (self.state.resolved_year, self.state.last_seen_month) {
            (Some(year), Some(last)) if month <= 2 && last >= 11 => {
                let next = year.checked_add(1)?;
                debug!(from = year, to = next, last, month, "statement year rollover");
                next
            }
            (Some(year), _) => year,
            (None, _) => self.state.declared_year.or(self.fallback_year)?,
        };
        self.state.resolved_year = Some(year);
        self.state.last_seen_month = Some(month);
        Some(year)
    }

    /// A fully dated row pins the sequence so later `DD/MM` rows continue from it.
    pub fn anchor(&mut self, date: NaiveDate) {
        self.state.resolved_year = Some(date.year());
        self.state.last_seen_month = Some(date.month());
    }

    pub fn resolve(&mut self, date: StatementDate) -> Result<NaiveDate, NormalizeError> {
        match date {
            StatementDate::Full(full) => {
                self.anchor(full);
                Ok(full)
            }
            StatementDate::DayMonth { day, month } => {
                let year = self.advance(month).ok_or_else(|| {
                    NormalizeError::InvalidDate(format!("{day:02}/{month:02} has no statement year"))
                })?;
                compose_date(year, month, day)
            }
        }
    }
}

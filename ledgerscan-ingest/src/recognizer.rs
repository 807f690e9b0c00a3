//! The capability every bank format implements.

use ledgerscan_core::NormalizeError;
use tracing::trace;

use crate::types::{Page, RawTransaction, Row};

/// Outcome of offering one line or row to a recognizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    /// Not this format's shape; silent
    NoMatch,
    /// Shape matched but a field failed normalization; the row is dropped
    Rejected(NormalizeError),
    Matched(RawTransaction),
}

impl From<Result<RawTransaction, NormalizeError>> for Recognition {
    fn from(result: Result<RawTransaction, NormalizeError>) -> Self {
        match result {
            Ok(txn) => Recognition::Matched(txn),
            Err(err) => Recognition::Rejected(err),
        }
    }
}

/// A statement format. Implementations are pure: no state between rows.
pub trait Recognizer: Send + Sync {
    /// Identifier used for explicit selection (`"maybank"`, `"cimb"`, ...).
    fn id(&self) -> &'static str;

    /// Other accepted spellings of [`Recognizer::id`].
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Upper-case page-text markers that suggest this format during auto-detect.
    fn keywords(&self) -> &'static [&'static str];

    fn recognize(&self, row: Row<'_>) -> Recognition;

    fn try_parse(&self, row: Row<'_>) -> Option<RawTransaction> {
        match self.recognize(row) {
            Recognition::Matched(txn) => Some(txn),
            Recognition::Rejected(err) => {
                trace!(format = self.id(), kind = err.kind(), error = %err, "row rejected");
                None
            }
            Recognition::NoMatch => None,
        }
    }

    /// Every transaction on the page, top to bottom.
    ///
    /// Line-oriented formats use this as is; table formats override it.
    fn scan_page(&self, page: &Page) -> Vec<RawTransaction> {
        page.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.try_parse(Row::Line(line)))
            .collect()
    }

    fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.id().eq_ignore_ascii_case(name)
            || self.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// `upper_text` must already be upper-cased.
    fn hinted_by(&self, upper_text: &str) -> bool {
        self.keywords().iter().any(|k| upper_text.contains(k))
    }
}

//! Format selection: an explicit format, or auto-detect in priority order.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::parsers;
use crate::recognizer::Recognizer;
use crate::types::{Page, RawTransaction};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatHint {
    #[default]
    Auto,
    /// Recognizer id or alias; only that recognizer runs
    Explicit(String),
}

impl FromStr for FormatHint {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() || s == "auto" {
            Ok(FormatHint::Auto)
        } else {
            Ok(FormatHint::Explicit(s))
        }
    }
}

impl fmt::Display for FormatHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatHint::Auto => f.write_str("auto"),
            FormatHint::Explicit(id) => f.write_str(id),
        }
    }
}

/// Recognizers in priority order.
pub struct RecognizerRegistry {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl Default for RecognizerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecognizerRegistry {
    pub fn empty() -> Self {
        Self {
            recognizers: Vec::new(),
        }
    }

    /// Maybank, Public Bank, RHB, CIMB.
    pub fn standard() -> Self {
        Self {
            recognizers: parsers::builtin(),
        }
    }

    /// Append at the lowest priority.
    pub fn register(&mut self, recognizer: Box<dyn Recognizer>) -> &mut Self {
        self.recognizers.push(recognizer);
        self
    }

    pub fn find(&self, name: &str) -> Option<&dyn Recognizer> {
        self.recognizers
            .iter()
            .find(|r| r.answers_to(name))
            .map(|r| &**r)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.recognizers.iter().map(|r| r.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Recognizer> {
        self.recognizers.iter().map(|r| &**r)
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }
}

/// The winning recognizer's output for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMatch {
    pub format: &'static str,
    pub transactions: Vec<RawTransaction>,
}

pub struct Dispatcher {
    registry: RecognizerRegistry,
    hint: FormatHint,
}

impl Dispatcher {
    pub fn new(registry: RecognizerRegistry, hint: FormatHint) -> Self {
        Self { registry, hint }
    }

    pub fn hint(&self) -> &FormatHint {
        &self.hint
    }

    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Records from exactly one recognizer, or `None` if nothing matched.
    ///
    /// In auto mode the first recognizer whose keyword appears on the page is
    /// tried first, then the rest in priority order. The first one producing
    /// any record wins the page.
    pub fn dispatch(&self, page: &Page) -> Option<PageMatch> {
        match &self.hint {
            FormatHint::Explicit(name) => match self.registry.find(name) {
                Some(recognizer) => run(recognizer, page),
                None => {
                    warn!(format = %name, page = page.number, "no recognizer registered for format");
                    None
                }
            },
            FormatHint::Auto => {
                let upper = page.text.to_uppercase();
                let hinted = self.registry.iter().position(|r| r.hinted_by(&upper));
                if let Some(idx) = hinted {
                    debug!(page = page.number, format = self.registry.recognizers[idx].id(), "keyword hint");
                }

                let order = hinted
                    .into_iter()
                    .chain((0..self.registry.len()).filter(|i| Some(*i) != hinted));
                for idx in order {
                    if let Some(hit) = run(&*self.registry.recognizers[idx], page) {
                        return Some(hit);
                    }
                }
                None
            }
        }
    }
}

fn run(recognizer: &dyn Recognizer, page: &Page) -> Option<PageMatch> {
    let transactions = recognizer.scan_page(page);
    if transactions.is_empty() {
        return None;
    }
    debug!(
        page = page.number,
        format = recognizer.id(),
        count = transactions.len(),
        "page recognized"
    );
    Some(PageMatch {
        format: recognizer.id(),
        transactions,
    })
}

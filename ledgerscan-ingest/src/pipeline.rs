//! Drives documents through dispatch and year resolution.

use ledgerscan_core::TransactionRecord;
use tracing::{debug, info, warn};

use crate::dispatch::{Dispatcher, FormatHint, RecognizerRegistry};
use crate::document::DocumentSource;
use crate::error::ExtractError;
use crate::types::Page;
use crate::year::{StatementYearResolver, YearScope};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub hint: FormatHint,
    /// Used only when a statement declares no year of its own
    pub fallback_year: Option<i32>,
    pub year_scope: YearScope,
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFailure {
    pub source_file: String,
    pub error: ExtractError,
}

/// Best-effort result of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Input order: documents as given, pages ascending, lines top to bottom
    pub transactions: Vec<TransactionRecord>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Pipeline {
    dispatcher: Dispatcher,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(registry: RecognizerRegistry, options: PipelineOptions) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry, options.hint.clone()),
            options,
        }
    }

    pub fn with_standard_formats(options: PipelineOptions) -> Self {
        Self::new(RecognizerRegistry::standard(), options)
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Fresh year state for one statement scope.
    pub fn new_resolver(&self) -> StatementYearResolver {
        StatementYearResolver::new(self.options.fallback_year)
    }

    /// Process every document in order. A document that cannot be loaded is
    /// recorded in `failures` and the batch carries on.
    pub fn extract<D: DocumentSource>(&self, documents: &[D]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let mut session = self.new_resolver();

        for doc in documents {
            let source_id = doc.source_id();
            let pages = match doc.load_pages() {
                Ok(pages) => pages,
                Err(error) => {
                    warn!(source = source_id, %error, "skipping document");
                    outcome.failures.push(DocumentFailure {
                        source_file: source_id.to_string(),
                        error,
                    });
                    continue;
                }
            };

            let txns = match self.options.year_scope {
                YearScope::Session => self.extract_document(&mut session, source_id, &pages),
                YearScope::Document => {
                    let mut resolver = self.new_resolver();
                    self.extract_document(&mut resolver, source_id, &pages)
                }
            };
            info!(source = source_id, pages = pages.len(), transactions = txns.len(), "document extracted");
            outcome.transactions.extend(txns);
        }

        outcome
    }

    /// One document against a caller-owned resolver. Pages must be in order.
    ///
    /// Independent documents may run on separate threads as long as each gets
    /// its own resolver.
    pub fn extract_document(
        &self,
        resolver: &mut StatementYearResolver,
        source_id: &str,
        pages: &[Page],
    ) -> Vec<TransactionRecord> {
        let mut out = Vec::new();

        for page in pages {
            resolver.observe_page(&page.text);

            let Some(hit) = self.dispatcher.dispatch(page) else {
                debug!(source = source_id, page = page.number, "no transactions on page");
                continue;
            };

            for raw in hit.transactions {
                match resolver.resolve(raw.date) {
                    Ok(date) => out.push(raw.into_record(date, page.number, source_id)),
                    Err(err) => {
                        warn!(
                            source = source_id,
                            page = page.number,
                            format = hit.format,
                            description = %raw.description,
                            error = %err,
                            "dropping row with unresolvable date"
                        );
                    }
                }
            }
        }

        out
    }
}

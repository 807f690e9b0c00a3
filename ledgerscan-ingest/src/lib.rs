//! ledgerscan-ingest: bank statement recognizers, statement-year inference and
//! the page/document extraction pipeline.

pub mod dispatch;
pub mod document;
pub mod error;
pub mod parsers;
pub mod pipeline;
pub mod recognizer;
pub mod types;
pub mod year;

pub use dispatch::{Dispatcher, FormatHint, PageMatch, RecognizerRegistry};
pub use document::{DocumentSource, FileDocument, InMemoryDocument};
pub use error::ExtractError;
pub use pipeline::{BatchOutcome, DocumentFailure, Pipeline, PipelineOptions};
pub use recognizer::{Recognition, Recognizer};
pub use types::{Page, RawTransaction, Row, Side, StatementDate, Table};
pub use year::{StatementYearResolver, StatementYearState, YearScope, detect_declared_year};

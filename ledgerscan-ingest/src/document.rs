//! Documents as the pipeline sees them: an id plus already-extracted pages.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ExtractError;
use crate::types::{Page, Table};

/// Page separator in plain-text extracts (pdftotext and friends).
const FORM_FEED: char = '\u{000C}';

pub trait DocumentSource {
    /// Opaque identifier stamped on every record as `source_file`.
    fn source_id(&self) -> &str;

    fn load_pages(&self) -> Result<Vec<Page>, ExtractError>;
}

/// Pages the caller already holds in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryDocument {
    pub source_id: String,
    pub pages: Vec<Page>,
}

impl InMemoryDocument {
    pub fn new(source_id: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            source_id: source_id.into(),
            pages,
        }
    }

    /// Text-only pages, numbered from 1.
    pub fn from_texts<I, S>(source_id: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Page::text(i as u32 + 1, text))
            .collect();
        Self::new(source_id, pages)
    }
}

impl DocumentSource for InMemoryDocument {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn load_pages(&self) -> Result<Vec<Page>, ExtractError> {
        Ok(self.pages.clone())
    }
}

/// An extract on disk.
///
/// `.json` files hold `{"pages": [{"text": "...", "tables": [[[cell, ...], ...]]}]}`;
/// anything else is plain text with form feeds between pages.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDocument {
    path: PathBuf,
    source_id: String,
}

impl FileDocument {
    /// The file name becomes the source id.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let source_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, source_id }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl DocumentSource for FileDocument {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn load_pages(&self) -> Result<Vec<Page>, ExtractError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ExtractError::unavailable(&self.source_id, format!("{}: {e}", self.path.display())))?;

        if self.is_json() {
            let doc: JsonDocument = serde_json::from_str(&raw)
                .map_err(|e| ExtractError::unavailable(&self.source_id, format!("invalid page JSON: {e}")))?;
            return Ok(doc.into_pages());
        }
        Ok(split_text_pages(&raw))
    }
}

/// Split on form feeds; a trailing blank segment after the last feed is not a page.
pub fn split_text_pages(raw: &str) -> Vec<Page> {
    let mut segments: Vec<&str> = raw.split(FORM_FEED).collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }
    if segments.len() == 1 && segments[0].trim().is_empty() {
        return Vec::new();
    }
    segments
        .into_iter()
        .enumerate()
        .map(|(i, text)| Page::text(i as u32 + 1, text))
        .collect()
}

#[derive(Debug, Deserialize)]
struct JsonDocument {
    pages: Vec<JsonPage>,
}

#[derive(Debug, Deserialize)]
struct JsonPage {
    number: Option<u32>,
    #[serde(default)]
    text: Option<String>,
    /// Layout extractors emit `null` for empty cells
    #[serde(default)]
    tables: Vec<Vec<Vec<Option<String>>>>,
}

impl JsonDocument {
    fn into_pages(self) -> Vec<Page> {
        self.pages
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let tables = p
                    .tables
                    .into_iter()
                    .map(|rows| {
                        Table::new(
                            rows.into_iter()
                                .map(|cells| cells.into_iter().map(Option::unwrap_or_default).collect())
                                .collect(),
                        )
                    })
                    .collect();
                Page::text(p.number.unwrap_or(i as u32 + 1), p.text.unwrap_or_default())
                    .with_tables(tables)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_text_pages() {
        let pages = split_text_pages("page one\n\u{000C}page two\n\u{000C}");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].text, "page two\n");
        assert!(split_text_pages("   ").is_empty());
    }

    #[test]
    fn test_blank_middle_page_keeps_numbering() {
        let pages = split_text_pages("a\u{000C}\u{000C}c");
        assert_eq!(pages.iter().map(|p| p.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(pages[2].text, "c");
    }

    #[test]
    fn test_file_document_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "MAYBANK\u{000C}second").unwrap();
        let doc = FileDocument::new(file.path());
        let pages = doc.load_pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(doc.source_id().ends_with(".txt"));
    }

    #[test]
    fn test_file_document_json_with_null_cells() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"pages": [{{"text": "CIMB", "tables": [[["02/03/2025", null, "1.00"]]]}}]}}"#
        )
        .unwrap();
        let pages = FileDocument::new(file.path()).load_pages().unwrap();
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].tables[0].rows[0], vec!["02/03/2025", "", "1.00"]);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let doc = FileDocument::new("/definitely/not/here.txt").with_source_id("gone.pdf");
        let err = doc.load_pages().unwrap_err();
        assert!(matches!(err, ExtractError::DocumentUnavailable { ref source_id, .. } if source_id == "gone.pdf"));
    }

    #[test]
    fn test_bad_json_is_unavailable() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        assert!(FileDocument::new(file.path()).load_pages().is_err());
    }
}

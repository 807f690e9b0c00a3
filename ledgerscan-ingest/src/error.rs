use thiserror::Error;

/// Pipeline-level failure, reported per document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("document {source_id} unavailable: {reason}")]
    DocumentUnavailable { source_id: String, reason: String },
}

impl ExtractError {
    pub fn unavailable(source_id: &str, reason: impl ToString) -> Self {
        ExtractError::DocumentUnavailable {
            source_id: source_id.to_string(),
            reason: reason.to_string(),
        }
    }
}

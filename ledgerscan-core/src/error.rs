use thiserror::Error;

/// Why a token could not be normalized.
///
/// Recognizers catch these and turn the line into a non-match; they never
/// escape the extraction core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),

    #[error("unknown month abbreviation: {0:?}")]
    UnknownMonth(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl NormalizeError {
    /// Stable snake_case tag, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::MalformedAmount(_) => "malformed_amount",
            NormalizeError::UnknownMonth(_) => "unknown_month",
            NormalizeError::InvalidDate(_) => "invalid_date",
        }
    }
}

//! Bank-specific recognizers.

pub mod cimb;
pub mod maybank;
pub mod public_bank;
pub mod rhb;

use crate::recognizer::Recognizer;

pub use cimb::CimbRecognizer;
pub use maybank::MaybankRecognizer;
pub use public_bank::PublicBankRecognizer;
pub use rhb::RhbRecognizer;

/// Amount token as it comes out of OCR: digits and separators, plus the
/// letters commonly confused with digits so the normalizer can reject them.
pub(crate) const AMOUNT: &str = r"[0-9OIl,]+\.\d{2}";

/// Built-in formats in auto-detect priority order.
pub fn builtin() -> Vec<Box<dyn Recognizer>> {
    vec![
        Box::new(MaybankRecognizer),
        Box::new(PublicBankRecognizer),
        Box::new(RhbRecognizer),
        Box::new(CimbRecognizer),
    ]
}

//! Receipt text extraction module.

pub mod fields;
pub mod header;
pub mod lines;
pub mod normalize;
mod parser;
pub mod rules;
pub mod segmenter;
pub mod totals;
pub mod validator;

pub use normalize::{DescriptionNormalizer, ReplacementTable};
pub use parser::TextReceiptParser;
pub use segmenter::{BracketMarkers, MarkerPredicate};
pub use validator::Validator;

use crate::error::ExtractionError;
use crate::models::receipt::{ReceiptRecord, ValidationIssue};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted receipt data.
    pub record: ReceiptRecord,
    /// Advisory validation issues, in check order.
    pub issues: Vec<ValidationIssue>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Outcome of parsing one document.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// A sale or return receipt.
    Receipt(ExtractionResult),
    /// A shift open/close report; the document should be skipped.
    NotApplicable,
}

impl ParseOutcome {
    pub fn receipt(&self) -> Option<&ExtractionResult> {
        match self {
            ParseOutcome::Receipt(result) => Some(result),
            ParseOutcome::NotApplicable => None,
        }
    }

    pub fn into_receipt(self) -> Option<ExtractionResult> {
        match self {
            ParseOutcome::Receipt(result) => Some(result),
            ParseOutcome::NotApplicable => None,
        }
    }
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse one document's text.
    ///
    /// Fails only when the text holds no lines at all.
    fn parse(&self, text: &str) -> Result<ParseOutcome>;
}

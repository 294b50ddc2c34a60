//! Error types for the fiskal-core library.

use thiserror::Error;

/// Main error type for the fiskal library.
#[derive(Error, Debug)]
pub enum FiskalError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text loading.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to receipt extraction.
///
/// Malformed content never ends up here: missing fields and inconsistent
/// sums are reported as [`crate::ValidationIssue`] values instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input contains no non-empty lines.
    #[error("input contains no text lines")]
    EmptyInput,
}

/// Result type for the fiskal library.
pub type Result<T> = std::result::Result<T, FiskalError>;

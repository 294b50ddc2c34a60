//! Core library for fiscal receipt extraction.
//!
//! This crate provides:
//! - Line segmentation of receipt text rendered from a paginated document
//! - Header, item block, and footer extraction into a structured record
//! - Advisory validation of the extracted record (sums, payments, gaps)
//! - Optional PDF text loading (`pdf` feature)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod receipt;

pub use error::{ExtractionError, FiskalError, Result};
pub use models::config::FiskalConfig;
pub use models::receipt::{LineItem, ReceiptRecord, ReceiptType, ValidationIssue};
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use receipt::{ExtractionResult, ParseOutcome, ReceiptParser, TextReceiptParser};

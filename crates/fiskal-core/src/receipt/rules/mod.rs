//! Rule-based field extractors for fiscal receipts.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{parse_amount, AmountExtractor};
pub use dates::receipt_datetime;
pub use patterns::*;

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extracts the trimmed text captured by the first group of a pattern.
pub struct TextExtractor<'a> {
    pattern: &'a Regex,
}

impl<'a> TextExtractor<'a> {
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }
}

impl FieldExtractor for TextExtractor<'_> {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

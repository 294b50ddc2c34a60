//! Text receipt parser wiring the extraction stages together.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;

use super::fields::ItemFieldExtractor;
use super::header::{Header, HeaderExtractor};
use super::lines::LineSequence;
use super::normalize::{DescriptionNormalizer, ReplacementTable};
use super::segmenter::{BracketMarkers, MarkerPredicate, Segmenter};
use super::totals::extract_totals;
use super::validator::Validator;
use super::{ExtractionResult, ParseOutcome, ReceiptParser, Result};

/// Parser for receipt text rendered from a fiscal document.
///
/// Holds no per-document state, so one instance can be shared across
/// threads processing independent documents.
pub struct TextReceiptParser {
    /// Leading lines inspected as the header block.
    header_window: usize,
    /// Separator between address lines.
    address_separator: String,
    /// Marker vocabulary for the segmenter.
    markers: Box<dyn MarkerPredicate + Send + Sync>,
    /// Description rewriting applied to each item.
    normalizer: Box<dyn DescriptionNormalizer + Send + Sync>,
    validator: Validator,
}

impl TextReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            header_window: config.header_window,
            address_separator: config.address_separator.clone(),
            markers: Box::new(BracketMarkers::new(config.markers.iter().cloned())),
            normalizer: Box::new(ReplacementTable::new(config.description_replacements.clone())),
            validator: Validator::new(config.sum_tolerance),
        }
    }

    /// Set the number of header lines.
    pub fn with_header_window(mut self, window: usize) -> Self {
        self.header_window = window;
        self
    }

    /// Set the marker predicate.
    pub fn with_markers(mut self, markers: impl MarkerPredicate + Send + Sync + 'static) -> Self {
        self.markers = Box::new(markers);
        self
    }

    /// Set the description normalizer.
    pub fn with_normalizer(mut self, normalizer: impl DescriptionNormalizer + Send + Sync + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Set the tolerance used when comparing sums.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.validator = Validator::new(tolerance);
        self
    }
}

impl Default for TextReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for TextReceiptParser {
    fn parse(&self, text: &str) -> Result<ParseOutcome> {
        let start = Instant::now();

        let lines = LineSequence::from_text(text);
        if lines.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        info!("Parsing receipt from {} lines of text", lines.len());

        let header = HeaderExtractor::new(self.header_window, &self.address_separator)
            .extract(&lines, text);
        let fields = match header {
            Header::ShiftReport => {
                info!("Document is a shift report, skipping");
                return Ok(ParseOutcome::NotApplicable);
            }
            Header::Receipt(fields) => fields,
        };

        let region = fields.body_region();
        let mut record = fields.record;

        match region {
            Some((body_start, body_end)) => {
                let blocks = Segmenter::new(self.markers.as_ref()).segment(lines.lines(), body_start, body_end);
                debug!(
                    "Segmented {} item blocks from lines {}..{}",
                    blocks.len(),
                    body_start,
                    body_end
                );

                let extractor = ItemFieldExtractor::new(self.normalizer.as_ref());
                record.items = blocks.iter().filter_map(|b| extractor.extract(b)).collect();
            }
            None => {
                warn!(
                    "No item region: operation line {:?}, totals line {:?}",
                    fields.operation_line, fields.totals_line
                );
            }
        }

        extract_totals(text, &mut record);

        let issues = self.validator.validate(&record);
        debug!(
            "Extracted receipt {:?} with {} items and {} issues",
            record.receipt_number,
            record.items.len(),
            issues.len()
        );

        Ok(ParseOutcome::Receipt(ExtractionResult {
            record,
            issues,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }))
    }
}

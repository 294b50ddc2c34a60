//! Header extraction and body-region location.

use tracing::debug;

use crate::models::receipt::{ReceiptRecord, ReceiptType};

use super::lines::LineSequence;
use super::rules::{
    receipt_datetime, FieldExtractor, TextExtractor, CASHIER, INN, INN_LABEL, RECEIPT_LINE,
    SHIFT, SHIFT_REPORT, TOTALS_LABEL,
};

/// Outcome of header extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// The document is a shift open/close report, not a receipt.
    ShiftReport,
    /// Header fields of a sale or return receipt.
    Receipt(HeaderFields),
}

/// Header fields plus the positions of the section markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFields {
    pub record: ReceiptRecord,
    /// Index of the operation-kind line.
    pub operation_line: Option<usize>,
    /// Index of the totals-label line.
    pub totals_line: Option<usize>,
}

impl HeaderFields {
    /// Exclusive line range holding the item blocks.
    ///
    /// `None` when either marker is missing or they are out of order.
    pub fn body_region(&self) -> Option<(usize, usize)> {
        match (self.operation_line, self.totals_line) {
            (Some(op), Some(totals)) if op < totals => Some((op + 1, totals)),
            _ => None,
        }
    }
}

/// Header extractor over a fixed window of leading lines.
pub struct HeaderExtractor<'a> {
    window: usize,
    address_separator: &'a str,
}

impl<'a> HeaderExtractor<'a> {
    pub fn new(window: usize, address_separator: &'a str) -> Self {
        Self {
            window,
            address_separator,
        }
    }

    /// Extract header fields. `text` is the full original document text.
    pub fn extract(&self, lines: &LineSequence, text: &str) -> Header {
        let header = lines.head(self.window);

        if SHIFT_REPORT.is_match(&header) {
            debug!("Shift report detected in header");
            return Header::ShiftReport;
        }

        let mut record = ReceiptRecord {
            seller_name: lines.get(0).map(str::to_string),
            ..Default::default()
        };

        if let Some(caps) = RECEIPT_LINE.captures(&header) {
            record.receipt_number = Some(caps[1].to_string());
            record.datetime = receipt_datetime(&caps[2], &caps[3], &caps[4], &caps[5], &caps[6]);
        }

        record.shift = TextExtractor::new(&SHIFT).extract(&header);
        record.cashier = TextExtractor::new(&CASHIER).extract(&header);
        record.inn = TextExtractor::new(&INN).extract(text);

        let operation = lines
            .lines()
            .iter()
            .enumerate()
            .find_map(|(i, l)| ReceiptType::from_line(l).map(|kind| (i, kind)));
        record.receipt_type = operation.map(|(_, kind)| kind);
        let operation_line = operation.map(|(i, _)| i);

        let inn_line = lines.position(|l| l.starts_with(INN_LABEL));
        record.address = self.address(lines, inn_line, operation_line);

        let totals_line = lines.position(|l| l.starts_with(TOTALS_LABEL));

        debug!(
            "Header markers: operation={:?}, totals={:?}, inn={:?}",
            operation_line, totals_line, inn_line
        );

        Header::Receipt(HeaderFields {
            record,
            operation_line,
            totals_line,
        })
    }

    /// Lines strictly between the tax-id and operation lines.
    ///
    /// Empty when the two lines are adjacent; unset when either is missing
    /// or they are out of order.
    fn address(&self, lines: &LineSequence, inn_line: Option<usize>, operation_line: Option<usize>) -> Option<String> {
        let (inn, op) = (inn_line?, operation_line?);
        if inn >= op {
            return None;
        }
        Some(lines.lines()[inn + 1..op].join(self.address_separator))
    }
}

//! Receipt data models.
//!
//! Field names follow the record layout consumed by downstream accounting
//! remappers, so a serialized [`ReceiptRecord`] can be read back without
//! re-parsing any text.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fiscal receipt extracted from text.
///
/// Every scalar field is optional: a pattern that did not match leaves its
/// field unset, which is a normal state rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Seller name (first line of the document).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,

    /// Receipt number within the shift.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,

    /// Date and time of the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<NaiveDateTime>,

    /// Shift number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,

    /// Cashier name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashier: Option<String>,

    /// Seller taxpayer identification number (ИНН).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,

    /// Point-of-sale address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Operation kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_type: Option<ReceiptType>,

    /// Taxation system label (СНО).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_system: Option<String>,

    /// Purchased items in document order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Grand total.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<Decimal>,

    /// Amount paid in cash.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_cash: Option<Decimal>,

    /// Amount paid by card.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_card: Option<Decimal>,

    /// Receipt-level VAT rate in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_vat_percent: Option<u32>,

    /// Receipt-level VAT amount.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_vat_sum: Option<Decimal>,

    /// Cash register registration number (№ ККТ).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kkt_number: Option<String>,

    /// Fiscal drive number (№ ФН).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fn_number: Option<String>,

    /// Fiscal document number (№ ФД).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fd_number: Option<String>,

    /// Fiscal attribute (ФП).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fp: Option<String>,

    /// Sender e-mail printed in the footer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,

    /// Tax service website printed in the footer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fns_site: Option<String>,

    /// Receipt check URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
}

impl ReceiptRecord {
    /// Sum of all item totals, `None` if it overflows.
    pub fn items_sum(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.sum))
    }

    /// Whether a cash or card payment line was printed.
    pub fn has_payments(&self) -> bool {
        self.paid_cash.is_some() || self.paid_card.is_some()
    }

    /// Sum of cash and card payments.
    ///
    /// `None` when neither was printed or the sum overflows.
    pub fn payments_sum(&self) -> Option<Decimal> {
        if !self.has_payments() {
            return None;
        }
        self.paid_cash
            .unwrap_or_default()
            .checked_add(self.paid_card.unwrap_or_default())
    }
}

/// Kind of fiscal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptType {
    /// Incoming sale (ПРИХОД).
    Sale,
    /// Reversal of an incoming sale (ВОЗВРАТ ПРИХОДА).
    Return,
}

impl ReceiptType {
    /// Match an operation-kind line exactly.
    pub fn from_line(line: &str) -> Option<Self> {
        match line {
            "ПРИХОД" => Some(ReceiptType::Sale),
            "ВОЗВРАТ ПРИХОДА" => Some(ReceiptType::Return),
            _ => None,
        }
    }
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description; empty only when the layout gave no description lines.
    pub description: String,

    /// Unit of measure, when printed inline after `;`.
    pub unit: Option<String>,

    /// Quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    /// Price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Line total.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,

    /// VAT rate in percent.
    pub vat_percent: Option<u32>,

    /// Payment method label (Признак способа расчета).
    pub payment_method: Option<String>,

    /// Payment subject label (Признак предмета расчета).
    pub item_type: Option<String>,
}

/// An advisory problem found in an extracted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// No items were extracted.
    NoItems,
    /// A mandatory field is unset.
    MissingField { field: String },
    /// Item totals do not add up to the receipt total.
    SumMismatch {
        items_sum: Decimal,
        total: Decimal,
        delta: Decimal,
    },
    /// Payments do not add up to the receipt total.
    PaymentsMismatch {
        payments_sum: Decimal,
        total: Decimal,
        delta: Decimal,
    },
    /// Amounts in a sum check are too large to add up.
    AmountOverflow { check: String },
    /// An item has an empty description.
    EmptyDescription { index: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoItems => write!(f, "no items parsed"),
            ValidationIssue::MissingField { field } => write!(f, "missing field '{}'", field),
            ValidationIssue::SumMismatch {
                items_sum,
                total,
                delta,
            } => write!(
                f,
                "items sum {:.2} differs from total {:.2} by {:.2}",
                items_sum, total, delta
            ),
            ValidationIssue::PaymentsMismatch {
                payments_sum,
                total,
                delta,
            } => write!(
                f,
                "payments sum {:.2} differs from total {:.2} by {:.2}",
                payments_sum, total, delta
            ),
            ValidationIssue::AmountOverflow { check } => {
                write!(f, "amounts in {} check exceed the decimal range", check)
            }
            ValidationIssue::EmptyDescription { index } => {
                write!(f, "item #{} has an empty description", index + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_receipt_type_from_line() {
        assert_eq!(ReceiptType::from_line("ПРИХОД"), Some(ReceiptType::Sale));
        assert_eq!(
            ReceiptType::from_line("ВОЗВРАТ ПРИХОДА"),
            Some(ReceiptType::Return)
        );
        assert_eq!(ReceiptType::from_line("ПРИХОД 1"), None);
    }

    #[test]
    fn test_payments_sum() {
        let mut record = ReceiptRecord::default();
        assert_eq!(record.payments_sum(), None);

        record.paid_card = Some(dec("70.50"));
        assert_eq!(record.payments_sum(), Some(dec("70.50")));

        record.paid_cash = Some(dec("10"));
        assert_eq!(record.payments_sum(), Some(dec("80.50")));

        record.paid_cash = Some(Decimal::MAX);
        assert!(record.has_payments());
        assert_eq!(record.payments_sum(), None);
    }

    #[test]
    fn test_items_sum_overflow_is_none() {
        let item = |sum: Decimal| LineItem {
            description: "X".to_string(),
            unit: None,
            quantity: Decimal::ONE,
            unit_price: sum,
            sum,
            vat_percent: None,
            payment_method: None,
            item_type: None,
        };
        let mut record = ReceiptRecord {
            items: vec![item(dec("1.50")), item(dec("2.25"))],
            ..Default::default()
        };
        assert_eq!(record.items_sum(), Some(dec("3.75")));

        record.items = vec![item(Decimal::MAX), item(Decimal::MAX)];
        assert_eq!(record.items_sum(), None);
    }

    #[test]
    fn test_serialized_field_names() {
        let record = ReceiptRecord {
            receipt_number: Some("42".to_string()),
            receipt_type: Some(ReceiptType::Return),
            items: vec![LineItem {
                description: "Milk".to_string(),
                unit: None,
                quantity: dec("1"),
                unit_price: dec("60.00"),
                sum: dec("60.00"),
                vat_percent: Some(10),
                payment_method: None,
                item_type: Some("ТОВАР".to_string()),
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["receipt_number"], "42");
        assert_eq!(json["receipt_type"], "return");
        assert_eq!(json["items"][0]["item_type"], "ТОВАР");
        assert_eq!(json["items"][0]["vat_percent"], 10);
        assert_eq!(json["items"][0]["sum"], 60.0);
        assert!(json["items"][0]["unit_price"].is_number());
        assert!(json.get("total").is_none());

        let back: ReceiptRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::SumMismatch {
            items_sum: dec("121"),
            total: dec("120"),
            delta: dec("1"),
        };
        assert_eq!(
            issue.to_string(),
            "items sum 121.00 differs from total 120.00 by 1.00"
        );
        assert_eq!(
            ValidationIssue::EmptyDescription { index: 0 }.to_string(),
            "item #1 has an empty description"
        );
    }
}

//! Advisory consistency checks over an extracted receipt.

use rust_decimal::Decimal;

use crate::models::receipt::{ReceiptRecord, ValidationIssue};

/// Cross-checks a record without mutating it.
#[derive(Debug, Clone)]
pub struct Validator {
    tolerance: Decimal,
}

impl Validator {
    pub fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Run every check and collect the issues in a fixed order.
    pub fn validate(&self, record: &ReceiptRecord) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if record.items.is_empty() {
            issues.push(ValidationIssue::NoItems);
        }

        for (field, missing) in [
            ("receipt_number", record.receipt_number.is_none()),
            ("datetime", record.datetime.is_none()),
            ("total", record.total.is_none()),
        ] {
            if missing {
                issues.push(ValidationIssue::MissingField {
                    field: field.to_string(),
                });
            }
        }

        if let Some(total) = record.total {
            if !record.items.is_empty() {
                match record.items_sum().and_then(|s| Some((s, s.checked_sub(total)?))) {
                    Some((items_sum, delta)) if delta.abs() > self.tolerance => {
                        issues.push(ValidationIssue::SumMismatch {
                            items_sum,
                            total,
                            delta,
                        });
                    }
                    Some(_) => {}
                    None => issues.push(overflow("items_sum")),
                }
            }

            // Receipts without a payment section are not compared.
            if record.has_payments() {
                match record.payments_sum().and_then(|s| Some((s, s.checked_sub(total)?))) {
                    Some((payments_sum, delta)) if delta.abs() > self.tolerance => {
                        issues.push(ValidationIssue::PaymentsMismatch {
                            payments_sum,
                            total,
                            delta,
                        });
                    }
                    Some(_) => {}
                    None => issues.push(overflow("payments_sum")),
                }
            }
        }

        issues.extend(
            record
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.description.is_empty())
                .map(|(index, _)| ValidationIssue::EmptyDescription { index }),
        );

        issues
    }
}

fn overflow(check: &str) -> ValidationIssue {
    ValidationIssue::AmountOverflow {
        check: check.to_string(),
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Decimal::new(1, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::LineItem;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(description: &str, sum: &str) -> LineItem {
        LineItem {
            description: description.to_string(),
            unit: None,
            quantity: Decimal::ONE,
            unit_price: dec(sum),
            sum: dec(sum),
            vat_percent: None,
            payment_method: None,
            item_type: None,
        }
    }

    fn record(items: Vec<LineItem>, total: &str) -> ReceiptRecord {
        ReceiptRecord {
            receipt_number: Some("1".to_string()),
            datetime: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(10, 15, 0)),
            total: Some(dec(total)),
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_consistent_record_has_no_issues() {
        let record = record(vec![item("Milk", "120.00"), item("Bread", "35.50")], "155.50");
        assert!(Validator::default().validate(&record).is_empty());
    }

    #[test]
    fn test_sum_mismatch_reports_delta() {
        let record = record(vec![item("Milk", "121.00"), item("Bread", "35.50")], "155.50");
        assert_eq!(
            Validator::default().validate(&record),
            vec![ValidationIssue::SumMismatch {
                items_sum: dec("156.50"),
                total: dec("155.50"),
                delta: dec("1.00"),
            }]
        );
    }

    #[test]
    fn test_delta_within_tolerance_is_accepted() {
        let validator = Validator::default();
        let half_cent = record(vec![item("Milk", "120.005")], "120.00");
        assert!(validator.validate(&half_cent).is_empty());

        let at_boundary = record(vec![item("Milk", "120.01")], "120.00");
        assert!(validator.validate(&at_boundary).is_empty());

        let beyond = record(vec![item("Milk", "120.02")], "120.00");
        assert_eq!(validator.validate(&beyond).len(), 1);
    }

    #[test]
    fn test_empty_record() {
        let issues = Validator::default().validate(&ReceiptRecord::default());
        assert_eq!(
            issues,
            vec![
                ValidationIssue::NoItems,
                ValidationIssue::MissingField { field: "receipt_number".to_string() },
                ValidationIssue::MissingField { field: "datetime".to_string() },
                ValidationIssue::MissingField { field: "total".to_string() },
            ]
        );
    }

    #[test]
    fn test_payments_mismatch() {
        let mut record = record(vec![item("Milk", "100")], "100");
        record.paid_cash = Some(dec("50"));
        record.paid_card = Some(dec("40"));

        assert_eq!(
            Validator::default().validate(&record),
            vec![ValidationIssue::PaymentsMismatch {
                payments_sum: dec("90"),
                total: dec("100"),
                delta: dec("-10"),
            }]
        );

        record.paid_card = Some(dec("50"));
        assert!(Validator::default().validate(&record).is_empty());
    }

    #[test]
    fn test_overflowing_sums_are_reported() {
        let mut huge = item("Gold", "1");
        huge.sum = Decimal::MAX;
        let mut record = record(vec![huge.clone(), huge], "1");
        record.paid_cash = Some(Decimal::MAX);
        record.paid_card = Some(Decimal::MAX);

        assert_eq!(
            Validator::default().validate(&record),
            vec![
                ValidationIssue::AmountOverflow { check: "items_sum".to_string() },
                ValidationIssue::AmountOverflow { check: "payments_sum".to_string() },
            ]
        );
    }

    #[test]
    fn test_one_issue_per_empty_description() {
        let record = record(vec![item("Milk", "1"), item("", "1"), item("", "1")], "3");
        assert_eq!(
            Validator::default().validate(&record),
            vec![
                ValidationIssue::EmptyDescription { index: 1 },
                ValidationIssue::EmptyDescription { index: 2 },
            ]
        );
    }

    #[test]
    fn test_checks_do_not_short_circuit() {
        let mut record = record(vec![item("", "5")], "10");
        record.receipt_number = None;
        record.paid_cash = Some(dec("1"));

        let kinds: Vec<String> = Validator::default()
            .validate(&record)
            .iter()
            .map(|i| serde_json::to_value(i).unwrap()["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            kinds,
            ["missing_field", "sum_mismatch", "payments_mismatch", "empty_description"]
        );
    }
}

//! Per-block field extraction.

use tracing::warn;

use crate::models::receipt::LineItem;

use super::normalize::DescriptionNormalizer;
use super::rules::{
    parse_amount, FieldExtractor, TextExtractor, ITEM_PAYMENT_METHOD, ITEM_SUBJECT, ITEM_VAT,
    QTY_LINE,
};
use super::segmenter::RawBlock;

/// Turns raw item blocks into line items.
pub struct ItemFieldExtractor<'n, N: DescriptionNormalizer + ?Sized> {
    normalizer: &'n N,
}

impl<'n, N: DescriptionNormalizer + ?Sized> ItemFieldExtractor<'n, N> {
    pub fn new(normalizer: &'n N) -> Self {
        Self { normalizer }
    }

    /// Build a line item from a block.
    ///
    /// Returns `None` only if the quantity line does not hold three numbers.
    /// Metadata lines that are missing or do not carry their expected label
    /// leave the corresponding field unset.
    pub fn extract(&self, block: &RawBlock<'_>) -> Option<LineItem> {
        let Some(caps) = QTY_LINE.captures(block.qty_line) else {
            warn!("Item quantity line does not match: {:?}", block.qty_line);
            return None;
        };

        let (Some(quantity), Some(unit_price), Some(sum)) = (
            parse_amount(&caps[1]),
            parse_amount(&caps[2]),
            parse_amount(&caps[3]),
        ) else {
            warn!("Item quantity line has unparsable numbers: {:?}", block.qty_line);
            return None;
        };

        let vat_percent = block
            .metadata
            .first()
            .and_then(|l| ITEM_VAT.captures(l))
            .and_then(|c| c[1].parse().ok());
        let payment_method = block
            .metadata
            .get(1)
            .and_then(|l| TextExtractor::new(&ITEM_PAYMENT_METHOD).extract(l));
        let item_type = block
            .metadata
            .get(2)
            .and_then(|l| TextExtractor::new(&ITEM_SUBJECT).extract(l));

        Some(LineItem {
            description: self.normalizer.normalize(&block.description),
            unit: block.unit.clone(),
            quantity,
            unit_price,
            sum,
            vat_percent,
            payment_method,
            item_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::normalize::ReplacementTable;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn block<'a>(qty_line: &'a str, metadata: Vec<&'a str>) -> RawBlock<'a> {
        RawBlock {
            description: "Milk 1L".to_string(),
            unit: Some("liter".to_string()),
            marked: false,
            qty_line,
            metadata,
        }
    }

    #[test]
    fn test_full_block() {
        let table = ReplacementTable::default();
        let item = ItemFieldExtractor::new(&table)
            .extract(&block(
                "3,00 x 15,50 46,50",
                vec![
                    "НДС 10%",
                    "Признак способа расчета ПОЛНЫЙ РАСЧЕТ",
                    "Признак предмета расчета ТОВАР",
                ],
            ))
            .unwrap();

        assert_eq!(
            item,
            LineItem {
                description: "Milk 1L".to_string(),
                unit: Some("liter".to_string()),
                quantity: dec("3.00"),
                unit_price: dec("15.50"),
                sum: dec("46.50"),
                vat_percent: Some(10),
                payment_method: Some("ПОЛНЫЙ РАСЧЕТ".to_string()),
                item_type: Some("ТОВАР".to_string()),
            }
        );
    }

    #[test]
    fn test_dot_and_comma_parse_identically() {
        let table = ReplacementTable::default();
        let extractor = ItemFieldExtractor::new(&table);
        let comma = extractor.extract(&block("2,500 x 10,00 25,00", vec![])).unwrap();
        let dot = extractor.extract(&block("2.500 x 10.00 25.00", vec![])).unwrap();

        assert_eq!(comma.quantity, dec("2.5"));
        assert_eq!(comma.quantity, dot.quantity);
        assert_eq!(comma.unit_price, dot.unit_price);
        assert_eq!(comma.sum, dot.sum);
    }

    #[test]
    fn test_missing_or_mislabeled_metadata() {
        let table = ReplacementTable::default();
        let item = ItemFieldExtractor::new(&table)
            .extract(&block(
                "1 x 5 5",
                vec!["НДС не облагается", "Признак предмета расчета ТОВАР"],
            ))
            .unwrap();

        assert_eq!(item.vat_percent, None);
        assert_eq!(item.payment_method, None);
        assert_eq!(item.item_type, None);
    }

    #[test]
    fn test_normalizer_applies_to_description() {
        let table = ReplacementTable::default().with_rule("1L", "1 л");
        let item = ItemFieldExtractor::new(&table)
            .extract(&block("1 x 5 5", vec![]))
            .unwrap();
        assert_eq!(item.description, "Milk 1 л");
    }

    #[test]
    fn test_non_quantity_line_is_rejected() {
        let table = ReplacementTable::default();
        assert!(ItemFieldExtractor::new(&table)
            .extract(&block("ИТОГО: 5", vec![]))
            .is_none());
    }
}

//! Totals and footer extraction over the full document text.

use crate::models::receipt::ReceiptRecord;

use super::rules::{
    parse_amount, AmountExtractor, FieldExtractor, TextExtractor, FD_NUMBER, FNS_SITE,
    FN_NUMBER, FP, KKT_NUMBER, PAID_CARD, PAID_CASH, QR_URL, RECEIPT_VAT, SENDER_EMAIL,
    TAX_SYSTEM, TOTAL,
};

/// Fill the totals and footer fields of `record` from `text`.
///
/// Every pattern is evaluated independently and the first match in
/// document order wins.
pub fn extract_totals(text: &str, record: &mut ReceiptRecord) {
    record.total = AmountExtractor::new(&TOTAL).extract(text);
    record.paid_cash = AmountExtractor::new(&PAID_CASH).extract(text);
    record.paid_card = AmountExtractor::new(&PAID_CARD).extract(text);

    if let Some(caps) = RECEIPT_VAT.captures(text) {
        record.total_vat_percent = caps[1].parse().ok();
        record.total_vat_sum = parse_amount(&caps[2]);
    }

    record.tax_system = TextExtractor::new(&TAX_SYSTEM).extract(text);
    record.kkt_number = TextExtractor::new(&KKT_NUMBER).extract(text);
    record.fn_number = TextExtractor::new(&FN_NUMBER).extract(text);
    record.fd_number = TextExtractor::new(&FD_NUMBER).extract(text);
    record.fp = TextExtractor::new(&FP).extract(text);
    record.sender_email = TextExtractor::new(&SENDER_EMAIL).extract(text);
    record.fns_site = TextExtractor::new(&FNS_SITE).extract(text);
    record.qr_url = TextExtractor::new(&QR_URL).extract(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const FOOTER: &str = "ИТОГО: 1250,50
НАЛИЧНЫМИ: 250,50
БЕЗНАЛИЧНЫМИ: 1000,00
НДС 20%: 208,42
СНО: УСН доход - расход
ЭЛ.АДР.ОТПРАВИТЕЛЯ: noreply@shop.example
САЙТ ФНС: www.nalog.gov.ru
№ ККТ: 0001234567012345
№ ФН: 9999078900001234
№ ФД: 4321
ФП 1234567890
https://receipt.example/check?fn=9999078900001234&i=4321";

    #[test]
    fn test_footer_fields() {
        let mut record = ReceiptRecord::default();
        extract_totals(FOOTER, &mut record);

        assert_eq!(record.total, Some(dec("1250.50")));
        assert_eq!(record.paid_cash, Some(dec("250.50")));
        assert_eq!(record.paid_card, Some(dec("1000.00")));
        assert_eq!(record.total_vat_percent, Some(20));
        assert_eq!(record.total_vat_sum, Some(dec("208.42")));
        assert_eq!(record.tax_system.as_deref(), Some("УСН доход - расход"));
        assert_eq!(record.sender_email.as_deref(), Some("noreply@shop.example"));
        assert_eq!(record.fns_site.as_deref(), Some("www.nalog.gov.ru"));
        assert_eq!(record.kkt_number.as_deref(), Some("0001234567012345"));
        assert_eq!(record.fn_number.as_deref(), Some("9999078900001234"));
        assert_eq!(record.fd_number.as_deref(), Some("4321"));
        assert_eq!(record.fp.as_deref(), Some("1234567890"));
        assert_eq!(
            record.qr_url.as_deref(),
            Some("https://receipt.example/check?fn=9999078900001234&i=4321")
        );
    }

    #[test]
    fn test_absent_fields_stay_unset() {
        let mut record = ReceiptRecord::default();
        extract_totals("ИТОГО: 10\nСпасибо за покупку", &mut record);

        assert_eq!(record.total, Some(dec("10")));
        assert_eq!(record.paid_cash, None);
        assert_eq!(record.paid_card, None);
        assert_eq!(record.total_vat_percent, None);
        assert_eq!(record.fp, None);
        assert_eq!(record.qr_url, None);
    }

    #[test]
    fn test_item_vat_line_is_not_receipt_vat() {
        let mut record = ReceiptRecord::default();
        extract_totals("НДС 10%\nИТОГО: 10\nНДС 10%: 0,91", &mut record);
        assert_eq!(record.total_vat_sum, Some(dec("0.91")));
    }
}

//! Common regex patterns for fiscal receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Header
    pub static ref RECEIPT_LINE: Regex = Regex::new(
        r"ЧЕК №:\s*(\d+)\s+(\d{2})\.(\d{2})\.(\d{2})\s+(\d{2}):(\d{2})"
    ).unwrap();

    pub static ref SHIFT: Regex = Regex::new(r"СМЕНА:\s*(\d+)").unwrap();

    pub static ref CASHIER: Regex = Regex::new(r"КАССИР\s+(.+)").unwrap();

    pub static ref INN: Regex = Regex::new(r"ИНН\s+(\d+)").unwrap();

    pub static ref SHIFT_REPORT: Regex = Regex::new(
        r"Отч[её]т (?:о закрытии|об открытии) смены"
    ).unwrap();

    // Item blocks: "<qty> x <price> <total>"
    pub static ref QTY_LINE: Regex = Regex::new(
        r"^(\d+(?:[.,]\d+)?)\s*[xX*]\s*(\d+(?:[.,]\d+)?)\s+(\d+(?:[.,]\d+)?)$"
    ).unwrap();

    pub static ref ITEM_VAT: Regex = Regex::new(r"НДС\s+(\d+)%").unwrap();

    pub static ref ITEM_PAYMENT_METHOD: Regex = Regex::new(
        r"Признак способа расчета\s+(.+)"
    ).unwrap();

    pub static ref ITEM_SUBJECT: Regex = Regex::new(
        r"Признак предмета расчета\s+(.+)"
    ).unwrap();

    // Totals
    pub static ref TOTAL: Regex = Regex::new(r"ИТОГО:\s*([\d.,]+)").unwrap();

    pub static ref PAID_CASH: Regex = Regex::new(r"\bНАЛИЧНЫМИ:\s*([\d.,]+)").unwrap();

    pub static ref PAID_CARD: Regex = Regex::new(r"БЕЗНАЛИЧНЫМИ:\s*([\d.,]+)").unwrap();

    pub static ref RECEIPT_VAT: Regex = Regex::new(r"НДС\s+(\d+)%:\s*([\d.,]+)").unwrap();

    // Footer
    pub static ref TAX_SYSTEM: Regex = Regex::new(r"СНО:\s*(.+)").unwrap();

    pub static ref KKT_NUMBER: Regex = Regex::new(r"№ ККТ:\s*(\d+)").unwrap();

    pub static ref FN_NUMBER: Regex = Regex::new(r"№ ФН:\s*(\d+)").unwrap();

    pub static ref FD_NUMBER: Regex = Regex::new(r"№ ФД:\s*(\d+)").unwrap();

    pub static ref FP: Regex = Regex::new(r"ФП\s*(\d+)").unwrap();

    pub static ref SENDER_EMAIL: Regex = Regex::new(r"ЭЛ\.АДР\.ОТПРАВИТЕЛЯ:\s*(\S+)").unwrap();

    pub static ref FNS_SITE: Regex = Regex::new(r"САЙТ ФНС:\s*(\S+)").unwrap();

    pub static ref QR_URL: Regex = Regex::new(r"(https?://\S+)").unwrap();
}

/// Label that opens the totals section and closes the item region.
pub const TOTALS_LABEL: &str = "ИТОГО:";

/// Label of the tax identifier line.
pub const INN_LABEL: &str = "ИНН";

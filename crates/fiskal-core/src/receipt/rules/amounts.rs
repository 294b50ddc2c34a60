//! Money and quantity parsing for receipt text.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::FieldExtractor;

/// Extracts a labeled amount captured by the first group of a pattern.
pub struct AmountExtractor<'a> {
    pattern: &'a Regex,
}

impl<'a> AmountExtractor<'a> {
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }
}

impl FieldExtractor for AmountExtractor<'_> {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| parse_amount(&caps[1]))
            .collect()
    }
}

/// Parse a locale-formatted number (e.g., "46,50", "46.50" or "1 234,56").
///
/// Both `,` and `.` are accepted as the decimal separator. When both occur,
/// the one that comes last is the decimal separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == ',' || c == '.');

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(_), None) => cleaned.replace(',', "."),
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        _ => cleaned.to_string(),
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::rules::patterns::TOTAL;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_separators() {
        assert_eq!(parse_amount("2,500"), Some(dec("2.5")));
        assert_eq!(parse_amount("2.500"), Some(dec("2.5")));
        assert_eq!(parse_amount("46,50"), Some(dec("46.50")));
        assert_eq!(parse_amount("120"), Some(dec("120")));
        assert_eq!(parse_amount("1 234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
    }

    #[test]
    fn test_parse_amount_trailing_punctuation() {
        assert_eq!(parse_amount("120,00."), Some(dec("120")));
        assert_eq!(parse_amount(".,"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_amount_extractor_first_match_wins() {
        let extractor = AmountExtractor::new(&TOTAL);
        let text = "ИТОГО: 120,00\nИТОГО: 5,00";

        assert_eq!(extractor.extract(text), Some(dec("120")));
        assert_eq!(extractor.extract_all(text).len(), 2);
        assert_eq!(extractor.extract("нет итога"), None);
    }
}

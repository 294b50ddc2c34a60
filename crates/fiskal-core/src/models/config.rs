//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration for the fiskal pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FiskalConfig {
    /// PDF text loading configuration.
    pub pdf: PdfConfig,

    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,
}

/// PDF text loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
        }
    }
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading lines forming the header block.
    pub header_window: usize,

    /// Allowed difference between compared sums.
    pub sum_tolerance: Decimal,

    /// Bracketed tokens marking annotation lines inside the item region.
    pub markers: Vec<String>,

    /// Separator placed between address lines.
    pub address_separator: String,

    /// Literal replacements applied to every item description, in order.
    pub description_replacements: Vec<Replacement>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_window: 10,
            sum_tolerance: Decimal::new(1, 2),
            markers: vec!["[М+]".to_string(), "[М-]".to_string(), "[М]".to_string()],
            address_separator: " / ".to_string(),
            description_replacements: Vec::new(),
        }
    }
}

/// A literal substring replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Text to look for.
    pub from: String,
    /// Text to put in its place.
    pub to: String,
}

impl FiskalConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FiskalConfig =
            serde_json::from_str(r#"{"extraction": {"header_window": 12}}"#).unwrap();

        assert_eq!(config.extraction.header_window, 12);
        assert_eq!(config.extraction.sum_tolerance, Decimal::new(1, 2));
        assert_eq!(config.extraction.markers.len(), 3);
        assert_eq!(config.pdf.min_text_length, 50);
    }

    #[test]
    fn test_replacements_roundtrip() {
        let mut config = FiskalConfig::default();
        config.extraction.description_replacements.push(Replacement {
            from: "(Сербия)".to_string(),
            to: String::new(),
        });

        let json = serde_json::to_string(&config).unwrap();
        let back: FiskalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.extraction.description_replacements,
            config.extraction.description_replacements
        );
    }
}

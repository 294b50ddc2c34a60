//! Item description normalization.
//!
//! Layout- or brand-specific text fixes live here as data, outside the
//! segmenter.

use crate::models::config::Replacement;

/// Rewrites an item description after segmentation.
pub trait DescriptionNormalizer {
    fn normalize(&self, description: &str) -> String;
}

/// Ordered table of literal substring replacements.
///
/// After the replacements are applied, runs of whitespace collapse to a
/// single space and the result is trimmed.
#[derive(Debug, Clone, Default)]
pub struct ReplacementTable {
    rules: Vec<Replacement>,
}

impl ReplacementTable {
    pub fn new(rules: Vec<Replacement>) -> Self {
        Self { rules }
    }

    /// Add a replacement rule at the end of the table.
    pub fn with_rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rules.push(Replacement {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl DescriptionNormalizer for ReplacementTable {
    fn normalize(&self, description: &str) -> String {
        let replaced = self
            .rules
            .iter()
            .filter(|r| !r.from.is_empty())
            .fold(description.to_string(), |acc, r| acc.replace(&r.from, &r.to));

        replaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

use super::NaRecognizer;
use crate::core::CellValue;
use std::collections::BTreeSet;

pub const DEFAULT_NA_TOKENS: &[&str] = &[
    "n/a",
    "na",
    "n.a.",
    "-",
    "--",
    "none",
    "unknown",
    "not applicable",
];

/// Case-insensitive token matcher for canonical "not applicable" values.
///
/// Blank cells are never NA: an empty cell is an accidental gap, while "N/A"
/// is a reviewer's explicit statement.
#[derive(Debug, Clone)]
pub struct TokenNaRecognizer {
    tokens: BTreeSet<String>,
}

impl TokenNaRecognizer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

impl Default for TokenNaRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_NA_TOKENS)
    }
}

impl NaRecognizer for TokenNaRecognizer {
    fn is_canonical_na(&self, value: &CellValue) -> bool {
        match value {
            CellValue::Text(s) => self.tokens.contains(&s.trim().to_lowercase()),
            CellValue::Number(_) | CellValue::Bool(_) | CellValue::Empty => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens_case_insensitive() {
        let na = TokenNaRecognizer::default();
        assert!(na.is_canonical_na(&CellValue::text("N/A")));
        assert!(na.is_canonical_na(&CellValue::text("  Unknown ")));
        assert!(na.is_canonical_na(&CellValue::text("-")));
        assert!(!na.is_canonical_na(&CellValue::text("Active")));
    }

    #[test]
    fn test_blank_and_non_text_values_are_not_na() {
        let na = TokenNaRecognizer::default();
        assert!(!na.is_canonical_na(&CellValue::Empty));
        assert!(!na.is_canonical_na(&CellValue::text("  ")));
        assert!(!na.is_canonical_na(&CellValue::Number(0.0)));
        assert!(!na.is_canonical_na(&CellValue::Bool(false)));
    }

    #[test]
    fn test_custom_tokens_replace_defaults() {
        let na = TokenNaRecognizer::new(["tbd"]);
        assert!(na.is_canonical_na(&CellValue::text("TBD")));
        assert!(!na.is_canonical_na(&CellValue::text("n/a")));
    }
}

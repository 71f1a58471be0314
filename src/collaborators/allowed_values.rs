//! Allowed-value list cleanup.
//!
//! Glossary authors write allowed values for humans: lists carry
//! administrative tokens ("Optional", "Required", "N/A") and sometimes cram a
//! whole enumeration into one cell ("Active; Inactive; Pending" or
//! `Must be one of "Active", "Inactive"`). The filter turns that into a flat
//! list of comparable values. Work is linear in the size of the raw list, so
//! it never depends on the number of rows being validated.

use super::AllowedValueFilter;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const DEFAULT_PLACEHOLDER_TOKENS: &[&str] = &[
    "optional",
    "required",
    "n/a",
    "na",
    "tbd",
    "tba",
    "-",
    "see below",
    "see notes",
    "see glossary",
    "free text",
    "free-form",
    "any",
    "various",
];

pub const DEFAULT_MAX_SINGLE_VALUE_LEN: usize = 40;

static HARD_DELIMITERS: &[char] = &['\n', '\r', ';', '|', '•', '\t'];

static QUOTED_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)"|“([^”]+)”|'([^']+)'"#).expect("quoted value pattern is valid")
});

/// Default [`AllowedValueFilter`]: drops placeholder tokens and expands
/// delimited or quoted multi-value strings.
#[derive(Debug, Clone)]
pub struct PlaceholderFilter {
    placeholders: HashSet<String>,
    max_single_value_len: usize,
}

impl PlaceholderFilter {
    pub fn new<I, S>(placeholders: I, max_single_value_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            placeholders: placeholders
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
            max_single_value_len: max_single_value_len.max(1),
        }
    }

    fn is_placeholder(&self, value: &str) -> bool {
        self.placeholders.contains(&value.to_lowercase())
    }

    fn expand(&self, raw: &str) -> Vec<String> {
        let raw = raw.trim();
        if raw.contains(HARD_DELIMITERS) {
            return raw.split(HARD_DELIMITERS).map(str::to_string).collect();
        }
        if raw.chars().count() <= self.max_single_value_len {
            return vec![raw.to_string()];
        }

        let quoted: Vec<String> = QUOTED_VALUE
            .captures_iter(raw)
            .filter_map(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .next()
                    .map(|m| m.as_str().to_string())
            })
            .collect();
        if !quoted.is_empty() {
            return quoted;
        }

        if raw.contains(',') {
            return raw.split(',').map(str::to_string).collect();
        }

        vec![raw.to_string()]
    }
}

impl Default for PlaceholderFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_TOKENS, DEFAULT_MAX_SINGLE_VALUE_LEN)
    }
}

impl AllowedValueFilter for PlaceholderFilter {
    fn filter(&self, raw: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        raw.iter()
            .flat_map(|value| self.expand(value))
            .map(|value| clean_piece(&value))
            .filter(|value| !value.is_empty() && !self.is_placeholder(value))
            .filter(|value| seen.insert(value.to_lowercase()))
            .collect()
    }
}

// Strips list bullets and trailing punctuation left over from prose lists.
fn clean_piece(piece: &str) -> String {
    let trimmed = piece.trim();
    let without_bullet = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .unwrap_or(trimmed);
    without_bullet
        .trim_end_matches(['.', ','])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_drops_placeholders_case_insensitively() {
        let filter = PlaceholderFilter::default();
        let out = filter.filter(&strings(&["Active", "Optional", "N/A", "Inactive"]));
        assert_eq!(out, strings(&["Active", "Inactive"]));
    }

    #[test]
    fn test_splits_hard_delimiters() {
        let filter = PlaceholderFilter::default();
        let out = filter.filter(&strings(&["Active; Inactive|Pending\nClosed"]));
        assert_eq!(out, strings(&["Active", "Inactive", "Pending", "Closed"]));
    }

    #[test]
    fn test_extracts_quoted_values_from_long_prose() {
        let filter = PlaceholderFilter::default();
        let out = filter.filter(&strings(&[
            r#"Must be one of "Fixed Price", "Time and Materials" or "Cost Plus""#,
        ]));
        assert_eq!(
            out,
            strings(&["Fixed Price", "Time and Materials", "Cost Plus"])
        );
    }

    #[test]
    fn test_splits_long_comma_lists_but_keeps_short_values_whole() {
        let filter = PlaceholderFilter::default();
        let short = filter.filter(&strings(&["Smith, John"]));
        assert_eq!(short, strings(&["Smith, John"]));

        let long = filter.filter(&strings(&[
            "Alabama, Alaska, Arizona, Arkansas, California, Colorado",
        ]));
        assert_eq!(long.len(), 6);
        assert_eq!(long[0], "Alabama");
        assert_eq!(long[5], "Colorado");
    }

    #[test]
    fn test_dedupes_preserving_first_seen() {
        let filter = PlaceholderFilter::default();
        let out = filter.filter(&strings(&["Yes", "No", "yes", "NO; Maybe"]));
        assert_eq!(out, strings(&["Yes", "No", "Maybe"]));
    }

    #[test]
    fn test_total_on_degenerate_input() {
        let filter = PlaceholderFilter::default();
        assert!(filter.filter(&[]).is_empty());
        assert!(filter.filter(&strings(&["", "  ", ";;", "optional"])).is_empty());
    }
}

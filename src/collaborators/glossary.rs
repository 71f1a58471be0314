use super::GlossaryMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    Number,
    Date,
    Select,
}

/// Result of matching a header against the glossary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryMatch {
    pub allowed_values: Option<Vec<String>>,
    pub input_type: Option<InputType>,
}

impl GlossaryMatch {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.allowed_values.is_some() || self.input_type.is_some()
    }
}

/// One configured glossary definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub header: String,
    #[serde(default)]
    pub allowed_values: Option<Vec<String>>,
    #[serde(default)]
    pub input_type: Option<InputType>,
}

impl GlossaryEntry {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            allowed_values: None,
            input_type: None,
        }
    }

    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self.input_type.get_or_insert(InputType::Select);
        self
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }
}

/// Glossary backed by a fixed list of entries, matched on normalized header
/// names ("Contract State", "contract_state" and "CONTRACT-STATE" are equal).
#[derive(Debug, Clone, Default)]
pub struct StaticGlossary {
    entries: BTreeMap<String, GlossaryEntry>,
}

impl StaticGlossary {
    pub fn new(entries: impl IntoIterator<Item = GlossaryEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            // First definition wins.
            map.entry(normalize_header(&entry.header)).or_insert(entry);
        }
        Self { entries: map }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GlossaryMatcher for StaticGlossary {
    fn match_field(&self, header: &str) -> GlossaryMatch {
        self.entries
            .get(&normalize_header(header))
            .map(|entry| GlossaryMatch {
                allowed_values: entry.allowed_values.clone(),
                input_type: entry.input_type,
            })
            .unwrap_or_default()
    }
}

pub(crate) fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_ignores_case_and_punctuation() {
        let glossary = StaticGlossary::new(vec![
            GlossaryEntry::new("Contract State").with_allowed_values(["CA", "NY"])
        ]);
        let matched = glossary.match_field("contract_state");
        assert_eq!(
            matched.allowed_values,
            Some(vec!["CA".to_string(), "NY".to_string()])
        );
        assert_eq!(matched.input_type, Some(InputType::Select));
    }

    #[test]
    fn test_unknown_header_is_not_an_error() {
        let glossary = StaticGlossary::default();
        let matched = glossary.match_field("Amount");
        assert!(!matched.is_match());
    }

    #[test]
    fn test_first_definition_wins() {
        let glossary = StaticGlossary::new(vec![
            GlossaryEntry::new("State").with_allowed_values(["CA"]),
            GlossaryEntry::new("state").with_allowed_values(["TX"]),
        ]);
        assert_eq!(glossary.len(), 1);
        assert_eq!(
            glossary.match_field("STATE").allowed_values,
            Some(vec!["CA".to_string()])
        );
    }
}

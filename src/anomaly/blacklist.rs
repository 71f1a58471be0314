//! Blacklist matching.
//!
//! A blacklist entry is a configured value that must be surfaced for review
//! whenever it shows up in a cell, regardless of any other signal.

use crate::core::{Anomaly, AnomalyMetadata, AnomalyType, CellValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Exact,
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistScope {
    #[default]
    Global,
    FieldSpecific,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchMode::Exact => "exact",
            MatchMode::Contains => "contains",
        })
    }
}

impl fmt::Display for BlacklistScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlacklistScope::Global => "global",
            BlacklistScope::FieldSpecific => "field_specific",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub id: String,
    pub value: String,
    /// Free-form classification set by whoever configured the entry
    /// (e.g. "name", "email", "custom").
    #[serde(default = "default_entry_type", rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub scope: BlacklistScope,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_entry_type() -> String {
    "custom".to_string()
}

fn default_enabled() -> bool {
    true
}

impl BlacklistEntry {
    pub fn global(id: impl Into<String>, value: impl Into<String>, match_mode: MatchMode) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            entry_type: default_entry_type(),
            match_mode,
            scope: BlacklistScope::Global,
            fields: Vec::new(),
            enabled: true,
        }
    }

    pub fn field_specific<I, S>(
        id: impl Into<String>,
        value: impl Into<String>,
        match_mode: MatchMode,
        fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: BlacklistScope::FieldSpecific,
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::global(id, value, match_mode)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn applies_to_field(&self, field: &str) -> bool {
        match self.scope {
            BlacklistScope::Global => true,
            BlacklistScope::FieldSpecific => {
                let field = field.trim();
                self.fields
                    .iter()
                    .any(|f| f.trim().eq_ignore_ascii_case(field))
            }
        }
    }

    /// Whether this entry fires for an already-normalized cell value.
    pub fn matches_normalized(&self, normalized_value: &str, field: &str) -> bool {
        if !self.enabled || normalized_value.is_empty() || !self.applies_to_field(field) {
            return false;
        }
        let needle = normalize_for_match(&self.value);
        if needle.is_empty() {
            return false;
        }
        match self.match_mode {
            MatchMode::Exact => normalized_value == needle,
            MatchMode::Contains => normalized_value.contains(&needle),
        }
    }

    fn to_anomaly(&self, field: &str) -> Anomaly {
        Anomaly::new(
            AnomalyType::BlacklistHit,
            format!(
                "Value in {} matches blacklisted {} \"{}\"",
                field, self.entry_type, self.value
            ),
        )
        .with_metadata(AnomalyMetadata::Blacklist {
            entry_id: self.id.clone(),
            entry_value: self.value.clone(),
            entry_type: self.entry_type.clone(),
            match_mode: self.match_mode.to_string(),
            scope: self.scope.to_string(),
        })
    }
}

/// Trim, collapse whitespace runs and lowercase.
pub fn normalize_for_match(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Return one `blacklist_hit` anomaly per matching enabled entry, collapsed by
/// entry id so a rule configured twice still reports once.
pub fn match_blacklist(value: &CellValue, field: &str, entries: &[BlacklistEntry]) -> Vec<Anomaly> {
    if value.is_blank() || entries.is_empty() {
        return Vec::new();
    }
    let normalized = normalize_for_match(&value.as_text());
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.matches_normalized(&normalized, field))
        .filter(|entry| seen.insert(entry.id.as_str()))
        .map(|entry| entry.to_anomaly(field))
        .collect()
}

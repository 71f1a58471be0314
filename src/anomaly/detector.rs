//! Cell-level anomaly rules and the sheet/workbook scans built on them.
//!
//! Three rules run per cell:
//!
//! - **invalid_allowed_value**: the field has a cleaned allowed-value list and
//!   the value is not exactly one of them (trimmed, case-insensitive).
//! - **unexpected_missing**: the field is almost always filled on a sheet
//!   large enough to trust that, and this cell is blank.
//! - **blacklist_hit**: see [`super::blacklist`].
//!
//! Everything per-field (allowed-value cleanup, fill statistics) is computed
//! once in [`FieldRules`] so a scan stays O(rows × fields).

use super::blacklist::{match_blacklist, BlacklistEntry};
use crate::collaborators::{Collaborators, NaRecognizer};
use crate::config::DetectionThresholds;
use crate::core::{
    Anomaly, AnomalyMap, AnomalyMetadata, AnomalyType, CellKey, CellValue, Sheet, Workbook,
};
use crate::profile::{profile_sheet, FieldFillRate};
use std::collections::HashSet;

/// Pre-computed rules for one editable field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub field: String,
    /// Cleaned allowed values in first-seen order.
    pub allowed_values: Vec<String>,
    allowed_lookup: HashSet<String>,
    pub fill: Option<FieldFillRate>,
    pub blacklist: Vec<BlacklistEntry>,
}

impl FieldRules {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn with_allowed_values(mut self, allowed_values: Vec<String>) -> Self {
        self.allowed_lookup = allowed_values
            .iter()
            .map(|v| v.trim().to_lowercase())
            .collect();
        self.allowed_values = allowed_values;
        self
    }

    pub fn with_fill(mut self, fill: FieldFillRate) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_blacklist(mut self, blacklist: Vec<BlacklistEntry>) -> Self {
        self.blacklist = blacklist;
        self
    }

    fn is_allowed(&self, value: &CellValue) -> bool {
        self.allowed_lookup.contains(&value.normalized())
    }
}

/// Evaluate every rule against one cell value.
pub fn detect_field_anomalies(
    value: &CellValue,
    rules: &FieldRules,
    thresholds: &DetectionThresholds,
    na: &dyn NaRecognizer,
) -> Vec<Anomaly> {
    let is_na = na.is_canonical_na(value);
    let mut anomalies = Vec::new();

    if let Some(anomaly) = check_allowed_value(value, is_na, rules) {
        anomalies.push(anomaly);
    }
    if let Some(anomaly) = check_unexpected_missing(value, is_na, rules, thresholds) {
        anomalies.push(anomaly);
    }
    anomalies.extend(match_blacklist(value, &rules.field, &rules.blacklist));

    anomalies
}

fn check_allowed_value(value: &CellValue, is_na: bool, rules: &FieldRules) -> Option<Anomaly> {
    if rules.allowed_values.is_empty() || value.is_blank() || is_na || rules.is_allowed(value) {
        return None;
    }
    Some(
        Anomaly::new(
            AnomalyType::InvalidAllowedValue,
            format!(
                "\"{}\" is not an allowed value for {}",
                value.as_text().trim(),
                rules.field
            ),
        )
        .with_metadata(AnomalyMetadata::AllowedValues {
            allowed_values: rules.allowed_values.clone(),
        }),
    )
}

fn check_unexpected_missing(
    value: &CellValue,
    is_na: bool,
    rules: &FieldRules,
    thresholds: &DetectionThresholds,
) -> Option<Anomaly> {
    let fill = rules.fill?;
    if !value.is_blank() || is_na || !thresholds.expects_value(fill.fill_rate, fill.total_rows) {
        return None;
    }
    Some(
        Anomaly::new(
            AnomalyType::UnexpectedMissing,
            format!(
                "{} is empty but filled in {:.0}% of {} rows",
                rules.field,
                fill.fill_rate * 100.0,
                fill.total_rows
            ),
        )
        .with_metadata(AnomalyMetadata::FillRate {
            fill_rate: fill.fill_rate,
            total_rows: fill.total_rows,
        }),
    )
}

/// Build [`FieldRules`] for every editable field of a sheet.
pub fn build_field_rules(
    sheet: &Sheet,
    collaborators: Collaborators<'_>,
    blacklist: &[BlacklistEntry],
) -> Vec<FieldRules> {
    let profile = profile_sheet(sheet, collaborators.na);
    sheet
        .editable_headers()
        .iter()
        .map(|header| {
            let allowed = collaborators
                .glossary
                .match_field(header)
                .allowed_values
                .map(|raw| collaborators.allowed_values.filter(&raw))
                .unwrap_or_default();
            let applicable = blacklist
                .iter()
                .filter(|entry| entry.enabled && entry.applies_to_field(header))
                .cloned()
                .collect();
            let rules = FieldRules::new(header.clone())
                .with_allowed_values(allowed)
                .with_blacklist(applicable);
            match profile.get(header) {
                Some(fill) => rules.with_fill(*fill),
                None => rules,
            }
        })
        .collect()
}

/// Scan every row × editable field of a sheet.
///
/// Cells whose text repeats their header are skipped. Only cells with at least
/// one anomaly appear in the result.
pub fn detect_sheet_anomalies(
    sheet: &Sheet,
    collaborators: Collaborators<'_>,
    blacklist: &[BlacklistEntry],
    thresholds: &DetectionThresholds,
) -> AnomalyMap {
    let rules = build_field_rules(sheet, collaborators, blacklist);
    let mut map = AnomalyMap::new();

    for (row_index, row) in sheet.rows.iter().enumerate() {
        for field_rules in &rules {
            let value = row.get(&field_rules.field);
            if value.repeats_header(&field_rules.field) {
                continue;
            }
            let anomalies = detect_field_anomalies(value, field_rules, thresholds, collaborators.na);
            if !anomalies.is_empty() {
                map.insert(
                    CellKey::new(sheet.name.as_str(), row_index, field_rules.field.as_str()),
                    anomalies,
                );
            }
        }
    }

    log::debug!(
        "Sheet {}: {} anomalies across {} cells",
        sheet.name,
        map.anomaly_count(),
        map.cell_count()
    );
    map
}

/// Scan every sheet of a workbook.
pub fn detect_workbook_anomalies(
    workbook: &Workbook,
    collaborators: Collaborators<'_>,
    blacklist: &[BlacklistEntry],
    thresholds: &DetectionThresholds,
) -> AnomalyMap {
    workbook
        .sheets
        .iter()
        .map(|sheet| detect_sheet_anomalies(sheet, collaborators, blacklist, thresholds))
        .fold(AnomalyMap::new(), |acc, sheet_map| acc.merged_with(&sheet_map))
}

use super::category::{classify_category, sort_priority, AttentionCategory};
use super::field::{compute_field_attention, FieldAttentionResult};
use crate::core::{AnomalyMap, AnomalyType, RowStatus, Sheet, SignalMaps};
use serde::{Deserialize, Serialize};

/// Per-row tallies of field-level attention flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttentionCounts {
    pub rfi: usize,
    pub anomaly: usize,
    pub blacklist_hit: usize,
    pub incomplete_address: usize,
    pub manual_edit: usize,
    pub contract_error: usize,
    pub unreadable_text: usize,
    pub extraction_suspect: usize,
    pub not_applicable: usize,
}

impl AttentionCounts {
    fn add_field(&mut self, field: &FieldAttentionResult) {
        self.rfi += usize::from(field.has_rfi);
        self.anomaly += usize::from(field.has_must_review_anomaly);
        self.blacklist_hit += usize::from(field.has_blacklist_hit);
        self.incomplete_address += usize::from(field.has_incomplete_address);
        self.manual_edit += usize::from(field.has_manual_edit);
        self.add_contract_flags(field);
    }

    fn add_contract_flags(&mut self, field: &FieldAttentionResult) {
        self.contract_error += usize::from(field.has_contract_error);
        self.unreadable_text += usize::from(field.has_unreadable_text);
        self.extraction_suspect += usize::from(field.has_extraction_suspect);
        self.not_applicable += usize::from(field.has_not_applicable);
    }

    /// Manual edits are visible through the category but never force
    /// attention on their own.
    pub fn requires_attention(&self) -> bool {
        self.rfi > 0
            || self.anomaly > 0
            || self.incomplete_address > 0
            || self.contract_error > 0
            || self.unreadable_text > 0
            || self.extraction_suspect > 0
            || self.not_applicable > 0
    }

    pub fn contract_issue_total(&self) -> usize {
        self.contract_error + self.unreadable_text + self.extraction_suspect + self.not_applicable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowAttentionResult {
    #[serde(flatten)]
    pub counts: AttentionCounts,
    pub category: AttentionCategory,
    pub needs_attention: bool,
}

impl RowAttentionResult {
    pub fn from_counts(counts: AttentionCounts) -> Self {
        Self {
            category: classify_category(&counts),
            needs_attention: counts.requires_attention(),
            counts,
        }
    }

    pub fn sort_priority(&self, row_status: RowStatus) -> u8 {
        sort_priority(self.category, row_status)
    }
}

/// Contract-column flags only. The column holds a source reference rather
/// than reviewer-entered data, so only contract anomaly types count.
fn contract_column_flags(
    sheet_name: &str,
    row: usize,
    contract_header: &str,
    anomalies: &AnomalyMap,
) -> FieldAttentionResult {
    let cell = anomalies.get(sheet_name, row, contract_header);
    let has = |ty: AnomalyType| cell.iter().any(|a| a.anomaly_type == ty);
    FieldAttentionResult {
        has_contract_error: has(AnomalyType::ContractLoadError),
        has_unreadable_text: has(AnomalyType::ContractTextUnreadable),
        has_extraction_suspect: has(AnomalyType::ContractExtractionSuspect),
        has_not_applicable: has(AnomalyType::ContractNotApplicable),
        ..Default::default()
    }
}

/// Aggregate one row of `sheet`.
///
/// Counts come from the editable headers plus the contract column. Rows
/// outside the sheet resolve to the empty result.
pub fn compute_row_attention(
    sheet: &Sheet,
    row: usize,
    signals: &SignalMaps,
    anomalies: &AnomalyMap,
) -> RowAttentionResult {
    if row >= sheet.row_count() {
        return RowAttentionResult::default();
    }

    let mut counts = AttentionCounts::default();
    for field in sheet.editable_headers() {
        counts.add_field(&compute_field_attention(
            &sheet.name,
            row,
            field,
            signals,
            anomalies,
        ));
    }
    if let Some(contract_header) = sheet.contract_header() {
        counts.add_contract_flags(&contract_column_flags(
            &sheet.name,
            row,
            contract_header,
            anomalies,
        ));
    }

    RowAttentionResult::from_counts(counts)
}

/// One result per row index, in row order.
pub fn compute_sheet_attention(
    sheet: &Sheet,
    signals: &SignalMaps,
    anomalies: &AnomalyMap,
) -> Vec<RowAttentionResult> {
    (0..sheet.row_count())
        .map(|row| compute_row_attention(sheet, row, signals, anomalies))
        .collect()
}

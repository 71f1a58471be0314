use crate::core::{AnomalyMap, AnomalyType, FieldStatus, ModificationType, SignalMaps};
use serde::{Deserialize, Serialize};

/// Attention flags for one (sheet, row, field) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldAttentionResult {
    pub has_rfi: bool,
    pub has_must_review_anomaly: bool,
    pub has_blacklist_hit: bool,
    pub has_incomplete_address: bool,
    pub has_manual_edit: bool,
    pub has_contract_error: bool,
    pub has_unreadable_text: bool,
    pub has_extraction_suspect: bool,
    pub has_not_applicable: bool,
    pub needs_attention: bool,
}

impl FieldAttentionResult {
    fn with_derived_attention(mut self) -> Self {
        self.needs_attention = [
            self.has_rfi,
            self.has_must_review_anomaly,
            self.has_incomplete_address,
            self.has_manual_edit,
            self.has_contract_error,
            self.has_unreadable_text,
            self.has_extraction_suspect,
            self.has_not_applicable,
        ]
        .into_iter()
        .any(|flag| flag);
        self
    }
}

/// Fold every signal source for one cell into attention flags.
///
/// The RFI flag is an OR of the field status and the comment map: a comment
/// can outlive the status flag while a reviewer is editing.
/// `address_standardized` modifications are informational and never raise a
/// flag.
pub fn compute_field_attention(
    sheet: &str,
    row: usize,
    field: &str,
    signals: &SignalMaps,
    anomalies: &AnomalyMap,
) -> FieldAttentionResult {
    let cell_anomalies = anomalies.get(sheet, row, field);
    let has_type = |ty: AnomalyType| cell_anomalies.iter().any(|a| a.anomaly_type == ty);
    let modification = signals
        .modification(sheet, row, field)
        .map(|m| m.modification_type);

    FieldAttentionResult {
        has_rfi: signals.field_status(sheet, row, field) == FieldStatus::Rfi
            || signals.rfi_comment(sheet, row, field).is_some(),
        has_must_review_anomaly: cell_anomalies
            .iter()
            .any(|a| a.anomaly_type.is_must_review()),
        has_blacklist_hit: has_type(AnomalyType::BlacklistHit),
        has_incomplete_address: modification == Some(ModificationType::AddressIncomplete),
        has_manual_edit: modification == Some(ModificationType::ManualEdit),
        has_contract_error: has_type(AnomalyType::ContractLoadError),
        has_unreadable_text: has_type(AnomalyType::ContractTextUnreadable),
        has_extraction_suspect: has_type(AnomalyType::ContractExtractionSuspect),
        has_not_applicable: has_type(AnomalyType::ContractNotApplicable),
        needs_attention: false,
    }
    .with_derived_attention()
}

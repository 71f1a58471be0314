//! Folding contract-URL preflight results into an anomaly map.
//!
//! The preflight classifier (network fetch, text extraction, confidence
//! scoring) runs elsewhere. Here we only translate its failed records into
//! contract anomalies on the referenced cell.

use crate::core::{Anomaly, AnomalyMap, AnomalyMetadata, AnomalyType, CellKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreflightCategory {
    LoadError,
    TextUnreadable,
    ExtractionSuspect,
    NotApplicable,
    /// Any category this build does not know; treated as a load error.
    #[serde(other)]
    Unknown,
}

impl PreflightCategory {
    pub fn anomaly_type(&self) -> AnomalyType {
        match self {
            PreflightCategory::LoadError | PreflightCategory::Unknown => {
                AnomalyType::ContractLoadError
            }
            PreflightCategory::TextUnreadable => AnomalyType::ContractTextUnreadable,
            PreflightCategory::ExtractionSuspect => AnomalyType::ContractExtractionSuspect,
            PreflightCategory::NotApplicable => AnomalyType::ContractNotApplicable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreflightCategory::LoadError => "load_error",
            PreflightCategory::TextUnreadable => "text_unreadable",
            PreflightCategory::ExtractionSuspect => "extraction_suspect",
            PreflightCategory::NotApplicable => "not_applicable",
            PreflightCategory::Unknown => "unknown",
        }
    }
}

/// One result from the URL preflight classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightRecord {
    pub sheet_name: String,
    pub row_index: usize,
    pub field_name: String,
    pub valid: bool,
    #[serde(default)]
    pub category: Option<PreflightCategory>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl PreflightRecord {
    pub fn failed(
        sheet_name: impl Into<String>,
        row_index: usize,
        field_name: impl Into<String>,
        category: PreflightCategory,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row_index,
            field_name: field_name.into(),
            valid: false,
            category: Some(category),
            message: None,
            confidence: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    fn anomaly_type(&self) -> AnomalyType {
        self.category
            .map(|c| c.anomaly_type())
            .unwrap_or(AnomalyType::ContractLoadError)
    }

    fn to_anomaly(&self) -> Anomaly {
        let anomaly_type = self.anomaly_type();
        let message = self
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message(anomaly_type).to_string());
        Anomaly::new(anomaly_type, message).with_metadata(AnomalyMetadata::ContractCheck {
            category: self.category.map(|c| c.as_str().to_string()),
            confidence: self.confidence,
        })
    }
}

fn default_message(anomaly_type: AnomalyType) -> &'static str {
    match anomaly_type {
        AnomalyType::ContractTextUnreadable => "Contract text could not be read",
        AnomalyType::ContractExtractionSuspect => "Extracted contract data looks unreliable",
        AnomalyType::ContractNotApplicable => "Contract document does not apply to this row",
        _ => "Contract document failed to load",
    }
}

/// Return a new map with every failed preflight record folded in.
///
/// A record is skipped when its cell already carries an anomaly of the same
/// type, so repeated preflight runs never stack duplicate contract errors.
pub fn merge_preflight_anomalies(anomalies: &AnomalyMap, records: &[PreflightRecord]) -> AnomalyMap {
    let mut merged = anomalies.clone();
    let mut added = 0usize;

    for record in records.iter().filter(|r| !r.valid) {
        let anomaly_type = record.anomaly_type();
        if merged.has_type(&record.sheet_name, record.row_index, &record.field_name, anomaly_type) {
            continue;
        }
        merged.push(
            CellKey::new(
                record.sheet_name.as_str(),
                record.row_index,
                record.field_name.as_str(),
            ),
            record.to_anomaly(),
        );
        added += 1;
    }

    log::debug!(
        "Merged {} preflight anomalies from {} records",
        added,
        records.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_records_become_contract_anomalies() {
        let records = vec![
            PreflightRecord::failed("s", 0, "ContractURL", PreflightCategory::LoadError)
                .with_message("HTTP 404"),
            PreflightRecord::failed("s", 1, "ContractURL", PreflightCategory::NotApplicable)
                .with_confidence(0.8),
        ];
        let merged = merge_preflight_anomalies(&AnomalyMap::new(), &records);

        let first = merged.get("s", 0, "ContractURL");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].anomaly_type, AnomalyType::ContractLoadError);
        assert_eq!(first[0].message, "HTTP 404");

        let second = merged.get("s", 1, "ContractURL");
        assert_eq!(second[0].anomaly_type, AnomalyType::ContractNotApplicable);
        assert_eq!(
            second[0].metadata,
            AnomalyMetadata::ContractCheck {
                category: Some("not_applicable".into()),
                confidence: Some(0.8),
            }
        );
    }

    #[test]
    fn test_valid_records_are_ignored() {
        let mut record = PreflightRecord::failed("s", 0, "u", PreflightCategory::LoadError);
        record.valid = true;
        assert!(merge_preflight_anomalies(&AnomalyMap::new(), &[record]).is_empty());
    }

    #[test]
    fn test_never_two_load_errors_on_one_field() {
        let record = PreflightRecord::failed("s", 0, "u", PreflightCategory::LoadError);
        let once = merge_preflight_anomalies(&AnomalyMap::new(), &[record.clone(), record.clone()]);
        assert_eq!(once.get("s", 0, "u").len(), 1);

        let twice = merge_preflight_anomalies(&once, &[record]);
        assert_eq!(twice.get("s", 0, "u").len(), 1);
    }

    #[test]
    fn test_missing_category_defaults_to_load_error() {
        let mut record = PreflightRecord::failed("s", 0, "u", PreflightCategory::LoadError);
        record.category = None;
        let merged = merge_preflight_anomalies(&AnomalyMap::new(), &[record]);
        assert_eq!(
            merged.get("s", 0, "u")[0].anomaly_type,
            AnomalyType::ContractLoadError
        );
    }

    #[test]
    fn test_input_map_is_untouched() {
        let base = AnomalyMap::new();
        let record = PreflightRecord::failed("s", 0, "u", PreflightCategory::TextUnreadable);
        let merged = merge_preflight_anomalies(&base, &[record]);
        assert!(base.is_empty());
        assert_eq!(merged.cell_count(), 1);
    }

    #[test]
    fn test_unknown_category_deserializes() {
        let json = r#"{"sheet_name":"s","row_index":2,"field_name":"u","valid":false,"category":"timeout"}"#;
        let record: PreflightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, Some(PreflightCategory::Unknown));
        let merged = merge_preflight_anomalies(&AnomalyMap::new(), &[record]);
        assert_eq!(
            merged.get("s", 2, "u")[0].anomaly_type,
            AnomalyType::ContractLoadError
        );
    }
}

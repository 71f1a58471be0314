//! Anomaly records and the sparse sheet/row/field anomaly map.
//!
//! An [`Anomaly`] is a recorded "this value looks wrong" fact, never a runtime
//! error. Anomalies are produced fresh on every detection pass and never
//! mutated afterwards.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of anomaly kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    InvalidAllowedValue,
    UnexpectedMissing,
    BlacklistHit,
    ContractLoadError,
    ContractTextUnreadable,
    ContractExtractionSuspect,
    ContractNotApplicable,
}

impl AnomalyType {
    pub const ALL: [AnomalyType; 7] = [
        AnomalyType::InvalidAllowedValue,
        AnomalyType::UnexpectedMissing,
        AnomalyType::BlacklistHit,
        AnomalyType::ContractLoadError,
        AnomalyType::ContractTextUnreadable,
        AnomalyType::ContractExtractionSuspect,
        AnomalyType::ContractNotApplicable,
    ];

    /// Types that put a cell in front of a reviewer.
    pub const MUST_REVIEW: [AnomalyType; 7] = Self::ALL;

    /// Types produced by the contract-URL preflight rather than by cell rules.
    pub const CONTRACT: [AnomalyType; 4] = [
        AnomalyType::ContractLoadError,
        AnomalyType::ContractTextUnreadable,
        AnomalyType::ContractExtractionSuspect,
        AnomalyType::ContractNotApplicable,
    ];

    pub fn is_must_review(&self) -> bool {
        Self::MUST_REVIEW.contains(self)
    }

    pub fn is_contract(&self) -> bool {
        Self::CONTRACT.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::InvalidAllowedValue => "invalid_allowed_value",
            AnomalyType::UnexpectedMissing => "unexpected_missing",
            AnomalyType::BlacklistHit => "blacklist_hit",
            AnomalyType::ContractLoadError => "contract_load_error",
            AnomalyType::ContractTextUnreadable => "contract_text_unreadable",
            AnomalyType::ContractExtractionSuspect => "contract_extraction_suspect",
            AnomalyType::ContractNotApplicable => "contract_not_applicable",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Warn,
}

/// Type-specific detail attached to an anomaly for audit logs and tooltips.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyMetadata {
    #[default]
    None,
    AllowedValues {
        allowed_values: Vec<String>,
    },
    FillRate {
        fill_rate: f64,
        total_rows: usize,
    },
    Blacklist {
        entry_id: String,
        entry_value: String,
        entry_type: String,
        match_mode: String,
        scope: String,
    },
    ContractCheck {
        category: Option<String>,
        confidence: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    #[serde(default)]
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub metadata: AnomalyMetadata,
}

impl Anomaly {
    pub fn new(anomaly_type: AnomalyType, message: impl Into<String>) -> Self {
        Self {
            anomaly_type,
            severity: Severity::Warn,
            message: message.into(),
            metadata: AnomalyMetadata::None,
        }
    }

    pub fn with_metadata(mut self, metadata: AnomalyMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn blacklist_entry_id(&self) -> Option<&str> {
        match &self.metadata {
            AnomalyMetadata::Blacklist { entry_id, .. } => Some(entry_id),
            _ => None,
        }
    }
}

/// Composite key for one cell: sheet name, row index, field name.
///
/// Ordering is (sheet, row, field), so a map keyed by `CellKey` iterates in a
/// stable order and all cells of one row are contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub sheet: String,
    pub row: usize,
    pub field: String,
}

impl CellKey {
    pub fn new(sheet: impl Into<String>, row: usize, field: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            field: field.into(),
        }
    }
}

/// Serialized form of one [`AnomalyMap`] cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEntry {
    pub sheet: String,
    pub row: usize,
    pub field: String,
    pub anomalies: Vec<Anomaly>,
}

/// Sparse sheet → row → field → anomalies map. A missing key means "no
/// anomalies"; cells with an empty list are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AnomalyEntry>", into = "Vec<AnomalyEntry>")]
pub struct AnomalyMap {
    cells: OrdMap<CellKey, Vec<Anomaly>>,
}

impl AnomalyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anomalies for one cell; empty when the cell has none.
    pub fn get(&self, sheet: &str, row: usize, field: &str) -> &[Anomaly] {
        self.cells
            .get(&CellKey::new(sheet, row, field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_type(&self, sheet: &str, row: usize, field: &str, ty: AnomalyType) -> bool {
        self.get(sheet, row, field)
            .iter()
            .any(|a| a.anomaly_type == ty)
    }

    /// Replace the anomalies of one cell. Empty lists remove the cell.
    pub fn insert(&mut self, key: CellKey, anomalies: Vec<Anomaly>) {
        if anomalies.is_empty() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, anomalies);
        }
    }

    pub fn push(&mut self, key: CellKey, anomaly: Anomaly) {
        match self.cells.get_mut(&key) {
            Some(existing) => existing.push(anomaly),
            None => {
                self.cells.insert(key, vec![anomaly]);
            }
        }
    }

    /// Cells of one row in field-name order.
    pub fn row_cells<'a>(
        &'a self,
        sheet: &'a str,
        row: usize,
    ) -> impl Iterator<Item = (&'a str, &'a [Anomaly])> + 'a {
        self.cells
            .range(CellKey::new(sheet, row, "")..)
            .take_while(move |(key, _)| key.sheet == sheet && key.row == row)
            .map(|(key, anomalies)| (key.field.as_str(), anomalies.as_slice()))
    }

    pub fn row_has_anomalies(&self, sheet: &str, row: usize) -> bool {
        self.row_cells(sheet, row).next().is_some()
    }

    /// Restrict the map to one sheet.
    pub fn for_sheet(&self, sheet: &str) -> AnomalyMap {
        let cells = self
            .cells
            .range(CellKey::new(sheet, 0, "")..)
            .take_while(|(key, _)| key.sheet == sheet)
            .map(|(key, anomalies)| (key.clone(), anomalies.clone()))
            .collect();
        AnomalyMap { cells }
    }

    /// Union of two maps; cells present in both keep `self`'s anomalies first.
    pub fn merged_with(&self, other: &AnomalyMap) -> AnomalyMap {
        let mut merged = self.clone();
        for (key, anomalies) in other.iter() {
            for anomaly in anomalies {
                merged.push(key.clone(), anomaly.clone());
            }
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &Vec<Anomaly>)> {
        self.cells.iter()
    }

    /// Number of cells carrying at least one anomaly.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn anomaly_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn counts_by_type(&self) -> BTreeMap<AnomalyType, usize> {
        self.cells
            .values()
            .flatten()
            .fold(BTreeMap::new(), |mut acc, anomaly| {
                *acc.entry(anomaly.anomaly_type).or_default() += 1;
                acc
            })
    }
}

impl From<Vec<AnomalyEntry>> for AnomalyMap {
    fn from(entries: Vec<AnomalyEntry>) -> Self {
        let mut map = AnomalyMap::new();
        for entry in entries {
            let key = CellKey::new(entry.sheet, entry.row, entry.field);
            for anomaly in entry.anomalies {
                map.push(key.clone(), anomaly);
            }
        }
        map
    }
}

impl From<AnomalyMap> for Vec<AnomalyEntry> {
    fn from(map: AnomalyMap) -> Self {
        map.cells
            .into_iter()
            .map(|(key, anomalies)| AnomalyEntry {
                sheet: key.sheet,
                row: key.row,
                field: key.field,
                anomalies,
            })
            .collect()
    }
}

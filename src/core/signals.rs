//! Signal maps owned and mutated by the surrounding application.
//!
//! The engine only reads them. Every map is sparse: a missing sheet, row or
//! field resolves to the documented default (incomplete, no comment, no
//! modification) instead of an error.

use super::cell::CellValue;
use chrono::{DateTime, Utc};
use im::OrdMap;
use serde::{Deserialize, Serialize};

/// Manual completion status of a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Complete,
    #[default]
    Incomplete,
}

impl RowStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, RowStatus::Complete)
    }
}

/// Reviewer-set status of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Complete,
    #[default]
    Incomplete,
    Rfi,
}

/// How a cell came to differ from its ingested value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    /// System-applied address standardization. Informational only.
    AddressStandardized,
    /// System flagged the address as incomplete.
    AddressIncomplete,
    /// A reviewer changed the value by hand.
    ManualEdit,
}

impl ModificationType {
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            ModificationType::AddressStandardized | ModificationType::AddressIncomplete
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationRecord {
    #[serde(default)]
    pub original_value: CellValue,
    #[serde(default)]
    pub new_value: CellValue,
    pub modification_type: ModificationType,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ModificationRecord {
    pub fn new(modification_type: ModificationType) -> Self {
        Self {
            original_value: CellValue::Empty,
            new_value: CellValue::Empty,
            modification_type,
            reason: None,
            timestamp: None,
        }
    }

    pub fn with_values(
        mut self,
        original_value: impl Into<CellValue>,
        new_value: impl Into<CellValue>,
    ) -> Self {
        self.original_value = original_value.into();
        self.new_value = new_value.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// sheet → row → value
pub type RowSignalMap<V> = OrdMap<String, OrdMap<usize, V>>;
/// sheet → row → field → value
pub type FieldSignalMap<V> = OrdMap<String, OrdMap<usize, OrdMap<String, V>>>;

/// Immutable snapshot of every reviewer-driven signal the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMaps {
    #[serde(default)]
    pub row_statuses: RowSignalMap<RowStatus>,
    #[serde(default)]
    pub field_statuses: FieldSignalMap<FieldStatus>,
    #[serde(default)]
    pub rfi_comments: FieldSignalMap<String>,
    #[serde(default)]
    pub modifications: FieldSignalMap<ModificationRecord>,
}

impl SignalMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_status(&self, sheet: &str, row: usize) -> RowStatus {
        self.row_statuses
            .get(sheet)
            .and_then(|rows| rows.get(&row))
            .copied()
            .unwrap_or_default()
    }

    pub fn field_status(&self, sheet: &str, row: usize, field: &str) -> FieldStatus {
        field_entry(&self.field_statuses, sheet, row, field)
            .copied()
            .unwrap_or_default()
    }

    /// Non-blank RFI comment text for a field.
    pub fn rfi_comment(&self, sheet: &str, row: usize, field: &str) -> Option<&str> {
        field_entry(&self.rfi_comments, sheet, row, field)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    pub fn modification(&self, sheet: &str, row: usize, field: &str) -> Option<&ModificationRecord> {
        field_entry(&self.modifications, sheet, row, field)
    }

    /// Return a copy with the row's completion status replaced.
    pub fn with_row_status(&self, sheet: &str, row: usize, status: RowStatus) -> Self {
        let mut next = self.clone();
        let mut rows = next.row_statuses.get(sheet).cloned().unwrap_or_default();
        rows.insert(row, status);
        next.row_statuses.insert(sheet.to_string(), rows);
        next
    }

    pub fn with_field_status(&self, sheet: &str, row: usize, field: &str, status: FieldStatus) -> Self {
        let mut next = self.clone();
        next.field_statuses = with_field_entry(&self.field_statuses, sheet, row, field, status);
        next
    }

    pub fn with_rfi_comment(&self, sheet: &str, row: usize, field: &str, comment: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.rfi_comments = with_field_entry(&self.rfi_comments, sheet, row, field, comment.into());
        next
    }

    pub fn with_modification(
        &self,
        sheet: &str,
        row: usize,
        field: &str,
        record: ModificationRecord,
    ) -> Self {
        let mut next = self.clone();
        next.modifications = with_field_entry(&self.modifications, sheet, row, field, record);
        next
    }
}

fn field_entry<'a, V>(map: &'a FieldSignalMap<V>, sheet: &str, row: usize, field: &str) -> Option<&'a V>
where
    V: Clone,
{
    map.get(sheet)
        .and_then(|rows| rows.get(&row))
        .and_then(|fields| fields.get(field))
}

fn with_field_entry<V: Clone>(
    map: &FieldSignalMap<V>,
    sheet: &str,
    row: usize,
    field: &str,
    value: V,
) -> FieldSignalMap<V> {
    let mut rows = map.get(sheet).cloned().unwrap_or_default();
    let mut fields = rows.get(&row).cloned().unwrap_or_default();
    fields.insert(field.to_string(), value);
    rows.insert(row, fields);
    map.update(sheet.to_string(), rows)
}

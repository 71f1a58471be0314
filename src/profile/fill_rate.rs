use crate::collaborators::NaRecognizer;
use crate::core::Sheet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fill statistics for one editable field of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldFillRate {
    pub fill_rate: f64,
    pub na_rate: f64,
    pub total_rows: usize,
    pub non_empty_non_na: usize,
}

impl FieldFillRate {
    fn from_counts(total_rows: usize, filled: usize, na: usize) -> Self {
        let ratio = |count: usize| {
            if total_rows == 0 {
                0.0
            } else {
                count as f64 / total_rows as f64
            }
        };
        Self {
            fill_rate: ratio(filled),
            na_rate: ratio(na),
            total_rows,
            non_empty_non_na: filled,
        }
    }
}

/// Per-field fill statistics, iterated in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillRateProfile {
    fields: Vec<(String, FieldFillRate)>,
}

impl FillRateProfile {
    pub fn get(&self, field: &str) -> Option<&FieldFillRate> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rate)| rate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldFillRate)> {
        self.fields.iter().map(|(name, rate)| (name.as_str(), rate))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, FieldFillRate> {
        self.fields.iter().cloned().collect()
    }
}

/// Profile every editable field of a sheet.
///
/// A cell is NA when the recognizer says so; otherwise it is filled when it is
/// non-blank and does not repeat the header name. Everything else (blank
/// cells, header repeats) counts as neither.
pub fn profile_sheet(sheet: &Sheet, na: &dyn NaRecognizer) -> FillRateProfile {
    let total_rows = sheet.row_count();
    let fields = sheet
        .editable_headers()
        .iter()
        .map(|header| {
            let (filled, na_count) =
                sheet
                    .rows
                    .iter()
                    .map(|row| row.get(header))
                    .fold((0usize, 0usize), |(filled, na_count), value| {
                        if na.is_canonical_na(value) {
                            (filled, na_count + 1)
                        } else if !value.is_blank() && !value.repeats_header(header) {
                            (filled + 1, na_count)
                        } else {
                            (filled, na_count)
                        }
                    });
            (
                header.clone(),
                FieldFillRate::from_counts(total_rows, filled, na_count),
            )
        })
        .collect();

    log::trace!("Profiled {} fields of sheet {}", sheet.editable_headers().len(), sheet.name);
    FillRateProfile { fields }
}

//! Per-sheet progress and issue analytics.

use crate::attention::{compute_field_attention, compute_row_attention, AttentionCategory};
use crate::core::{AnomalyMap, Sheet, SignalMaps};
use crate::review::{ReviewReason, RowReviewStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetAnalytics {
    pub sheet_name: String,
    pub total_rows: usize,
    pub completed_rows: usize,
    pub progress_percent: u32,
    pub rfi_rows: BTreeSet<usize>,
    pub system_change_rows: BTreeSet<usize>,
    pub manual_edit_rows: BTreeSet<usize>,
    pub anomaly_rows: BTreeSet<usize>,
    pub blacklist_hit_rows: BTreeSet<usize>,
    pub needs_attention_rows: BTreeSet<usize>,
    pub category_counts: BTreeMap<AttentionCategory, usize>,
    /// Cells in completed rows with no RFI, modification or anomaly.
    pub verified_cell_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_counts: Option<BTreeMap<ReviewReason, usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking_pending_count: Option<usize>,
}

impl SheetAnalytics {
    pub fn pending_rows(&self) -> usize {
        self.total_rows - self.completed_rows
    }
}

/// `round(completed / total * 100)`, 0 for an empty sheet.
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

fn row_has_system_change(sheet: &Sheet, row: usize, signals: &SignalMaps) -> bool {
    sheet.editable_headers().iter().any(|field| {
        signals
            .modification(&sheet.name, row, field)
            .is_some_and(|m| m.modification_type.is_system())
    })
}

fn verified_cells_in_row(
    sheet: &Sheet,
    row: usize,
    signals: &SignalMaps,
    anomalies: &AnomalyMap,
) -> usize {
    sheet
        .editable_headers()
        .iter()
        .filter(|field| {
            let flags = compute_field_attention(&sheet.name, row, field, signals, anomalies);
            !flags.has_rfi
                && signals.modification(&sheet.name, row, field).is_none()
                && anomalies.get(&sheet.name, row, field).is_empty()
        })
        .count()
}

/// Single pass over every row of `sheet`.
///
/// Attention is recomputed here rather than taken from the caller. Review
/// statuses, when given, are indexed by row and only feed the reason
/// tallies.
pub fn compute_sheet_analytics(
    sheet: &Sheet,
    signals: &SignalMaps,
    anomalies: &AnomalyMap,
    review_statuses: Option<&[RowReviewStatus]>,
) -> SheetAnalytics {
    let mut analytics = SheetAnalytics {
        sheet_name: sheet.name.clone(),
        total_rows: sheet.row_count(),
        ..Default::default()
    };

    for row in 0..sheet.row_count() {
        let attention = compute_row_attention(sheet, row, signals, anomalies);
        let complete = signals.row_status(&sheet.name, row).is_complete();
        let counts = &attention.counts;

        if complete {
            analytics.completed_rows += 1;
            analytics.verified_cell_count += verified_cells_in_row(sheet, row, signals, anomalies);
        }
        if counts.rfi > 0 {
            analytics.rfi_rows.insert(row);
        }
        if row_has_system_change(sheet, row, signals) {
            analytics.system_change_rows.insert(row);
        }
        if counts.manual_edit > 0 {
            analytics.manual_edit_rows.insert(row);
        }
        if counts.anomaly > 0 || counts.contract_issue_total() > 0 {
            analytics.anomaly_rows.insert(row);
        }
        if counts.blacklist_hit > 0 {
            analytics.blacklist_hit_rows.insert(row);
        }
        if attention.needs_attention {
            analytics.needs_attention_rows.insert(row);
        }
        *analytics.category_counts.entry(attention.category).or_insert(0) += 1;
    }

    analytics.progress_percent = progress_percent(analytics.completed_rows, analytics.total_rows);

    if let Some(statuses) = review_statuses {
        let mut reason_counts = BTreeMap::new();
        for status in statuses {
            *reason_counts.entry(status.reason).or_insert(0) += 1;
        }
        analytics.blocking_pending_count = Some(statuses.iter().filter(|s| s.is_blocking).count());
        analytics.reason_counts = Some(reason_counts);
    }

    log::debug!(
        "Analytics for '{}': {}/{} complete, {} need attention, {} verified cells",
        analytics.sheet_name,
        analytics.completed_rows,
        analytics.total_rows,
        analytics.needs_attention_rows.len(),
        analytics.verified_cell_count
    );
    analytics
}

//! End-to-end evaluation of a workbook snapshot.
//!
//! Phases run in a fixed order: fill profiling and anomaly detection per
//! sheet, preflight merge across the workbook, then attention, review status
//! and analytics per row. Nothing is cached between calls.

use crate::analytics::{compute_sheet_analytics, SheetAnalytics};
use crate::anomaly::{
    detect_workbook_anomalies, merge_preflight_anomalies, BlacklistEntry, PreflightRecord,
};
use crate::attention::{compute_sheet_attention, AttentionCategory, RowAttentionResult};
use crate::collaborators::{
    AllowedValueFilter, Collaborators, GlossaryEntry, GlossaryMatcher, NaRecognizer,
    StaticGlossary,
};
use crate::config::{DetectionThresholds, ReviewmapConfig};
use crate::core::{AnomalyMap, RowStatus, Sheet, SignalMaps, Workbook};
use crate::profile::{profile_sheet, FillRateProfile};
use crate::review::{derive_review_status_at, ReviewReason, RowReviewStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything derived for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowReport {
    pub row_index: usize,
    pub row_status: RowStatus,
    pub attention: RowAttentionResult,
    pub review: RowReviewStatus,
    pub sort_priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetReport {
    pub sheet_name: String,
    pub fill_profile: FillRateProfile,
    pub anomalies: AnomalyMap,
    pub rows: Vec<RowReport>,
    pub analytics: SheetAnalytics,
}

impl SheetReport {
    /// Rows ordered for a review queue: sort priority, then row index.
    pub fn review_queue(&self) -> Vec<&RowReport> {
        let mut rows: Vec<&RowReport> = self.rows.iter().collect();
        rows.sort_by_key(|row| (row.sort_priority, row.row_index));
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub generated_at: DateTime<Utc>,
    pub sheets: Vec<SheetReport>,
}

impl ReviewReport {
    pub fn sheet(&self, name: &str) -> Option<&SheetReport> {
        self.sheets.iter().find(|s| s.sheet_name == name)
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.analytics.total_rows).sum()
    }

    pub fn completed_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.analytics.completed_rows).sum()
    }

    pub fn blocking_rows(&self) -> usize {
        self.rows().filter(|row| row.review.is_blocking).count()
    }

    pub fn total_anomalies(&self) -> usize {
        self.sheets.iter().map(|s| s.anomalies.anomaly_count()).sum()
    }

    pub fn category_totals(&self) -> BTreeMap<AttentionCategory, usize> {
        let mut totals = BTreeMap::new();
        for row in self.rows() {
            *totals.entry(row.attention.category).or_insert(0) += 1;
        }
        totals
    }

    pub fn reason_totals(&self) -> BTreeMap<ReviewReason, usize> {
        let mut totals = BTreeMap::new();
        for row in self.rows() {
            *totals.entry(row.review.reason).or_insert(0) += 1;
        }
        totals
    }

    /// Keep only the named sheet.
    pub fn retain_sheet(&mut self, name: &str) {
        self.sheets.retain(|s| s.sheet_name == name);
    }

    fn rows(&self) -> impl Iterator<Item = &RowReport> {
        self.sheets.iter().flat_map(|s| s.rows.iter())
    }
}

/// Evaluates workbook snapshots with a fixed set of collaborators.
pub struct ReviewEngine {
    thresholds: DetectionThresholds,
    glossary: Box<dyn GlossaryMatcher>,
    na: Box<dyn NaRecognizer>,
    allowed_values: Box<dyn AllowedValueFilter>,
    configured_blacklist: Vec<BlacklistEntry>,
}

impl Default for ReviewEngine {
    fn default() -> Self {
        Self::from_config(&ReviewmapConfig::default())
    }
}

impl ReviewEngine {
    pub fn from_config(config: &ReviewmapConfig) -> Self {
        Self {
            thresholds: config.detection_thresholds(),
            glossary: Box::new(config.glossary()),
            na: Box::new(config.na_recognizer()),
            allowed_values: Box::new(config.allowed_value_filter()),
            configured_blacklist: config.blacklist_entries(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: DetectionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_glossary(mut self, glossary: impl GlossaryMatcher + 'static) -> Self {
        self.glossary = Box::new(glossary);
        self
    }

    pub fn with_na_recognizer(mut self, na: impl NaRecognizer + 'static) -> Self {
        self.na = Box::new(na);
        self
    }

    pub fn with_allowed_value_filter(mut self, filter: impl AllowedValueFilter + 'static) -> Self {
        self.allowed_values = Box::new(filter);
        self
    }

    fn collaborators(&self) -> Collaborators<'_> {
        Collaborators::new(
            self.glossary.as_ref(),
            self.na.as_ref(),
            self.allowed_values.as_ref(),
        )
    }

    /// Configured entries first, then the snapshot's own.
    fn effective_blacklist(&self, blacklist: &[BlacklistEntry]) -> Vec<BlacklistEntry> {
        self.configured_blacklist
            .iter()
            .chain(blacklist)
            .cloned()
            .collect()
    }

    pub fn evaluate(
        &self,
        workbook: &Workbook,
        signals: &SignalMaps,
        blacklist: &[BlacklistEntry],
        preflight: &[PreflightRecord],
    ) -> ReviewReport {
        self.evaluate_at(workbook, signals, blacklist, preflight, Utc::now())
    }

    /// Same as [`ReviewEngine::evaluate`] with an explicit timestamp, so two
    /// runs over the same inputs produce identical reports.
    pub fn evaluate_at(
        &self,
        workbook: &Workbook,
        signals: &SignalMaps,
        blacklist: &[BlacklistEntry],
        preflight: &[PreflightRecord],
        now: DateTime<Utc>,
    ) -> ReviewReport {
        let blacklist = self.effective_blacklist(blacklist);
        let collaborators = self.collaborators();

        let detected =
            detect_workbook_anomalies(workbook, collaborators, &blacklist, &self.thresholds);
        let anomalies = merge_preflight_anomalies(&detected, preflight);
        log::debug!(
            "Detected {} anomalies ({} after preflight merge) across {} sheets",
            detected.anomaly_count(),
            anomalies.anomaly_count(),
            workbook.sheets.len()
        );

        let sheets = workbook
            .sheets
            .iter()
            .map(|sheet| self.evaluate_sheet(sheet, signals, &anomalies, now))
            .collect();

        ReviewReport {
            generated_at: now,
            sheets,
        }
    }

    fn evaluate_sheet(
        &self,
        sheet: &Sheet,
        signals: &SignalMaps,
        anomalies: &AnomalyMap,
        now: DateTime<Utc>,
    ) -> SheetReport {
        if sheet.headers.len() < 2 {
            log::debug!(
                "Sheet '{}' has {} headers; no contract or editable columns",
                sheet.name,
                sheet.headers.len()
            );
        }

        let sheet_anomalies = anomalies.for_sheet(&sheet.name);
        let attention = compute_sheet_attention(sheet, signals, &sheet_anomalies);
        let rows: Vec<RowReport> = attention
            .into_iter()
            .enumerate()
            .map(|(row_index, attention)| {
                let row_status = signals.row_status(&sheet.name, row_index);
                RowReport {
                    row_index,
                    row_status,
                    review: derive_review_status_at(&attention, row_status, now),
                    sort_priority: attention.sort_priority(row_status),
                    attention,
                }
            })
            .collect();

        let statuses: Vec<RowReviewStatus> = rows.iter().map(|r| r.review.clone()).collect();
        let analytics = compute_sheet_analytics(sheet, signals, &sheet_anomalies, Some(&statuses));

        log::debug!(
            "Sheet '{}': {} rows, {} blocking",
            sheet.name,
            rows.len(),
            analytics.blocking_pending_count.unwrap_or(0)
        );

        SheetReport {
            sheet_name: sheet.name.clone(),
            fill_profile: profile_sheet(sheet, self.na.as_ref()),
            anomalies: sheet_anomalies,
            rows,
            analytics,
        }
    }
}

/// Build an engine whose glossary merges configured entries with extra ones
/// (e.g. shipped alongside a snapshot). Configured entries win on conflict.
pub fn engine_with_extra_glossary(
    config: &ReviewmapConfig,
    extra: Vec<GlossaryEntry>,
) -> ReviewEngine {
    let mut entries = config.glossary.clone().unwrap_or_default();
    entries.extend(extra);
    ReviewEngine::from_config(config).with_glossary(StaticGlossary::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::{MatchMode, PreflightCategory};
    use crate::core::{AnomalyType, FieldStatus};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn workbook() -> Workbook {
        Workbook::new(vec![Sheet::from_positional(
            "Leases",
            ["File", "ContractURL", "Amount", "State"],
            vec![
                vec!["a.pdf", "http://a", "100", "CA"],
                vec!["b.pdf", "http://b", "200", "XX"],
                vec!["c.pdf", "http://c", "300", "NY"],
            ],
        )])
    }

    fn engine() -> ReviewEngine {
        ReviewEngine::default().with_glossary(StaticGlossary::new(vec![
            GlossaryEntry::new("State").with_allowed_values(["CA", "NY"]),
        ]))
    }

    #[test]
    fn test_evaluate_links_all_phases() {
        let signals = SignalMaps::new()
            .with_field_status("Leases", 0, "Amount", FieldStatus::Rfi)
            .with_row_status("Leases", 2, RowStatus::Complete);
        let preflight = vec![PreflightRecord::failed(
            "Leases",
            2,
            "ContractURL",
            PreflightCategory::NotApplicable,
        )];
        let report = engine().evaluate_at(&workbook(), &signals, &[], &preflight, now());
        let sheet = report.sheet("Leases").unwrap();

        assert_eq!(sheet.rows[0].review.reason, ReviewReason::RfiRequired);
        assert_eq!(sheet.rows[1].review.reason, ReviewReason::AnomalyDetected);
        assert!(sheet.anomalies.has_type("Leases", 1, "State", AnomalyType::InvalidAllowedValue));
        assert_eq!(sheet.rows[2].review.reason, ReviewReason::DocumentNotApplicable);
        assert_eq!(sheet.rows[2].attention.category, AttentionCategory::ContractNotApplicable);
        assert_eq!(sheet.analytics.completed_rows, 1);
        assert_eq!(report.blocking_rows(), 3);
    }

    #[test]
    fn test_evaluate_at_is_deterministic() {
        let signals = SignalMaps::new().with_rfi_comment("Leases", 1, "State", "typo?");
        let blacklist = vec![BlacklistEntry::global("b", "200", MatchMode::Exact)];
        let a = engine().evaluate_at(&workbook(), &signals, &blacklist, &[], now());
        let b = engine().evaluate_at(&workbook(), &signals, &blacklist, &[], now());
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_review_queue_orders_by_priority() {
        let signals = SignalMaps::new()
            .with_row_status("Leases", 0, RowStatus::Complete)
            .with_field_status("Leases", 2, "Amount", FieldStatus::Rfi);
        let report = engine().evaluate_at(&workbook(), &signals, &[], &[], now());
        let queue: Vec<_> = report.sheets[0]
            .review_queue()
            .iter()
            .map(|r| r.row_index)
            .collect();
        assert_eq!(queue, vec![2, 1, 0]);
    }

    #[test]
    fn test_configured_blacklist_applies() {
        let config = ReviewmapConfig {
            blacklist: Some(vec![BlacklistEntry::global("cfg", "ca", MatchMode::Exact)]),
            ..Default::default()
        };
        let report = ReviewEngine::from_config(&config).evaluate_at(
            &workbook(),
            &SignalMaps::new(),
            &[],
            &[],
            now(),
        );
        assert!(report.sheets[0]
            .anomalies
            .has_type("Leases", 0, "State", AnomalyType::BlacklistHit));
    }

    #[test]
    fn test_extra_glossary_entries_are_used() {
        let engine = engine_with_extra_glossary(
            &ReviewmapConfig::default(),
            vec![GlossaryEntry::new("State").with_allowed_values(["TX"])],
        );
        let report = engine.evaluate_at(&workbook(), &SignalMaps::new(), &[], &[], now());
        assert_eq!(report.total_anomalies(), 3);
    }

    #[test]
    fn test_empty_workbook() {
        let report = engine().evaluate_at(&Workbook::default(), &SignalMaps::new(), &[], &[], now());
        assert!(report.sheets.is_empty());
        assert_eq!(report.total_rows(), 0);
    }
}

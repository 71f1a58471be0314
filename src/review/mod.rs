//! Review-reason derivation.
//!
//! A row's review reason is a pure function of its attention counts and its
//! completion status. Nothing is stored between calls: a `finalized` row is
//! reclassified the moment a blocking signal reappears.

use crate::attention::{AttentionCounts, RowAttentionResult};
use crate::core::RowStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    DocumentNotApplicable,
    ManualPdfReviewRequired,
    ManualDataReviewRequired,
    BlacklistHit,
    RfiRequired,
    AnomalyDetected,
    Finalized,
    ReadyToFinalize,
}

impl ReviewReason {
    pub const ALL: [ReviewReason; 8] = [
        ReviewReason::DocumentNotApplicable,
        ReviewReason::ManualPdfReviewRequired,
        ReviewReason::ManualDataReviewRequired,
        ReviewReason::BlacklistHit,
        ReviewReason::RfiRequired,
        ReviewReason::AnomalyDetected,
        ReviewReason::Finalized,
        ReviewReason::ReadyToFinalize,
    ];

    pub fn is_blocking(&self) -> bool {
        !matches!(self, ReviewReason::Finalized | ReviewReason::ReadyToFinalize)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewReason::DocumentNotApplicable => "document_not_applicable",
            ReviewReason::ManualPdfReviewRequired => "manual_pdf_review_required",
            ReviewReason::ManualDataReviewRequired => "manual_data_review_required",
            ReviewReason::BlacklistHit => "blacklist_hit",
            ReviewReason::RfiRequired => "rfi_required",
            ReviewReason::AnomalyDetected => "anomaly_detected",
            ReviewReason::Finalized => "finalized",
            ReviewReason::ReadyToFinalize => "ready_to_finalize",
        }
    }
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ReasonRule {
    pub reason: ReviewReason,
    pub applies: fn(&AttentionCounts, RowStatus) -> bool,
    pub details: fn(&AttentionCounts) -> String,
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Review-reason precedence, first match wins. The last rule always applies.
pub const REASON_RULES: &[ReasonRule] = &[
    ReasonRule {
        reason: ReviewReason::DocumentNotApplicable,
        applies: |c, _| c.not_applicable > 0,
        details: |c| {
            format!(
                "{} flagged as not applicable",
                plural(c.not_applicable, "document")
            )
        },
    },
    ReasonRule {
        reason: ReviewReason::ManualPdfReviewRequired,
        applies: |c, _| c.contract_error > 0 || c.unreadable_text > 0,
        details: |c| {
            format!(
                "{} and {}",
                plural(c.contract_error, "load error"),
                plural(c.unreadable_text, "unreadable document")
            )
        },
    },
    ReasonRule {
        reason: ReviewReason::ManualDataReviewRequired,
        applies: |c, _| c.extraction_suspect > 0,
        details: |c| format!("{} with suspect extraction", plural(c.extraction_suspect, "field")),
    },
    ReasonRule {
        reason: ReviewReason::BlacklistHit,
        applies: |c, _| c.blacklist_hit > 0,
        details: |c| format!("{} matching the blacklist", plural(c.blacklist_hit, "field")),
    },
    ReasonRule {
        reason: ReviewReason::RfiRequired,
        applies: |c, _| c.rfi > 0,
        details: |c| format!("{} with open RFI", plural(c.rfi, "field")),
    },
    ReasonRule {
        reason: ReviewReason::AnomalyDetected,
        applies: |c, _| c.anomaly > 0,
        details: |c| format!("{} with anomalies", plural(c.anomaly, "field")),
    },
    ReasonRule {
        reason: ReviewReason::Finalized,
        applies: |_, status| status.is_complete(),
        details: |_| "Row marked complete with no blocking issues".to_string(),
    },
    ReasonRule {
        reason: ReviewReason::ReadyToFinalize,
        applies: |_, _| true,
        details: |_| "No blocking issues".to_string(),
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReviewStatus {
    pub reason: ReviewReason,
    pub is_blocking: bool,
    pub derived_at: DateTime<Utc>,
    pub details: String,
}

/// First rule in [`REASON_RULES`] that applies.
pub fn classify_reason(counts: &AttentionCounts, row_status: RowStatus) -> &'static ReasonRule {
    REASON_RULES
        .iter()
        .find(|rule| (rule.applies)(counts, row_status))
        .unwrap_or(&REASON_RULES[REASON_RULES.len() - 1])
}

pub fn derive_review_status(attention: &RowAttentionResult, row_status: RowStatus) -> RowReviewStatus {
    derive_review_status_at(attention, row_status, Utc::now())
}

/// Same as [`derive_review_status`] with an explicit clock.
pub fn derive_review_status_at(
    attention: &RowAttentionResult,
    row_status: RowStatus,
    now: DateTime<Utc>,
) -> RowReviewStatus {
    let rule = classify_reason(&attention.counts, row_status);
    RowReviewStatus {
        reason: rule.reason,
        is_blocking: rule.reason.is_blocking(),
        derived_at: now,
        details: (rule.details)(&attention.counts),
    }
}

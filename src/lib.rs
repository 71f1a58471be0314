//! Row and field review-state derivation for extracted spreadsheets.
//!
//! Given a parsed workbook and the reviewer-driven signal maps around it,
//! reviewmap derives which cells are anomalous, which rows need attention
//! (and in what order), why each row is blocked from finalization, and how far
//! each sheet has progressed. Every derivation is a pure function of its
//! inputs.

// Export modules for library usage
pub mod analytics;
pub mod anomaly;
pub mod attention;
pub mod cli;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod memo;
pub mod pipeline;
pub mod profile;
pub mod review;

// Re-export commonly used types
pub use crate::core::{
    Anomaly, AnomalyMap, AnomalyType, CellKey, CellValue, FieldStatus, ModificationRecord,
    ModificationType, Row, RowStatus, Sheet, SignalMaps, Workbook,
};

pub use crate::anomaly::{
    detect_field_anomalies, detect_sheet_anomalies, detect_workbook_anomalies, match_blacklist,
    merge_preflight_anomalies, BlacklistEntry, BlacklistScope, FieldRules, MatchMode,
    PreflightCategory, PreflightRecord,
};

pub use crate::attention::{
    compute_field_attention, compute_row_attention, compute_sheet_attention, sort_priority,
    AttentionCategory, AttentionCounts, FieldAttentionResult, RowAttentionResult,
};

pub use crate::review::{derive_review_status, derive_review_status_at, ReviewReason, RowReviewStatus};

pub use crate::analytics::{compute_sheet_analytics, SheetAnalytics};

pub use crate::profile::{profile_sheet, FieldFillRate, FillRateProfile};

pub use crate::pipeline::{ReviewEngine, ReviewReport, RowReport, SheetReport};

pub use crate::memo::{InputFingerprint, Memo};

pub use crate::config::{DetectionThresholds, ReviewmapConfig};

pub use crate::errors::ReviewmapError;

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub mod blacklist;
pub mod detector;
pub mod preflight;

pub use blacklist::{match_blacklist, normalize_for_match, BlacklistEntry, BlacklistScope, MatchMode};
pub use detector::{
    build_field_rules, detect_field_anomalies, detect_sheet_anomalies, detect_workbook_anomalies,
    FieldRules,
};
pub use preflight::{merge_preflight_anomalies, PreflightCategory, PreflightRecord};

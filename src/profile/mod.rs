//! Per-sheet field statistics feeding the missing-value rule.

pub mod fill_rate;

pub use fill_rate::{profile_sheet, FieldFillRate, FillRateProfile};

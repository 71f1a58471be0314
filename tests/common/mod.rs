//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use reviewmap::collaborators::{GlossaryEntry, StaticGlossary};
use reviewmap::{CellValue, ReviewEngine, Sheet};

pub const SHEET: &str = "Leases";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

/// `[File, ContractURL, Amount, State]` with `rows` data rows. Every row has
/// an amount and a valid state.
pub fn lease_sheet(rows: usize) -> Sheet {
    let data = (0..rows)
        .map(|i| {
            vec![
                CellValue::text(format!("lease-{i}.pdf")),
                CellValue::text(format!("http://x/lease-{i}.pdf")),
                CellValue::Number(1000.0 + i as f64),
                CellValue::text(if i % 2 == 0 { "CA" } else { "NY" }),
            ]
        })
        .collect::<Vec<_>>();
    Sheet::from_positional(SHEET, ["File", "ContractURL", "Amount", "State"], data)
}

pub fn state_glossary() -> StaticGlossary {
    StaticGlossary::new(vec![
        GlossaryEntry::new("State").with_allowed_values(["CA", "NY"])
    ])
}

pub fn engine() -> ReviewEngine {
    ReviewEngine::default().with_glossary(state_glossary())
}

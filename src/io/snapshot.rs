//! Review snapshots: everything the engine reads, in one JSON document.

use crate::anomaly::{BlacklistEntry, PreflightRecord};
use crate::collaborators::GlossaryEntry;
use crate::core::{SignalMaps, Workbook};
use crate::errors::{Result, ReviewmapError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub workbook: Workbook,
    #[serde(default)]
    pub signals: SignalMaps,
    #[serde(default)]
    pub blacklist: Vec<BlacklistEntry>,
    #[serde(default)]
    pub preflight: Vec<PreflightRecord>,
    #[serde(default)]
    pub glossary: Vec<GlossaryEntry>,
}

impl ReviewSnapshot {
    /// Reject snapshots the engine cannot address unambiguously.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for sheet in &self.workbook.sheets {
            if !seen.insert(sheet.name.as_str()) {
                return Err(ReviewmapError::validation(format!(
                    "duplicate sheet name '{}'",
                    sheet.name
                )));
            }
            let mut headers = BTreeSet::new();
            if let Some(dup) = sheet.headers.iter().find(|h| !headers.insert(h.as_str())) {
                return Err(ReviewmapError::validation(format!(
                    "sheet '{}' repeats header '{}'",
                    sheet.name, dup
                )));
            }
        }
        Ok(())
    }
}

pub fn parse_snapshot(contents: &str) -> Result<ReviewSnapshot> {
    let snapshot: ReviewSnapshot = serde_json::from_str(contents)?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<ReviewSnapshot> {
    let contents = super::read_file(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = parse_snapshot(&contents)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;
    log::info!(
        "Loaded snapshot {} ({} sheets, {} blacklist entries, {} preflight records)",
        path.display(),
        snapshot.workbook.sheets.len(),
        snapshot.blacklist.len(),
        snapshot.preflight.len()
    );
    Ok(snapshot)
}

//! Attention categories and their precedence.
//!
//! When several issues compete for a row's single category slot, the first
//! rule in [`CATEGORY_RULES`] that applies wins. Urgency order: an open
//! question to the reviewer, then document failures, then data-quality
//! anomalies, then cosmetic edit flags.

use super::row::AttentionCounts;
use crate::core::RowStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionCategory {
    Rfi,
    ContractError,
    ContractTextUnreadable,
    ContractExtractionSuspect,
    ContractNotApplicable,
    BlacklistHit,
    Anomaly,
    IncompleteAddress,
    ManualEditUnreviewed,
    #[default]
    None,
}

impl AttentionCategory {
    pub const ALL: [AttentionCategory; 10] = [
        AttentionCategory::Rfi,
        AttentionCategory::ContractError,
        AttentionCategory::ContractTextUnreadable,
        AttentionCategory::ContractExtractionSuspect,
        AttentionCategory::ContractNotApplicable,
        AttentionCategory::BlacklistHit,
        AttentionCategory::Anomaly,
        AttentionCategory::IncompleteAddress,
        AttentionCategory::ManualEditUnreviewed,
        AttentionCategory::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttentionCategory::Rfi => "rfi",
            AttentionCategory::ContractError => "contract_error",
            AttentionCategory::ContractTextUnreadable => "contract_text_unreadable",
            AttentionCategory::ContractExtractionSuspect => "contract_extraction_suspect",
            AttentionCategory::ContractNotApplicable => "contract_not_applicable",
            AttentionCategory::BlacklistHit => "blacklist_hit",
            AttentionCategory::Anomaly => "anomaly",
            AttentionCategory::IncompleteAddress => "incomplete_address",
            AttentionCategory::ManualEditUnreviewed => "manual_edit_unreviewed",
            AttentionCategory::None => "none",
        }
    }

    /// Get label for display
    pub fn label(&self) -> &'static str {
        match self {
            AttentionCategory::Rfi => "Open RFI",
            AttentionCategory::ContractError => "Contract failed to load",
            AttentionCategory::ContractTextUnreadable => "Contract text unreadable",
            AttentionCategory::ContractExtractionSuspect => "Extraction suspect",
            AttentionCategory::ContractNotApplicable => "Contract not applicable",
            AttentionCategory::BlacklistHit => "Blacklist hit",
            AttentionCategory::Anomaly => "Anomaly",
            AttentionCategory::IncompleteAddress => "Incomplete address",
            AttentionCategory::ManualEditUnreviewed => "Manual edit",
            AttentionCategory::None => "Clean",
        }
    }
}

impl fmt::Display for AttentionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the precedence table.
pub struct CategoryRule {
    pub category: AttentionCategory,
    pub applies: fn(&AttentionCounts) -> bool,
    /// Sort rank; lower sorts first.
    pub rank: u8,
}

/// Category precedence, first match wins.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: AttentionCategory::Rfi,
        applies: |c| c.rfi > 0,
        rank: 0,
    },
    CategoryRule {
        category: AttentionCategory::ContractError,
        applies: |c| c.contract_error > 0,
        rank: 1,
    },
    CategoryRule {
        category: AttentionCategory::ContractTextUnreadable,
        applies: |c| c.unreadable_text > 0,
        rank: 2,
    },
    CategoryRule {
        category: AttentionCategory::ContractExtractionSuspect,
        applies: |c| c.extraction_suspect > 0,
        rank: 3,
    },
    CategoryRule {
        category: AttentionCategory::ContractNotApplicable,
        applies: |c| c.not_applicable > 0,
        rank: 4,
    },
    CategoryRule {
        category: AttentionCategory::BlacklistHit,
        applies: |c| c.blacklist_hit > 0,
        rank: 5,
    },
    CategoryRule {
        category: AttentionCategory::Anomaly,
        applies: |c| c.anomaly > 0,
        rank: 6,
    },
    CategoryRule {
        category: AttentionCategory::IncompleteAddress,
        applies: |c| c.incomplete_address > 0,
        rank: 7,
    },
    CategoryRule {
        category: AttentionCategory::ManualEditUnreviewed,
        applies: |c| c.manual_edit > 0,
        rank: 8,
    },
];

/// Rank for rows with no attention category that are not yet complete.
pub const RANK_CLEAN_INCOMPLETE: u8 = 10;
/// Rank for rows with no attention category that reviewers marked complete.
pub const RANK_FINALIZED: u8 = 20;

/// Pick the highest-precedence category with a non-zero count.
pub fn classify_category(counts: &AttentionCounts) -> AttentionCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.applies)(counts))
        .map(|rule| rule.category)
        .unwrap_or(AttentionCategory::None)
}

/// Stable list-ordering rank for a row. Callers break ties with their own
/// secondary key.
pub fn sort_priority(category: AttentionCategory, row_status: RowStatus) -> u8 {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.category == category)
        .map(|rule| rule.rank)
        .unwrap_or(if row_status.is_complete() {
            RANK_FINALIZED
        } else {
            RANK_CLEAN_INCOMPLETE
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_counts_are_none() {
        assert_eq!(
            classify_category(&AttentionCounts::default()),
            AttentionCategory::None
        );
    }

    #[test]
    fn test_rfi_beats_blacklist() {
        let counts = AttentionCounts {
            rfi: 1,
            blacklist_hit: 1,
            anomaly: 1,
            ..Default::default()
        };
        assert_eq!(classify_category(&counts), AttentionCategory::Rfi);
    }

    #[test]
    fn test_contract_categories_in_order() {
        let counts = AttentionCounts {
            unreadable_text: 1,
            not_applicable: 2,
            ..Default::default()
        };
        assert_eq!(
            classify_category(&counts),
            AttentionCategory::ContractTextUnreadable
        );
    }

    #[test]
    fn test_manual_edit_is_last_resort() {
        let counts = AttentionCounts {
            manual_edit: 3,
            ..Default::default()
        };
        assert_eq!(
            classify_category(&counts),
            AttentionCategory::ManualEditUnreviewed
        );
        let counts = AttentionCounts {
            manual_edit: 3,
            incomplete_address: 1,
            ..Default::default()
        };
        assert_eq!(classify_category(&counts), AttentionCategory::IncompleteAddress);
    }

    #[test]
    fn test_table_order_matches_enum_order() {
        let table: Vec<_> = CATEGORY_RULES.iter().map(|r| r.category).collect();
        let mut sorted = table.clone();
        sorted.sort();
        assert_eq!(table, sorted);
        assert_eq!(table.len(), AttentionCategory::ALL.len() - 1);
    }

    #[test]
    fn test_sort_priority_ranks() {
        assert_eq!(sort_priority(AttentionCategory::Rfi, RowStatus::Incomplete), 0);
        assert_eq!(
            sort_priority(AttentionCategory::ManualEditUnreviewed, RowStatus::Complete),
            8
        );
        assert_eq!(sort_priority(AttentionCategory::None, RowStatus::Incomplete), 10);
        assert_eq!(sort_priority(AttentionCategory::None, RowStatus::Complete), 20);
    }
}

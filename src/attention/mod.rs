//! Attention aggregation: which cells and rows a reviewer has to look at,
//! and in what order.

pub mod category;
pub mod field;
pub mod row;

pub use category::{
    classify_category, sort_priority, AttentionCategory, CategoryRule, CATEGORY_RULES,
    RANK_CLEAN_INCOMPLETE, RANK_FINALIZED,
};
pub use field::{compute_field_attention, FieldAttentionResult};
pub use row::{compute_row_attention, compute_sheet_attention, AttentionCounts, RowAttentionResult};

//! Seams for the heuristics the engine delegates to.
//!
//! The glossary matcher, the canonical-NA recognizer and the allowed-value
//! filter all live outside the review-state core. Each one is a trait so the
//! surrounding application can swap its own heuristic in; the default
//! implementations here are driven by `.reviewmap.toml`.

pub mod allowed_values;
pub mod glossary;
pub mod na;

use crate::core::CellValue;

pub use allowed_values::PlaceholderFilter;
pub use glossary::{GlossaryEntry, GlossaryMatch, InputType, StaticGlossary};
pub use na::TokenNaRecognizer;

/// Maps a raw column header to its glossary definition.
///
/// Must be deterministic for a given header. "No match" is a normal result and
/// simply means the field has no allowed-value rule.
pub trait GlossaryMatcher {
    fn match_field(&self, header: &str) -> GlossaryMatch;
}

/// Recognizes values that mean "intentionally not applicable".
pub trait NaRecognizer {
    fn is_canonical_na(&self, value: &CellValue) -> bool;
}

/// Cleans a raw glossary allowed-value list before comparison.
///
/// Implementations must be total and keep first-seen order.
pub trait AllowedValueFilter {
    fn filter(&self, raw: &[String]) -> Vec<String>;
}

/// The three delegates bundled together, borrowed for one computation.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub glossary: &'a dyn GlossaryMatcher,
    pub na: &'a dyn NaRecognizer,
    pub allowed_values: &'a dyn AllowedValueFilter,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        glossary: &'a dyn GlossaryMatcher,
        na: &'a dyn NaRecognizer,
        allowed_values: &'a dyn AllowedValueFilter,
    ) -> Self {
        Self {
            glossary,
            na,
            allowed_values,
        }
    }
}

use super::core::{AllowedValueConfig, ReviewmapConfig};
use super::thresholds::DetectionThresholds;
use crate::anomaly::BlacklistEntry;
use crate::collaborators::{PlaceholderFilter, StaticGlossary, TokenNaRecognizer};

impl ReviewmapConfig {
    /// Detection thresholds (with defaults if not configured)
    pub fn detection_thresholds(&self) -> DetectionThresholds {
        self.thresholds.unwrap_or_default()
    }

    /// NA recognizer built from the configured token set
    pub fn na_recognizer(&self) -> TokenNaRecognizer {
        TokenNaRecognizer::new(self.na_tokens())
    }

    pub fn allowed_value_filter(&self) -> PlaceholderFilter {
        let AllowedValueConfig {
            placeholder_tokens,
            max_single_value_len,
        } = self.allowed_values.clone().unwrap_or_default();
        PlaceholderFilter::new(placeholder_tokens, max_single_value_len)
    }

    pub fn glossary(&self) -> StaticGlossary {
        StaticGlossary::new(self.glossary.clone().unwrap_or_default())
    }

    pub fn blacklist_entries(&self) -> Vec<BlacklistEntry> {
        self.blacklist.clone().unwrap_or_default()
    }

    pub fn na_tokens(&self) -> Vec<String> {
        self.na.clone().unwrap_or_default().tokens
    }
}

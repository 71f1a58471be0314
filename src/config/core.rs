use serde::{Deserialize, Serialize};

use super::thresholds::DetectionThresholds;
use crate::anomaly::BlacklistEntry;
use crate::collaborators::allowed_values::{
    DEFAULT_MAX_SINGLE_VALUE_LEN, DEFAULT_PLACEHOLDER_TOKENS,
};
use crate::collaborators::na::DEFAULT_NA_TOKENS;
use crate::collaborators::GlossaryEntry;
use crate::io::OutputFormat;

/// Root configuration structure for reviewmap
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReviewmapConfig {
    /// Missing-value detection thresholds
    #[serde(default)]
    pub thresholds: Option<DetectionThresholds>,

    /// Allowed-value list cleanup
    #[serde(default)]
    pub allowed_values: Option<AllowedValueConfig>,

    /// Canonical "not applicable" tokens
    #[serde(default)]
    pub na: Option<NaConfig>,

    /// Glossary definitions used by the default glossary matcher
    #[serde(default)]
    pub glossary: Option<Vec<GlossaryEntry>>,

    /// Blacklist entries applied to every sheet
    #[serde(default)]
    pub blacklist: Option<Vec<BlacklistEntry>>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedValueConfig {
    #[serde(default = "default_placeholder_tokens")]
    pub placeholder_tokens: Vec<String>,

    /// Allowed values longer than this are treated as encoded lists
    #[serde(default = "default_max_single_value_len")]
    pub max_single_value_len: usize,
}

impl Default for AllowedValueConfig {
    fn default() -> Self {
        Self {
            placeholder_tokens: default_placeholder_tokens(),
            max_single_value_len: default_max_single_value_len(),
        }
    }
}

fn default_placeholder_tokens() -> Vec<String> {
    DEFAULT_PLACEHOLDER_TOKENS
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn default_max_single_value_len() -> usize {
    DEFAULT_MAX_SINGLE_VALUE_LEN
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaConfig {
    #[serde(default = "default_na_tokens")]
    pub tokens: Vec<String>,
}

impl Default for NaConfig {
    fn default() -> Self {
        Self {
            tokens: default_na_tokens(),
        }
    }
}

fn default_na_tokens() -> Vec<String> {
    DEFAULT_NA_TOKENS.iter().map(|t| t.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    #[serde(default)]
    pub default_format: Option<OutputFormat>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

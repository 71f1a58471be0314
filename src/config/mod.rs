mod accessors;
mod core;
mod loader;
mod thresholds;

pub use core::{AllowedValueConfig, NaConfig, OutputConfig, ReviewmapConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use thresholds::DetectionThresholds;

/// Default contents written by `reviewmap init`
pub fn default_config_toml() -> String {
    let config = ReviewmapConfig {
        thresholds: Some(DetectionThresholds::default()),
        allowed_values: Some(AllowedValueConfig::default()),
        na: Some(NaConfig::default()),
        glossary: None,
        blacklist: None,
        output: None,
    };
    toml::to_string_pretty(&config).unwrap_or_default()
}

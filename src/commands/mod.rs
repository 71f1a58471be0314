//! CLI command implementations.
//!
//! - **analyze**: evaluate a review snapshot and write a report
//! - **init**: write a default `.reviewmap.toml`

pub mod analyze;
pub mod init;

pub use analyze::{analyze_snapshot, handle_analyze, AnalyzeConfig};
pub use init::{init_config, init_config_in};

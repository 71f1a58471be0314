use crate::config::{self, DetectionThresholds, ReviewmapConfig};
use crate::io::{self, create_writer, OutputFormat};
use crate::pipeline::{engine_with_extra_glossary, ReviewReport};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub snapshot: PathBuf,
    pub config: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub sheet: Option<String>,
    pub thresholds: Option<DetectionThresholds>,
    pub no_color: bool,
}

pub fn handle_analyze(options: AnalyzeConfig) -> Result<()> {
    let config = resolve_config(options.config.as_ref())?;
    configure_color(&config, options.no_color, options.output.is_some());

    let report = analyze_snapshot(&options, &config)?;
    let format = options
        .format
        .or_else(|| config.output.as_ref().and_then(|o| o.default_format))
        .unwrap_or_default();

    let out: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout()),
    };
    create_writer(format, out).write_report(&report)?;

    if let Some(path) = &options.output {
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

fn resolve_config(path: Option<&PathBuf>) -> Result<ReviewmapConfig> {
    match path {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// Explicit `--no-color` wins, then the config file; file output is never
/// colored.
fn configure_color(config: &ReviewmapConfig, no_color: bool, to_file: bool) {
    let configured = config.output.as_ref().and_then(|o| o.use_color);
    if no_color || to_file || configured == Some(false) {
        colored::control::set_override(false);
    } else if configured == Some(true) {
        colored::control::set_override(true);
    }
}

/// Load the snapshot and run the engine over it.
pub fn analyze_snapshot(options: &AnalyzeConfig, config: &ReviewmapConfig) -> Result<ReviewReport> {
    let snapshot = io::load_snapshot(&options.snapshot)?;

    let mut engine = engine_with_extra_glossary(config, snapshot.glossary.clone());
    if let Some(thresholds) = options.thresholds {
        engine = engine.with_thresholds(thresholds);
    }

    let mut report = engine.evaluate(
        &snapshot.workbook,
        &snapshot.signals,
        &snapshot.blacklist,
        &snapshot.preflight,
    );

    if let Some(name) = &options.sheet {
        if report.sheet(name).is_none() {
            anyhow::bail!(
                "Sheet '{}' not found in snapshot (available: {})",
                name,
                snapshot.workbook.sheet_names().collect::<Vec<_>>().join(", ")
            );
        }
        report.retain_sheet(name);
    }

    log::info!(
        "Analyzed {} rows across {} sheets: {} blocking, {} anomalies",
        report.total_rows(),
        report.sheets.len(),
        report.blocking_rows(),
        report.total_anomalies()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{
                "workbook": {"sheets": [{
                    "name": "S",
                    "headers": ["File", "URL", "State"],
                    "rows": [{"File": "a", "URL": "u", "State": "ZZ"}]
                }]},
                "glossary": [{"header": "State", "allowed_values": ["CA"]}]
            }"#,
        )
        .unwrap();
        path
    }

    fn options(snapshot: PathBuf) -> AnalyzeConfig {
        AnalyzeConfig {
            snapshot,
            config: None,
            format: Some(OutputFormat::Json),
            output: None,
            sheet: None,
            thresholds: None,
            no_color: true,
        }
    }

    #[test]
    fn test_snapshot_glossary_is_applied() {
        let dir = TempDir::new().unwrap();
        let report =
            analyze_snapshot(&options(write_snapshot(&dir)), &ReviewmapConfig::default()).unwrap();
        assert_eq!(report.total_anomalies(), 1);
        assert_eq!(report.blocking_rows(), 1);
    }

    #[test]
    fn test_unknown_sheet_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(write_snapshot(&dir));
        opts.sheet = Some("Missing".into());
        let err = analyze_snapshot(&opts, &ReviewmapConfig::default()).unwrap_err();
        assert!(err.to_string().contains("available: S"));
    }

    #[test]
    fn test_handle_analyze_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(write_snapshot(&dir));
        let out = dir.path().join("report.json");
        opts.output = Some(out.clone());
        opts.config = Some(dir.path().join("absent.toml"));
        assert!(handle_analyze(opts).is_err());

        let mut opts = options(write_snapshot(&dir));
        opts.output = Some(out.clone());
        handle_analyze(opts).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(parsed["sheets"][0]["sheet_name"], "S");
    }
}

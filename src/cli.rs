use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThresholdPreset {
    /// Flag fewer gaps: larger samples and near-perfect fill required
    Strict,
    /// Default thresholds (10 rows, 90% fill)
    Balanced,
    /// Flag gaps on small sheets and moderately filled fields
    Lenient,
}

impl From<ThresholdPreset> for crate::config::DetectionThresholds {
    fn from(preset: ThresholdPreset) -> Self {
        match preset {
            ThresholdPreset::Strict => Self::strict(),
            ThresholdPreset::Balanced => Self::balanced(),
            ThresholdPreset::Lenient => Self::lenient(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "reviewmap")]
#[command(about = "Row and field review-state analyzer for extracted spreadsheets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive anomalies, attention and review status for a snapshot
    Analyze {
        /// Snapshot JSON (workbook, signals, blacklist, preflight, glossary)
        snapshot: PathBuf,

        /// Configuration file (defaults to the nearest .reviewmap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only report the named sheet
        #[arg(long)]
        sheet: Option<String>,

        /// Missing-value threshold preset; overrides the config file
        #[arg(long = "threshold-preset", value_enum)]
        threshold_preset: Option<ThresholdPreset>,

        /// Disable colored output
        #[arg(long = "no-color")]
        no_color: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .reviewmap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionThresholds;

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Json),
            crate::io::output::OutputFormat::Json
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Markdown),
            crate::io::output::OutputFormat::Markdown
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Terminal),
            crate::io::output::OutputFormat::Terminal
        );
    }

    #[test]
    fn test_threshold_preset_conversion() {
        assert_eq!(
            DetectionThresholds::from(ThresholdPreset::Balanced),
            DetectionThresholds::default()
        );
        assert!(
            DetectionThresholds::from(ThresholdPreset::Strict).min_rows_for_fill_rate
                > DetectionThresholds::from(ThresholdPreset::Lenient).min_rows_for_fill_rate
        );
    }

    #[test]
    fn test_parse_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "reviewmap",
            "analyze",
            "snap.json",
            "--format",
            "json",
            "--sheet",
            "Leases",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                snapshot,
                format,
                sheet,
                verbosity,
                ..
            } => {
                assert_eq!(snapshot, PathBuf::from("snap.json"));
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(sheet.as_deref(), Some("Leases"));
                assert_eq!(verbosity, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

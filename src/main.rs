use anyhow::Result;
use clap::Parser;
use reviewmap::cli::{Cli, Commands};
use reviewmap::commands::{self, AnalyzeConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            snapshot,
            config,
            format,
            output,
            sheet,
            threshold_preset,
            no_color,
            verbosity,
        } => {
            init_logging(verbosity);
            commands::handle_analyze(AnalyzeConfig {
                snapshot,
                config,
                format: format.map(Into::into),
                output,
                sheet,
                thresholds: threshold_preset.map(Into::into),
                no_color,
            })
        }
        Commands::Init { force } => {
            init_logging(0);
            commands::init_config(force)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step
/// from `warn`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.try_init();
}

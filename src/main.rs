use clap::Parser;
use tracing_subscriber::EnvFilter;

use field_analyzer::cli::commands::{cmd_analyze, emit_report};
use field_analyzer::cli::config::{Cli, load_config};

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = load_config(cli.config.as_deref());
    let report = cmd_analyze(&cli, &config)?;
    emit_report(&report, cli.output.as_deref())?;

    Ok(())
}

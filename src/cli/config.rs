use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analyzer::analyzer_config::AnalyzerConfig;
use crate::snapshot::session::BrowserConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "field-analyzer",
    version,
    about = "Read-only analyzer of the forms and fields a web page expects"
)]
pub struct Cli {
    /// URL to analyze
    #[arg(long, required_unless_present = "snapshot")]
    pub url: Option<String>,

    /// Analyze a saved snapshot JSON file instead of loading a URL
    #[arg(long, conflicts_with = "url")]
    pub snapshot: Option<String>,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Run the browser in visible mode
    #[arg(long)]
    pub no_headless: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Path to config file (default: field-analyzer.yaml in current dir)
    #[arg(long)]
    pub config: Option<String>,

    /// Save the captured snapshot to this file for later replay
    #[arg(long)]
    pub save_snapshot: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "field-analyzer.yaml";

/// Optional YAML config file: `field-analyzer.yaml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Load config from a YAML file. Returns defaults if the file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            if path.is_some() {
                warn!("could not read config file '{}': {}; using defaults", config_path, e);
            }
            return AppConfig::default();
        }
    };

    match serde_yaml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("invalid config file '{}': {}; using defaults", config_path, e);
            AppConfig::default()
        }
    }
}

/// Merge CLI flags over the file config.
pub fn resolve_browser_config(cli: &Cli, config: &AppConfig) -> BrowserConfig {
    BrowserConfig {
        headless: config.browser.headless && !cli.no_headless,
        ..config.browser.clone()
    }
}

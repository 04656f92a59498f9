use tracing::info;

use crate::analyzer::pipeline::Analyzer;
use crate::cli::config::{AppConfig, Cli, resolve_browser_config};
use crate::error::{AnalyzerError, Result};
use crate::report::console::format_console_report;
use crate::report::report_model::PageReport;
use crate::snapshot::provider::{
    BrowserSnapshotProvider, FileSnapshotProvider, SnapshotProvider, save_snapshot,
};
use crate::snapshot::session::BrowserSession;
use crate::snapshot::snapshot_model::PageSnapshot;

/// Accept only URLs a browser can load without guessing.
pub fn validate_url(url: &str) -> Result<()> {
    let ok = ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| url.starts_with(scheme));
    if ok {
        Ok(())
    } else {
        Err(AnalyzerError::SnapshotUnavailable {
            reason: format!("invalid URL '{}': must start with http://, https:// or file://", url),
        })
    }
}

fn capture(cli: &Cli, config: &AppConfig) -> Result<PageSnapshot> {
    if let Some(path) = cli.snapshot.as_deref() {
        info!(path, "replaying saved snapshot");
        return FileSnapshotProvider::new(path)
            .get_snapshot()
            .map_err(AnalyzerError::into_snapshot_unavailable);
    }

    let url = cli.url.as_deref().ok_or_else(|| AnalyzerError::SnapshotUnavailable {
        reason: "no --url or --snapshot given".into(),
    })?;
    validate_url(url)?;

    let browser = resolve_browser_config(cli, config);
    let mut session =
        BrowserSession::launch(&browser).map_err(AnalyzerError::into_snapshot_unavailable)?;
    let snapshot = BrowserSnapshotProvider::new(&mut session, url)
        .get_snapshot()
        .map_err(AnalyzerError::into_snapshot_unavailable);
    session.quit()?;
    snapshot
}

/// Capture (or replay) one snapshot and run the pipeline over it.
pub fn cmd_analyze(cli: &Cli, config: &AppConfig) -> Result<PageReport> {
    let snapshot = capture(cli, config)?;

    if let Some(path) = cli.save_snapshot.as_deref() {
        save_snapshot(&snapshot, path)?;
        info!(path, "snapshot saved");
    }

    let analyzer = Analyzer::new(config.analyzer.clone());
    Ok(analyzer.analyze_timed(&snapshot))
}

/// Print the summary and JSON report; also write the JSON to `output` when given.
pub fn emit_report(report: &PageReport, output: Option<&str>) -> Result<()> {
    let json = report.to_json_pretty()?;

    print!("{}", format_console_report(report));
    println!("{}", json);

    if let Some(path) = output {
        std::fs::write(path, &json)?;
        info!(path, "report saved");
    }
    Ok(())
}

//! Read-only analysis of the input a rendered web page expects from a human.
//!
//! A [`PageSnapshot`] goes through a fixed pipeline:
//! extract → normalize → (filter) → group → classify fields → classify form purpose →
//! classify page, and comes back as a [`PageReport`]. The pipeline is pure and total:
//! only failing to obtain a snapshot at all is an error.

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod report;
pub mod snapshot;

pub use analyzer::analyzer_config::AnalyzerConfig;
pub use analyzer::pipeline::Analyzer;
pub use error::{AnalyzerError, Result};
pub use report::report_model::{Classification, Field, Form, PageReport, Purpose, SelectOption, SubmitElement};
pub use snapshot::provider::SnapshotProvider;
pub use snapshot::snapshot_model::{BoundingBox, PageSnapshot, SnapshotNode};

/// Analyze a snapshot with the default configuration.
pub fn analyze_snapshot(snapshot: &PageSnapshot) -> PageReport {
    Analyzer::default().analyze(snapshot)
}

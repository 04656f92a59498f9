use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::analyzer::analyzer_config::AnalyzerConfig;
use crate::analyzer::extractor::extract;
use crate::analyzer::field_classifier::{FormContext, classify_field, into_field};
use crate::analyzer::filter::{DropReason, filter_fields};
use crate::analyzer::grouper::group;
use crate::analyzer::normalizer::normalize;
use crate::analyzer::page_type::classify_page;
use crate::analyzer::purpose::classify_purpose;
use crate::analyzer::rules::RuleSet;
use crate::error::{AnalyzerError, Result};
use crate::report::report_model::{Form, PageReport};
use crate::snapshot::provider::SnapshotProvider;
use crate::snapshot::snapshot_model::PageSnapshot;

/// The classification pipeline: snapshot in, report out.
///
/// Holds only immutable configuration, so one `Analyzer` can be shared across threads
/// and the same snapshot always yields the same report.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    rules: RuleSet,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            rules: RuleSet::default(),
        }
    }

    pub fn with_rules(config: AnalyzerConfig, rules: RuleSet) -> Self {
        Self { config, rules }
    }

    /// Pull one snapshot from the collaborator and analyze it.
    ///
    /// Provider failures are the only errors, and always come back as `SnapshotUnavailable`.
    pub fn analyze_with(&self, provider: &mut dyn SnapshotProvider) -> Result<PageReport> {
        let snapshot = provider
            .get_snapshot()
            .map_err(AnalyzerError::into_snapshot_unavailable)?;
        Ok(self.analyze_timed(&snapshot))
    }

    /// `analyze`, with the run's start time and duration stamped on the report.
    pub fn analyze_timed(&self, snapshot: &PageSnapshot) -> PageReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let report = self.analyze(snapshot);
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(duration_ms, "analysis finished");
        report.with_timing(started_at, duration_ms)
    }

    /// Total over any snapshot: an empty or unrecognizable page still yields a report.
    /// Carries no timing, so the same snapshot always gives an identical report.
    pub fn analyze(&self, snapshot: &PageSnapshot) -> PageReport {
        let mut notes = Vec::new();

        let extraction = extract(&snapshot.root);
        info!(
            nodes = extraction.nodes_visited,
            elements_extracted = extraction.elements.len(),
            forms_seen = extraction.forms.len(),
            "extracted"
        );
        if !extraction.malformed.is_empty() {
            warn!(count = extraction.malformed.len(), "skipped malformed nodes");
            notes.push(format!("skipped {} malformed element(s)", extraction.malformed.len()));
        }

        let normalized = normalize(&extraction, &self.config);
        info!(
            fields_normalized = normalized.fields.len(),
            controls = normalized.controls.len(),
            "normalized"
        );

        let filtered = filter_fields(normalized.fields, &self.config);
        if !filtered.dropped.is_empty() {
            let disabled = filtered
                .dropped
                .iter()
                .filter(|(_, r)| *r == DropReason::Disabled)
                .count();
            let tracking = filtered.dropped.len() - disabled;
            notes.push(format!(
                "filtered {} field(s): {} disabled, {} tracking",
                filtered.dropped.len(),
                disabled,
                tracking
            ));
        }

        let groups = group(&filtered.kept, &normalized.controls, &extraction.forms, &self.config);
        info!(forms_detected = groups.len(), "grouped");

        let forms: Vec<Form> = groups
            .into_iter()
            .filter_map(|g| {
                let ctx = FormContext {
                    form_id: &g.form_id,
                    kind: g.kind,
                };
                let fields: Vec<_> = g
                    .fields
                    .into_iter()
                    .map(|candidate| {
                        let classification =
                            classify_field(&candidate, &ctx, &self.config, &self.rules.field_rules);
                        into_field(candidate, classification)
                    })
                    .collect();
                let purpose = classify_purpose(
                    &fields,
                    g.submit.is_some(),
                    &self.config,
                    &self.rules.purpose_rules,
                );
                Form::new(g.form_id, fields, g.submit, purpose, g.notes)
            })
            .collect();

        let page_type = classify_page(&forms);
        let report = PageReport::assemble(&snapshot.url, &snapshot.title, page_type, forms, notes);

        info!(
            page_type = %report.page_type(),
            total_forms = report.total_forms(),
            total_fields = report.total_fields(),
            total_required = report.total_required(),
            "page classified"
        );
        report
    }
}

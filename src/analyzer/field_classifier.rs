use tracing::debug;

use crate::analyzer::analyzer_config::AnalyzerConfig;
use crate::analyzer::element_model::FieldCandidate;
use crate::analyzer::grouper::GroupKind;
use crate::analyzer::rules::{DEFAULT_CLASSIFICATION, FieldRule};
use crate::report::report_model::{Classification, Field};

/// The form a field is being classified in.
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    pub form_id: &'a str,
    pub kind: GroupKind,
}

/// Name of the first rule that fires, if any.
pub fn matching_rule<'r>(
    field: &FieldCandidate,
    config: &AnalyzerConfig,
    rules: &'r [FieldRule],
) -> Option<&'r FieldRule> {
    rules.iter().find(|rule| (rule.matches)(field, config))
}

/// First-rule-wins classification. Total: no rule firing means the default.
pub fn classify_field(
    field: &FieldCandidate,
    ctx: &FormContext<'_>,
    config: &AnalyzerConfig,
    rules: &[FieldRule],
) -> Classification {
    match matching_rule(field, config, rules) {
        Some(rule) => {
            debug!(form = ctx.form_id, kind = ?ctx.kind, field = %field.selector, rule = rule.name, "classified");
            rule.outcome
        }
        None => {
            debug!(form = ctx.form_id, kind = ?ctx.kind, field = %field.selector, rule = "default", "classified");
            DEFAULT_CLASSIFICATION
        }
    }
}

/// Freeze a candidate into a report field.
pub fn into_field(candidate: FieldCandidate, classification: Classification) -> Field {
    Field {
        tag_name: candidate.tag_name,
        input_type: candidate.input_type,
        name: candidate.name,
        label: candidate.label,
        classification,
        visible: candidate.visible,
        selector: candidate.selector,
        placeholder: candidate.placeholder,
        autocomplete: candidate.autocomplete,
        readonly: candidate.readonly,
        max_length: candidate.max_length,
        options: candidate.options,
        element_id: candidate.element_id,
        name_attr: candidate.name_attr,
    }
}

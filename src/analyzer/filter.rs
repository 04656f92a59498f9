use tracing::debug;

use crate::analyzer::analyzer_config::{AnalyzerConfig, matches_any};
use crate::analyzer::element_model::FieldCandidate;

/// Why the filter stage dropped a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Disabled,
    Tracking,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub kept: Vec<FieldCandidate>,
    pub dropped: Vec<(FieldCandidate, DropReason)>,
}

fn is_token(field: &FieldCandidate, config: &AnalyzerConfig) -> bool {
    matches_any(&field.identifiers(), &config.lexicons.token_patterns)
}

pub fn drop_reason(field: &FieldCandidate, config: &AnalyzerConfig) -> Option<DropReason> {
    // Hidden tokens (CSRF, session) always survive.
    if field.input_type == "hidden" && is_token(field, config) {
        return None;
    }
    if config.filter.drop_disabled && field.disabled {
        return Some(DropReason::Disabled);
    }
    if config.filter.drop_tracking
        && matches_any(&field.identifiers(), &config.lexicons.tracking_patterns)
    {
        return Some(DropReason::Tracking);
    }
    None
}

/// Apply the configured filter policy. With the default policy every field is kept.
pub fn filter_fields(fields: Vec<FieldCandidate>, config: &AnalyzerConfig) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for field in fields {
        match drop_reason(&field, config) {
            Some(reason) => {
                debug!(selector = %field.selector, ?reason, "filtered");
                outcome.dropped.push((field, reason));
            }
            None => outcome.kept.push(field),
        }
    }
    outcome
}

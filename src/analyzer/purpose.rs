use tracing::debug;

use crate::analyzer::analyzer_config::{AnalyzerConfig, Thresholds, matches_any};
use crate::analyzer::rules::PurposeRule;
use crate::report::report_model::{Classification, Field, Purpose};

/// Field-type counts a form's purpose is inferred from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurposeSignature {
    pub password_count: usize,
    pub identity_count: usize,
    pub text_count: usize,
    pub dropdown_count: usize,
    pub has_confirm_password: bool,
    pub has_submit: bool,
}

impl PurposeSignature {
    /// Count over non-hidden fields only; hidden tokens say nothing about purpose.
    pub fn of(fields: &[Field], has_submit: bool, config: &AnalyzerConfig) -> Self {
        let mut sig = PurposeSignature {
            has_submit,
            ..Default::default()
        };
        let mut confirm_seen = false;

        for field in fields.iter().filter(|f| f.classification != Classification::Hidden) {
            if field.is_password() {
                sig.password_count += 1;
                if matches_any(&field.search_text(), &config.lexicons.confirm_keywords) {
                    confirm_seen = true;
                }
            } else if is_identity(field, config) {
                sig.identity_count += 1;
            } else if matches!(field.input_type.as_str(), "text" | "search") {
                sig.text_count += 1;
            } else if field.input_type == "select" {
                sig.dropdown_count += 1;
            }
        }

        sig.has_confirm_password =
            sig.password_count >= config.thresholds.signup_min_passwords && confirm_seen;
        sig
    }

    /// Independent hints that each point at some purpose.
    pub fn partial_signals(&self) -> usize {
        [
            self.password_count > 0,
            self.identity_count > 0,
            self.text_count > 0,
            self.dropdown_count > 0,
        ]
        .iter()
        .filter(|s| **s)
        .count()
    }
}

pub fn is_identity(field: &Field, config: &AnalyzerConfig) -> bool {
    if field.input_type == "email" {
        return true;
    }
    let ids = [
        field.name_attr.as_deref(),
        field.element_id.as_deref(),
        field.autocomplete.as_deref(),
    ]
    .iter()
    .flatten()
    .copied()
    .collect::<Vec<_>>()
    .join(" ");
    matches_any(&ids, &config.lexicons.identity_patterns)
}

/// First matching purpose rule, otherwise mixed when several partial signals fired, else unknown.
pub fn classify_signature(
    sig: &PurposeSignature,
    thresholds: &Thresholds,
    rules: &[PurposeRule],
) -> Purpose {
    if let Some(rule) = rules.iter().find(|r| (r.matches)(sig, thresholds)) {
        return rule.outcome;
    }
    if sig.partial_signals() > 1 {
        Purpose::Mixed
    } else {
        Purpose::Unknown
    }
}

pub fn classify_purpose(
    fields: &[Field],
    has_submit: bool,
    config: &AnalyzerConfig,
    rules: &[PurposeRule],
) -> Purpose {
    let sig = PurposeSignature::of(fields, has_submit, config);
    let purpose = classify_signature(&sig, &config.thresholds, rules);
    debug!(?sig, %purpose, "form purpose");
    purpose
}

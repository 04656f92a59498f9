use crate::analyzer::analyzer_config::{AnalyzerConfig, Thresholds, matches_any};
use crate::analyzer::element_model::FieldCandidate;
use crate::analyzer::purpose::PurposeSignature;
use crate::report::report_model::{Classification, Purpose};

// ============================================================================
// Ordered first-match-wins rule tables
// ============================================================================

/// One row of the field classification table.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub matches: fn(&FieldCandidate, &AnalyzerConfig) -> bool,
    pub outcome: Classification,
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldRule({} => {})", self.name, self.outcome)
    }
}

/// One row of the form purpose table.
#[derive(Clone, Copy)]
pub struct PurposeRule {
    pub name: &'static str,
    pub matches: fn(&PurposeSignature, &Thresholds) -> bool,
    pub outcome: Purpose,
}

impl std::fmt::Debug for PurposeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PurposeRule({} => {})", self.name, self.outcome)
    }
}

fn is_hidden(field: &FieldCandidate, _: &AnalyzerConfig) -> bool {
    field.input_type == "hidden" || !field.visible
}

fn has_required_attr(field: &FieldCandidate, _: &AnalyzerConfig) -> bool {
    field.required_attr
}

fn is_password(field: &FieldCandidate, _: &AnalyzerConfig) -> bool {
    field.input_type == "password"
}

fn matches_required_pattern(field: &FieldCandidate, config: &AnalyzerConfig) -> bool {
    matches_any(&field.identifiers(), &config.lexicons.required_patterns)
}

fn is_filter_control(field: &FieldCandidate, _: &AnalyzerConfig) -> bool {
    matches!(field.input_type.as_str(), "checkbox" | "radio" | "select") && !field.required_attr
}

pub const DEFAULT_FIELD_RULES: &[FieldRule] = &[
    FieldRule { name: "hidden", matches: is_hidden, outcome: Classification::Hidden },
    FieldRule { name: "required-attribute", matches: has_required_attr, outcome: Classification::Required },
    FieldRule { name: "password", matches: is_password, outcome: Classification::Required },
    FieldRule { name: "required-pattern", matches: matches_required_pattern, outcome: Classification::Required },
    FieldRule { name: "filter-control", matches: is_filter_control, outcome: Classification::Optional },
];

/// Used when no field rule fires.
pub const DEFAULT_CLASSIFICATION: Classification = Classification::Optional;

fn is_login(sig: &PurposeSignature, _: &Thresholds) -> bool {
    sig.password_count == 1 && sig.identity_count > 0
}

fn is_signup(sig: &PurposeSignature, t: &Thresholds) -> bool {
    sig.password_count >= t.signup_min_passwords && sig.has_confirm_password
}

fn is_search(sig: &PurposeSignature, _: &Thresholds) -> bool {
    sig.text_count == 1 && sig.password_count == 0 && sig.has_submit
}

fn is_listing(sig: &PurposeSignature, t: &Thresholds) -> bool {
    sig.dropdown_count >= t.listing_min_dropdowns && sig.password_count == 0 && sig.text_count == 0
}

pub const DEFAULT_PURPOSE_RULES: &[PurposeRule] = &[
    PurposeRule { name: "login", matches: is_login, outcome: Purpose::Login },
    PurposeRule { name: "signup", matches: is_signup, outcome: Purpose::Signup },
    PurposeRule { name: "search", matches: is_search, outcome: Purpose::Search },
    PurposeRule { name: "listing", matches: is_listing, outcome: Purpose::Listing },
];

/// The rule tables an `Analyzer` runs with.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub field_rules: Vec<FieldRule>,
    pub purpose_rules: Vec<PurposeRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            field_rules: DEFAULT_FIELD_RULES.to_vec(),
            purpose_rules: DEFAULT_PURPOSE_RULES.to_vec(),
        }
    }
}

use serde::{Deserialize, Serialize};

// ============================================================================
// Immutable analyzer configuration: lexicons, thresholds, filter policy
// ============================================================================

/// Everything tunable about the classification pipeline.
///
/// Built once and shared by reference; nothing in the pipeline mutates it, so several
/// analyses with different configurations can run side by side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub lexicons: Lexicons,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub filter: FilterPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicons {
    /// name/id fragments that make a field required
    #[serde(default = "default_required_patterns")]
    pub required_patterns: Vec<String>,

    /// name/id fragments that mark an identity field (email, username)
    #[serde(default = "default_identity_patterns")]
    pub identity_patterns: Vec<String>,

    /// Words on a clickable control that suggest it submits the form
    #[serde(default = "default_submit_keywords")]
    pub submit_keywords: Vec<String>,

    /// Words that mark the second password of a signup form
    #[serde(default = "default_confirm_keywords")]
    pub confirm_keywords: Vec<String>,

    /// name/id fragments of analytics inputs, used only when `filter.drop_tracking` is set
    #[serde(default = "default_tracking_patterns")]
    pub tracking_patterns: Vec<String>,

    /// name/id fragments of hidden tokens that the filter stage must keep
    #[serde(default = "default_token_patterns")]
    pub token_patterns: Vec<String>,
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            required_patterns: default_required_patterns(),
            identity_patterns: default_identity_patterns(),
            submit_keywords: default_submit_keywords(),
            confirm_keywords: default_confirm_keywords(),
            tracking_patterns: default_tracking_patterns(),
            token_patterns: default_token_patterns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Boxes narrower or shorter than this (px) count as not rendered
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f64,

    #[serde(default = "default_two")]
    pub signup_min_passwords: usize,

    #[serde(default = "default_two")]
    pub listing_min_dropdowns: usize,

    /// How many ancestor levels above a field's container a virtual-form submit may sit
    #[serde(default = "default_one")]
    pub max_sibling_separation: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_box_size: default_min_box_size(),
            signup_min_passwords: 2,
            listing_min_dropdowns: 2,
            max_sibling_separation: 1,
        }
    }
}

/// Optional post-normalization filter. Off by default: every observed input is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterPolicy {
    #[serde(default)]
    pub drop_disabled: bool,
    #[serde(default)]
    pub drop_tracking: bool,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_required_patterns() -> Vec<String> {
    words(&["email", "username", "user", "login", "password", "phone", "pwd", "signin"])
}

fn default_identity_patterns() -> Vec<String> {
    words(&["email", "username", "user", "login"])
}

fn default_submit_keywords() -> Vec<String> {
    words(&[
        "login", "log in", "sign in", "signin", "sign up", "register", "search", "submit",
        "continue", "next", "send", "subscribe",
    ])
}

fn default_confirm_keywords() -> Vec<String> {
    words(&["confirm", "repeat", "retype", "verify", "again"])
}

fn default_tracking_patterns() -> Vec<String> {
    words(&["gtm", "analytics", "tracking", "pixel", "utm_", "_ga", "fbclid"])
}

fn default_token_patterns() -> Vec<String> {
    words(&["csrf", "token", "session", "authenticity", "nonce"])
}

fn default_min_box_size() -> f64 { 1.0 }
fn default_two() -> usize { 2 }
fn default_one() -> usize { 1 }

/// Case-insensitive substring match of `haystack` against any pattern.
pub fn matches_any(haystack: &str, patterns: &[String]) -> bool {
    let lower = haystack.to_lowercase();
    patterns
        .iter()
        .any(|p| !p.is_empty() && lower.contains(&p.to_lowercase()))
}

/// Case-insensitive whole-word match: "sign in" matches "Sign in now" but "go" does not match "google".
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    let text = text.to_lowercase();
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(offset) = text[start..].find(&keyword) {
        let begin = start + offset;
        let end = begin + keyword.len();
        let before_ok = text[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + text[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

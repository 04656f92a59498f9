use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::analyzer::analyzer_config::AnalyzerConfig;
use crate::analyzer::element_model::{Control, FieldCandidate, NormalizedElement, RawElement};
use crate::analyzer::extractor::Extraction;

const CONTROL_INPUT_TYPES: &[&str] = &["submit", "button", "reset", "image"];
const NATIVE_FIELD_TAGS: &[&str] = &["input", "textarea", "select"];

/// Normalizer output, split into fields and submit-capable controls, both in document order.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub fields: Vec<FieldCandidate>,
    pub controls: Vec<Control>,
}

/// Buttons and button-like inputs become controls; everything else is a field.
pub fn is_control(el: &RawElement) -> bool {
    if el.tag == "button" {
        return true;
    }
    if el.tag == "input" {
        return el
            .explicit_type()
            .map(|t| CONTROL_INPUT_TYPES.contains(&t.as_str()))
            .unwrap_or(false);
    }
    !NATIVE_FIELD_TAGS.contains(&el.tag.as_str()) && el.role().as_deref() == Some("button")
}

pub fn resolve_input_type(el: &RawElement) -> String {
    if let Some(t) = el.explicit_type() {
        return t;
    }
    match el.tag.as_str() {
        "input" => "text".to_string(),
        "textarea" => "textarea".to_string(),
        "select" => "select".to_string(),
        other => match el.role().as_deref() {
            Some("textbox") => "text".to_string(),
            Some("checkbox") => "checkbox".to_string(),
            Some("radio") => "radio".to_string(),
            Some("combobox") => "select".to_string(),
            _ => other.to_string(),
        },
    }
}

/// Text of the nodes named by `aria-labelledby`, joined in attribute order.
fn labelledby_text(el: &RawElement, texts_by_id: &HashMap<String, String>) -> Option<String> {
    let parts: Vec<&str> = el
        .attr("aria-labelledby")?
        .split_whitespace()
        .filter_map(|id| texts_by_id.get(id).map(String::as_str))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// `<label for>`, enclosing `<label>`, `aria-labelledby`, `aria-label`, `placeholder`;
/// first non-empty wins.
pub fn resolve_label(el: &RawElement, extraction: &Extraction) -> Option<String> {
    let for_label = el
        .attr("id")
        .and_then(|id| extraction.labels_for.get(id))
        .map(String::as_str);
    let labelledby = labelledby_text(el, &extraction.texts_by_id);

    [
        for_label,
        el.context.enclosing_label.as_deref(),
        labelledby.as_deref(),
        el.attr("aria-label"),
        el.attr("placeholder"),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .map(str::to_string)
}

pub fn is_visible(el: &RawElement, input_type: &str, config: &AnalyzerConfig) -> bool {
    let rendered = el
        .bounding_box
        .map(|b| !b.is_degenerate(config.thresholds.min_box_size))
        .unwrap_or(false);
    rendered && el.computed_visible && input_type != "hidden"
}

fn is_css_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Preferred selector before de-duplication: name, then id, then the positional path.
pub fn base_selector(el: &RawElement) -> String {
    if let Some(name) = el.attr("name") {
        return format!("{}[name=\"{}\"]", el.tag, escape_attr(name));
    }
    if let Some(id) = el.attr("id") {
        if is_css_identifier(id) {
            return format!("#{}", id);
        }
        return format!("{}[id=\"{}\"]", el.tag, escape_attr(id));
    }
    el.context.css_path.clone()
}

fn control_text(el: &RawElement) -> String {
    [el.text.as_deref(), el.attr("value"), el.attr("aria-label"), el.attr("title")]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Hands out selectors that are unique within one report.
#[derive(Debug, Default)]
pub struct SelectorRegistry {
    used: HashSet<String>,
    occurrences: HashMap<String, usize>,
}

impl SelectorRegistry {
    /// Returns `base` the first time; later collisions get a ` >> nth=N` suffix.
    pub fn claim(&mut self, base: String) -> String {
        let count = self.occurrences.entry(base.clone()).or_insert(0);
        let mut candidate = if *count == 0 {
            base.clone()
        } else {
            format!("{} >> nth={}", base, count)
        };
        while self.used.contains(&candidate) {
            *count += 1;
            candidate = format!("{} >> nth={}", base, count);
        }
        *count += 1;
        self.used.insert(candidate.clone());
        candidate
    }
}

fn normalize_field(
    el: &RawElement,
    extraction: &Extraction,
    registry: &mut SelectorRegistry,
    config: &AnalyzerConfig,
) -> FieldCandidate {
    let input_type = resolve_input_type(el);
    let name_attr = el.attr("name").map(str::to_string);
    let element_id = el.attr("id").map(str::to_string);
    let name = name_attr
        .clone()
        .or_else(|| element_id.clone())
        .unwrap_or_else(|| format!("{}_{}", el.tag, el.context.position));

    FieldCandidate {
        tag_name: el.tag.clone(),
        visible: is_visible(el, &input_type, config),
        selector: registry.claim(base_selector(el)),
        label: resolve_label(el, extraction),
        required_attr: el.has_attr("required") || el.attr("aria-required") == Some("true"),
        disabled: el.computed_disabled || el.has_attr("disabled"),
        placeholder: el.attr("placeholder").map(str::to_string),
        autocomplete: el.attr("autocomplete").map(str::to_lowercase),
        readonly: el.has_attr("readonly") || el.attr("aria-readonly") == Some("true"),
        max_length: el.attr("maxlength").and_then(|v| v.parse().ok()),
        options: el.options.clone(),
        input_type,
        name,
        name_attr,
        element_id,
        context: el.context.clone(),
    }
}

fn normalize_control(el: &RawElement) -> Control {
    Control {
        tag: el.tag.clone(),
        control_type: el.explicit_type(),
        text: control_text(el),
        disabled: el.computed_disabled || el.has_attr("disabled"),
        context: el.context.clone(),
    }
}

/// Map one raw element. Never fails: missing identifiers fall back to positional values.
pub fn normalize_element(
    el: &RawElement,
    extraction: &Extraction,
    registry: &mut SelectorRegistry,
    config: &AnalyzerConfig,
) -> NormalizedElement {
    if is_control(el) {
        NormalizedElement::Control(normalize_control(el))
    } else {
        NormalizedElement::Field(normalize_field(el, extraction, registry, config))
    }
}

pub fn normalize(extraction: &Extraction, config: &AnalyzerConfig) -> Normalized {
    let mut registry = SelectorRegistry::default();
    let mut out = Normalized::default();

    for el in &extraction.elements {
        match normalize_element(el, extraction, &mut registry, config) {
            NormalizedElement::Field(field) => {
                debug!(selector = %field.selector, input_type = %field.input_type, "field");
                out.fields.push(field);
            }
            NormalizedElement::Control(control) => {
                debug!(tag = %control.tag, text = %control.text, "control");
                out.controls.push(control);
            }
        }
    }

    out
}

use std::collections::HashSet;

use field_analyzer::analyzer::analyzer_config::AnalyzerConfig;
use field_analyzer::analyzer::extractor::extract;
use field_analyzer::analyzer::normalizer::{SelectorRegistry, normalize};
use field_analyzer::{BoundingBox, SnapshotNode};

use crate::common::builders::{button, div, el, form, hidden_input, input, named_input, page};

mod common;

fn normalized(children: Vec<SnapshotNode>) -> field_analyzer::analyzer::normalizer::Normalized {
    normalize(&extract(&page(children).root), &AnalyzerConfig::default())
}

#[test]
fn input_type_defaults_follow_the_tag() {
    let out = normalized(vec![
        el("input").with_attr("name", "a"),
        el("textarea").with_attr("name", "b"),
        el("select").with_attr("name", "c"),
        input("EMAIL").with_attr("name", "d"),
        el("div").with_attr("role", "textbox").with_attr("id", "e"),
        el("div").with_attr("role", "combobox").with_attr("id", "f"),
    ]);

    let types: Vec<_> = out.fields.iter().map(|f| f.input_type.as_str()).collect();
    assert_eq!(types, vec!["text", "textarea", "select", "email", "text", "select"]);
}

#[test]
fn buttons_become_controls_not_fields() {
    let out = normalized(vec![form(vec![
        named_input("text", "q"),
        button("Search"),
        input("submit").with_attr("value", "Go"),
        el("a").with_attr("role", "button").with_text("Next"),
        input("checkbox").with_attr("role", "button").with_attr("name", "odd"),
    ])]);

    assert_eq!(out.fields.len(), 2);
    assert_eq!(out.controls.len(), 3);
    assert_eq!(out.controls[1].text, "Go");
    assert_eq!(out.controls[1].control_type.as_deref(), Some("submit"));
    assert_eq!(out.controls[2].tag, "a");
}

#[test]
fn name_falls_back_to_id_then_position() {
    let out = normalized(vec![
        named_input("text", "by_name").with_attr("id", "ignored"),
        input("text").with_attr("id", "by_id"),
        input("text"),
    ]);

    let names: Vec<_> = out.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["by_name", "by_id", "input_2"]);
}

#[test]
fn label_priority_is_for_then_enclosing_then_aria_then_placeholder() {
    let out = normalized(vec![
        el("label").with_attr("for", "a").with_text("For label"),
        el("label").with_text("Wrapping label").with_child(
            input("text")
                .with_attr("id", "a")
                .with_attr("aria-label", "Aria")
                .with_attr("placeholder", "Placeholder"),
        ),
        el("label").with_text("Wrapping only").with_child(
            input("text").with_attr("aria-label", "Aria").with_attr("placeholder", "P"),
        ),
        input("text").with_attr("aria-label", " ").with_attr("placeholder", "Search here"),
        input("text"),
    ]);

    let labels: Vec<_> = out.fields.iter().map(|f| f.label.as_deref()).collect();
    assert_eq!(
        labels,
        vec![Some("For label"), Some("Wrapping only"), Some("Search here"), None]
    );
}

#[test]
fn visibility_needs_box_computed_flag_and_non_hidden_type() {
    let out = normalized(vec![
        named_input("text", "ok"),
        named_input("text", "tiny").with_box(BoundingBox::new(0.0, 0.0, 0.5, 20.0)),
        named_input("text", "no_box").with_box(BoundingBox::new(0.0, 0.0, 10.0, 10.0)).visible(false),
        SnapshotNode::new("input").with_attr("name", "unrendered").visible(true),
        named_input("hidden", "laid_out_hidden"),
        hidden_input("csrf"),
    ]);

    let visible: Vec<_> = out.fields.iter().map(|f| f.visible).collect();
    assert_eq!(visible, vec![true, false, false, false, false, false]);
}

#[test]
fn selectors_prefer_name_then_id_then_path() {
    let out = normalized(vec![
        named_input("text", "user").with_attr("id", "x"),
        input("text").with_attr("id", "plain-id"),
        input("text").with_attr("id", "1starts-with-digit"),
        div(vec![input("text")]),
    ]);

    let selectors: Vec<_> = out.fields.iter().map(|f| f.selector.as_str()).collect();
    assert_eq!(
        selectors,
        vec![
            "input[name=\"user\"]",
            "#plain-id",
            "input[id=\"1starts-with-digit\"]",
            "html > body:nth-child(1) > div:nth-child(4) > input:nth-child(1)",
        ]
    );
}

#[test]
fn colliding_names_get_running_index() {
    let out = normalized(vec![
        named_input("radio", "color"),
        named_input("radio", "color"),
        named_input("radio", "color"),
    ]);

    let selectors: Vec<_> = out.fields.iter().map(|f| f.selector.as_str()).collect();
    assert_eq!(
        selectors,
        vec![
            "input[name=\"color\"]",
            "input[name=\"color\"] >> nth=1",
            "input[name=\"color\"] >> nth=2",
        ]
    );
}

#[test]
fn registry_never_hands_out_a_selector_twice() {
    let mut registry = SelectorRegistry::default();
    let a = registry.claim("x >> nth=1".to_string());
    let b = registry.claim("x".to_string());
    let c = registry.claim("x".to_string());
    let d = registry.claim("x".to_string());

    let all: HashSet<_> = [&a, &b, &c, &d].into_iter().collect();
    assert_eq!(all.len(), 4);
    assert_eq!(c, "x >> nth=2");
    assert_eq!(d, "x >> nth=3");
}

#[test]
fn quotes_in_names_are_escaped() {
    let out = normalized(vec![named_input("text", "a\"b")]);
    assert_eq!(out.fields[0].selector, "input[name=\"a\\\"b\"]");
}

#[test]
fn required_and_disabled_flags_are_carried() {
    let out = normalized(vec![
        named_input("text", "a").with_attr("required", ""),
        named_input("text", "b").with_attr("aria-required", "true"),
        named_input("text", "c").disabled(true),
        named_input("text", "d").with_attr("disabled", ""),
    ]);

    let flags: Vec<_> = out.fields.iter().map(|f| (f.required_attr, f.disabled)).collect();
    assert_eq!(flags, vec![(true, false), (true, false), (false, true), (false, true)]);
}

#[test]
fn aria_labelledby_sits_between_enclosing_label_and_aria_label() {
    let out = normalized(vec![
        el("span").with_attr("id", "first").with_text("Billing"),
        el("span").with_attr("id", "second").with_text("email"),
        input("email")
            .with_attr("aria-labelledby", "first second")
            .with_attr("aria-label", "Aria"),
        input("text")
            .with_attr("aria-labelledby", "missing")
            .with_attr("aria-label", "Fallback"),
        el("label").with_text("Wrapping").with_child(
            input("text").with_attr("aria-labelledby", "first"),
        ),
    ]);

    let labels: Vec<_> = out.fields.iter().map(|f| f.label.as_deref()).collect();
    assert_eq!(labels, vec![Some("Billing email"), Some("Fallback"), Some("Wrapping")]);
}

#[test]
fn field_metadata_is_carried_over() {
    let out = normalized(vec![
        named_input("email", "email")
            .with_attr("placeholder", "you@example.com")
            .with_attr("autocomplete", "Username")
            .with_attr("maxlength", "120")
            .with_attr("readonly", ""),
        named_input("text", "code").with_attr("maxlength", "lots"),
    ]);

    let email = &out.fields[0];
    assert_eq!(email.placeholder.as_deref(), Some("you@example.com"));
    assert_eq!(email.autocomplete.as_deref(), Some("username"));
    assert_eq!(email.max_length, Some(120));
    assert!(email.readonly);

    let code = &out.fields[1];
    assert_eq!(code.max_length, None);
    assert!(!code.readonly);
    assert!(code.placeholder.is_none());
    assert!(code.options.is_empty());
}

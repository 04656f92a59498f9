use field_analyzer::analyzer::analyzer_config::AnalyzerConfig;
use field_analyzer::analyzer::extractor::extract;
use field_analyzer::analyzer::grouper::{
    FieldGroup, GroupKind, NOTE_NO_SUBMIT, find_submit, form_id_for, group,
};
use field_analyzer::analyzer::normalizer::normalize;
use field_analyzer::{PageSnapshot, SnapshotNode};

use crate::common::builders::{button, div, el, form, input, named_input, page};

mod common;

fn groups_of(snapshot: &PageSnapshot) -> Vec<FieldGroup> {
    groups_with(snapshot, &AnalyzerConfig::default())
}

fn groups_with(snapshot: &PageSnapshot, config: &AnalyzerConfig) -> Vec<FieldGroup> {
    let extraction = extract(&snapshot.root);
    let normalized = normalize(&extraction, config);
    group(&normalized.fields, &normalized.controls, &extraction.forms, config)
}

fn names(group: &FieldGroup) -> Vec<&str> {
    group.fields.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn fields_inside_a_form_share_one_group() {
    let snapshot = page(vec![form(vec![
        named_input("email", "email"),
        div(vec![named_input("password", "password")]),
        button("Sign In"),
    ])]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, GroupKind::Explicit);
    assert!(groups[0].form_id.starts_with("form_"));
    assert_eq!(groups[0].form_id.len(), "form_".len() + 8);
    assert_eq!(names(&groups[0]), vec!["email", "password"]);

    let submit = groups[0].submit.as_ref().expect("submit");
    assert_eq!(submit.tag, "button");
    assert_eq!(submit.control_type, "submit");
    assert_eq!(submit.text, "Sign In");
}

#[test]
fn form_ids_are_stable_across_runs() {
    let snapshot = page(vec![
        form(vec![named_input("text", "a")]).with_attr("id", "one"),
        form(vec![named_input("text", "b")]).with_attr("id", "two"),
    ]);

    let first: Vec<_> = groups_of(&snapshot).into_iter().map(|g| g.form_id).collect();
    let second: Vec<_> = groups_of(&snapshot.clone()).into_iter().map(|g| g.form_id).collect();

    assert_eq!(first, second);
    assert_ne!(first[0], first[1]);
}

#[test]
fn form_id_depends_on_structure_not_content() {
    let extraction = extract(&page(vec![form(vec![]).with_attr("id", "login")]).root);
    let same = extract(&page(vec![form(vec![named_input("text", "x")]).with_attr("id", "login")]).root);

    assert_eq!(form_id_for(&extraction.forms[0]), form_id_for(&same.forms[0]));
}

#[test]
fn submit_search_prefers_explicit_type_then_untyped_button_then_keyword() {
    let snapshot = page(vec![
        form(vec![
            named_input("text", "a"),
            el("div").with_attr("role", "button").with_text("Continue"),
            button("Untyped"),
            input("submit").with_attr("value", "Explicit"),
        ]),
        form(vec![
            named_input("text", "b"),
            el("div").with_attr("role", "button").with_text("Continue"),
            button("Untyped"),
        ]),
        form(vec![
            named_input("text", "c"),
            button("Cancel").with_attr("type", "button"),
            el("span").with_attr("role", "button").with_text("Next step"),
        ]),
        form(vec![
            named_input("text", "d"),
            button("Cancel").with_attr("type", "button"),
        ]),
    ]);

    let groups = groups_of(&snapshot);
    let texts: Vec<_> = groups
        .iter()
        .map(|g| g.submit.as_ref().map(|s| s.text.clone()))
        .collect();

    assert_eq!(
        texts,
        vec![
            Some("Explicit".to_string()),
            Some("Untyped".to_string()),
            Some("Next step".to_string()),
            None,
        ]
    );
    assert_eq!(groups[2].submit.as_ref().map(|s| s.control_type.as_str()), Some("button"));
    assert!(groups[3].notes.iter().any(|n| n == NOTE_NO_SUBMIT));
}

#[test]
fn disabled_controls_are_not_submit_candidates() {
    let extraction = extract(&page(vec![form(vec![
        input("submit").with_attr("value", "Send").disabled(true),
    ])]).root);
    let normalized = normalize(&extraction, &AnalyzerConfig::default());

    assert!(find_submit(&normalized.controls, &AnalyzerConfig::default()).is_none());
}

#[test]
fn keyword_match_needs_whole_words() {
    let extraction = extract(&page(vec![form(vec![
        el("a").with_attr("role", "button").with_text("Nextdoor deals"),
    ])]).root);
    let normalized = normalize(&extraction, &AnalyzerConfig::default());

    assert!(find_submit(&normalized.controls, &AnalyzerConfig::default()).is_none());
}

#[test]
fn orphans_with_nearby_submit_form_a_virtual_group() {
    let snapshot = page(vec![div(vec![
        named_input("text", "q"),
        named_input("checkbox", "exact"),
        button("Search"),
    ])]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, GroupKind::Virtual);
    assert!(groups[0].form_id.starts_with("virtual_"));
    assert_eq!(names(&groups[0]), vec!["q", "exact"]);
    assert_eq!(groups[0].submit.as_ref().map(|s| s.text.as_str()), Some("Search"));
}

#[test]
fn submit_one_sibling_level_away_is_accepted() {
    let snapshot = page(vec![div(vec![
        div(vec![named_input("text", "q")]),
        div(vec![button("Search")]),
    ])]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].submit.is_some());
}

#[test]
fn submit_two_levels_away_is_not_accepted() {
    let snapshot = page(vec![
        div(vec![div(vec![named_input("text", "q"), named_input("text", "r")])]),
        div(vec![div(vec![button("Search")])]),
    ]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.fields.len() == 1 && g.submit.is_none()));
}

#[test]
fn wider_separation_can_be_configured() {
    let snapshot = page(vec![
        div(vec![div(vec![named_input("text", "q"), named_input("text", "r")])]),
        div(vec![div(vec![button("Search")])]),
    ]);
    let mut config = AnalyzerConfig::default();
    config.thresholds.max_sibling_separation = 2;

    let groups = groups_with(&snapshot, &config);

    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups[0]), vec!["q", "r"]);
}

#[test]
fn orphans_without_submit_become_single_field_forms() {
    let snapshot = page(vec![div(vec![
        named_input("text", "a"),
        named_input("text", "b"),
    ])]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 2);
    assert_ne!(groups[0].form_id, groups[1].form_id);
    assert!(groups.iter().all(|g| g.submit.is_none()));
}

#[test]
fn every_field_lands_in_exactly_one_group_in_document_order() {
    let snapshot = page(vec![
        named_input("text", "lonely"),
        form(vec![named_input("text", "in_form"), button("Save")]),
        div(vec![named_input("text", "q"), button("Search")]),
        named_input("text", "late").with_attr("form", "f"),
        form(vec![]).with_attr("id", "f"),
    ]);

    let groups = groups_of(&snapshot);
    let all: Vec<_> = groups.iter().flat_map(|g| names(g)).collect();

    assert_eq!(all, vec!["lonely", "in_form", "q", "late"]);
    assert!(groups.iter().all(|g| !g.fields.is_empty()));
}

#[test]
fn form_controls_do_not_leak_into_virtual_groups() {
    let snapshot = page(vec![
        form(vec![button("Login")]),
        named_input("text", "orphan"),
    ]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, GroupKind::Virtual);
    assert!(groups[0].submit.is_none());
}

#[test]
fn root_level_field_is_its_own_container() {
    let snapshot = PageSnapshot::new("about:blank", SnapshotNode::new("input"));

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].fields.len(), 1);
}

#[test]
fn wrapped_orphans_share_the_submit_bearing_ancestor() {
    let snapshot = page(vec![div(vec![
        div(vec![named_input("email", "email")]),
        div(vec![named_input("password", "pw")]),
        button("Log in"),
    ])]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, GroupKind::Virtual);
    assert_eq!(names(&groups[0]), vec!["email", "pw"]);
    assert_eq!(groups[0].submit.as_ref().map(|s| s.text.as_str()), Some("Log in"));
}

#[test]
fn label_wrapped_orphans_form_one_group() {
    let snapshot = page(vec![
        el("label").with_text("Email").with_child(named_input("email", "email")),
        el("label").with_text("Password").with_child(named_input("password", "pw")),
        button("Sign in"),
    ]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups[0]), vec!["email", "pw"]);
}

#[test]
fn sibling_widgets_with_their_own_submit_stay_apart() {
    let snapshot = page(vec![
        div(vec![named_input("search", "q"), button("Search")]),
        div(vec![
            named_input("email", "email"),
            named_input("password", "pw"),
            button("Log in"),
        ]),
    ]);

    let groups = groups_of(&snapshot);

    assert_eq!(groups.len(), 2);
    assert_eq!(names(&groups[0]), vec!["q"]);
    assert_eq!(names(&groups[1]), vec!["email", "pw"]);
    assert_ne!(groups[0].form_id, groups[1].form_id);
}

use std::collections::BTreeMap;

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::analyzer::analyzer_config::{AnalyzerConfig, contains_keyword};
use crate::analyzer::element_model::{Control, FieldCandidate, FormNode, path_key};
use crate::report::report_model::SubmitElement;

pub const NOTE_NO_SUBMIT: &str = "no explicit submit control found";
pub const NOTE_VIRTUAL: &str = "virtual form: fields share no <form> ancestor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Fields owned by a real `<form>`
    Explicit,
    /// Orphaned fields grouped by container and a nearby submit control
    Virtual,
}

/// Fields that will become one report form, not yet classified.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub form_id: String,
    pub kind: GroupKind,
    pub fields: Vec<FieldCandidate>,
    pub submit: Option<SubmitElement>,
    pub notes: Vec<String>,
}

impl FieldGroup {
    fn first_position(&self) -> usize {
        self.fields
            .first()
            .map(|f| f.context.position)
            .unwrap_or(usize::MAX)
    }
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}

/// Stable id from the form node's position and identifying attributes.
pub fn form_id_for(form: &FormNode) -> String {
    let key = format!(
        "form|{}|{}|{}",
        path_key(&form.path),
        form.id_attr.as_deref().unwrap_or(""),
        form.name_attr.as_deref().unwrap_or("")
    );
    format!("form_{}", short_hash(&key))
}

pub fn virtual_form_id(anchor: &[usize]) -> String {
    format!("virtual_{}", short_hash(&format!("virtual|{}", path_key(anchor))))
}

fn submit_descriptor(control: &Control) -> SubmitElement {
    let control_type = control.control_type.clone().unwrap_or_else(|| {
        if control.tag == "button" || control.tag == "input" {
            "submit".to_string()
        } else {
            "button".to_string()
        }
    });

    SubmitElement {
        tag: control.tag.clone(),
        control_type,
        text: control.text.clone(),
    }
}

/// First match wins: `type="submit"`, then an untyped `<button>`, then any control whose text
/// carries a submit keyword. Disabled controls never qualify.
pub fn find_submit<'a>(
    controls: impl IntoIterator<Item = &'a Control>,
    config: &AnalyzerConfig,
) -> Option<SubmitElement> {
    let enabled: Vec<&Control> = controls.into_iter().filter(|c| !c.disabled).collect();

    let explicit = || {
        enabled
            .iter()
            .find(|c| c.control_type.as_deref() == Some("submit"))
    };
    let untyped_button = || {
        enabled
            .iter()
            .find(|c| c.tag == "button" && c.control_type.is_none())
    };
    let keyword = || {
        enabled.iter().find(|c| {
            config
                .lexicons
                .submit_keywords
                .iter()
                .any(|k| contains_keyword(&c.text, k))
        })
    };

    explicit()
        .or_else(untyped_button)
        .or_else(keyword)
        .map(|c| submit_descriptor(c))
}

fn within(path: &[usize], scope: &[usize]) -> bool {
    path.starts_with(scope)
}

/// Walk up from `container` at most `max_sibling_separation` levels and return the first
/// ancestor whose subtree holds a plausible submit, together with that submit.
fn submit_anchor(
    container: &[usize],
    orphan_controls: &[&Control],
    config: &AnalyzerConfig,
) -> Option<(Vec<usize>, SubmitElement)> {
    for level in 0..=config.thresholds.max_sibling_separation {
        if level > container.len() {
            break;
        }
        let scope = &container[..container.len() - level];
        let in_scope = orphan_controls
            .iter()
            .copied()
            .filter(|c| within(&c.context.path, scope));
        if let Some(submit) = find_submit(in_scope, config) {
            return Some((scope.to_vec(), submit));
        }
    }
    None
}

fn explicit_groups(
    fields: &[FieldCandidate],
    controls: &[Control],
    forms: &[FormNode],
    config: &AnalyzerConfig,
) -> Vec<FieldGroup> {
    let mut by_form: BTreeMap<usize, Vec<FieldCandidate>> = BTreeMap::new();
    for field in fields {
        if let Some(form) = field.context.form {
            by_form.entry(form).or_default().push(field.clone());
        }
    }

    by_form
        .into_iter()
        .filter_map(|(index, fields)| {
            let form = forms.get(index)?;
            let submit = find_submit(
                controls.iter().filter(|c| c.context.form == Some(index)),
                config,
            );
            let mut notes = Vec::new();
            if submit.is_none() {
                notes.push(NOTE_NO_SUBMIT.to_string());
            }
            Some(FieldGroup {
                form_id: form_id_for(form),
                kind: GroupKind::Explicit,
                fields,
                submit,
                notes,
            })
        })
        .collect()
}

fn virtual_groups(
    fields: &[FieldCandidate],
    controls: &[Control],
    config: &AnalyzerConfig,
) -> Vec<FieldGroup> {
    let orphan_controls: Vec<&Control> = controls.iter().filter(|c| c.context.form.is_none()).collect();

    // Fields whose containers reach the same submit-bearing ancestor form one group,
    // in order of first appearance.
    let mut anchored: Vec<(Vec<usize>, SubmitElement, Vec<FieldCandidate>)> = Vec::new();
    let mut groups = Vec::new();

    for field in fields.iter().filter(|f| f.context.form.is_none()) {
        match submit_anchor(field.context.container_path(), &orphan_controls, config) {
            Some((anchor, submit)) => match anchored.iter_mut().find(|(a, _, _)| *a == anchor) {
                Some((_, _, members)) => members.push(field.clone()),
                None => anchored.push((anchor, submit, vec![field.clone()])),
            },
            None => {
                // Never drop an observed input: an orphan with no submit in reach is its own form.
                groups.push(FieldGroup {
                    form_id: virtual_form_id(&field.context.path),
                    kind: GroupKind::Virtual,
                    fields: vec![field.clone()],
                    submit: None,
                    notes: vec![NOTE_VIRTUAL.to_string(), NOTE_NO_SUBMIT.to_string()],
                });
            }
        }
    }

    for (anchor, submit, members) in anchored {
        debug!(anchor = %path_key(&anchor), fields = members.len(), "virtual form");
        groups.push(FieldGroup {
            form_id: virtual_form_id(&anchor),
            kind: GroupKind::Virtual,
            fields: members,
            submit: Some(submit),
            notes: vec![NOTE_VIRTUAL.to_string()],
        });
    }
    groups
}

/// Partition fields into forms: real `<form>` ownership first, then virtual forms.
/// Every field lands in exactly one group; groups come back in document order.
pub fn group(
    fields: &[FieldCandidate],
    controls: &[Control],
    forms: &[FormNode],
    config: &AnalyzerConfig,
) -> Vec<FieldGroup> {
    let mut groups = explicit_groups(fields, controls, forms, config);
    groups.extend(virtual_groups(fields, controls, config));
    groups.sort_by_key(FieldGroup::first_position);
    groups
}

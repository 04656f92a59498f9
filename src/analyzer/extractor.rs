use std::collections::HashMap;

use tracing::debug;

use crate::analyzer::element_model::{ElementContext, FormNode, NodePath, RawElement, path_key};
use crate::error::MalformedElement;
use crate::report::report_model::SelectOption;
use crate::snapshot::snapshot_model::SnapshotNode;

const INTERACTIVE_TAGS: &[&str] = &["input", "textarea", "select", "button"];
const INTERACTIVE_ROLES: &[&str] = &["button", "textbox", "checkbox", "radio", "combobox"];

/// Everything the later stages need from one pass over the snapshot.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub elements: Vec<RawElement>,
    pub forms: Vec<FormNode>,
    /// `<label for=…>` text keyed by the `for` value
    pub labels_for: HashMap<String, String>,
    /// Text of every node carrying an `id`, for `aria-labelledby` lookups
    pub texts_by_id: HashMap<String, String>,
    pub nodes_visited: usize,
    pub malformed: Vec<MalformedElement>,
}

pub fn is_interactive(node: &SnapshotNode) -> bool {
    let tag = node.tag.trim().to_lowercase();
    if INTERACTIVE_TAGS.contains(&tag.as_str()) {
        return true;
    }
    node.non_empty_attr("role")
        .map(|r| INTERACTIVE_ROLES.contains(&r.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn check_node(node: &SnapshotNode, path: &[usize]) -> Result<(), MalformedElement> {
    let tag = node.tag.trim();
    if tag.is_empty() {
        return Err(MalformedElement {
            path: path_key(path),
            reason: "missing tag name".into(),
        });
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
    {
        return Err(MalformedElement {
            path: path_key(path),
            reason: format!("invalid tag name '{}'", tag),
        });
    }
    if let Some(b) = &node.bounding_box {
        if !b.is_finite() || b.width < 0.0 || b.height < 0.0 {
            return Err(MalformedElement {
                path: path_key(path),
                reason: "invalid bounding box".into(),
            });
        }
    }
    Ok(())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `<form>` or any element with `role="form"`.
pub fn is_form_container(node: &SnapshotNode) -> bool {
    node.tag.trim().eq_ignore_ascii_case("form")
        || node
            .non_empty_attr("role")
            .is_some_and(|r| r.eq_ignore_ascii_case("form"))
}

fn option_of(node: &SnapshotNode) -> SelectOption {
    let label = node
        .text
        .as_deref()
        .map(collapse_whitespace)
        .filter(|t| !t.is_empty())
        .or_else(|| node.non_empty_attr("label").map(str::to_string))
        .unwrap_or_default();
    let value = node
        .attr("value")
        .map(str::to_string)
        .unwrap_or_else(|| label.clone());
    SelectOption { label, value }
}

/// `<option>` children of a `<select>`, looking one level into `<optgroup>`.
pub fn select_options(node: &SnapshotNode) -> Vec<SelectOption> {
    let mut options = Vec::new();
    for child in &node.children {
        match child.tag.trim().to_lowercase().as_str() {
            "option" => options.push(option_of(child)),
            "optgroup" => options.extend(
                child
                    .children
                    .iter()
                    .filter(|c| c.tag.trim().eq_ignore_ascii_case("option"))
                    .map(option_of),
            ),
            _ => {}
        }
    }
    options
}

struct Frame<'a> {
    node: &'a SnapshotNode,
    path: NodePath,
    css_path: String,
    form: Option<usize>,
    label: Option<String>,
}

/// Walk the snapshot in document order and collect interactive candidates.
///
/// Total: a malformed node is recorded and skipped, its children are still visited.
/// Visibility is carried along as data, never used to drop anything.
pub fn extract(root: &SnapshotNode) -> Extraction {
    let mut out = Extraction::default();
    let mut stack = vec![Frame {
        node: root,
        path: vec![],
        css_path: root.tag.trim().to_lowercase(),
        form: None,
        label: None,
    }];

    while let Some(frame) = stack.pop() {
        out.nodes_visited += 1;
        let node = frame.node;
        let mut form = frame.form;
        let mut label = frame.label.clone();

        match check_node(node, &frame.path) {
            Err(malformed) => {
                debug!("skipping node: {}", malformed);
                out.malformed.push(malformed);
            }
            Ok(()) => {
                let tag = node.tag.trim().to_lowercase();

                if let Some(id) = node.non_empty_attr("id") {
                    if let Some(text) = node.text.as_deref().map(collapse_whitespace).filter(|t| !t.is_empty()) {
                        out.texts_by_id.entry(id.to_string()).or_insert(text);
                    }
                }

                if is_form_container(node) {
                    out.forms.push(FormNode {
                        path: frame.path.clone(),
                        id_attr: node.non_empty_attr("id").map(str::to_string),
                        name_attr: node.non_empty_attr("name").map(str::to_string),
                    });
                    form = Some(out.forms.len() - 1);
                }

                if tag == "label" {
                    let text = node.text.as_deref().map(collapse_whitespace).filter(|t| !t.is_empty());
                    if let (Some(target), Some(text)) = (node.non_empty_attr("for"), text.as_ref()) {
                        out.labels_for
                            .entry(target.to_string())
                            .or_insert_with(|| text.clone());
                    }
                    if text.is_some() {
                        label = text;
                    }
                }

                if is_interactive(node) {
                    let options = if tag == "select" { select_options(node) } else { Vec::new() };
                    out.elements.push(RawElement {
                        tag,
                        attributes: node.attributes.clone(),
                        text: node.text.as_deref().map(collapse_whitespace),
                        bounding_box: node.bounding_box,
                        computed_visible: node.computed_visible,
                        computed_disabled: node.computed_disabled,
                        options,
                        context: ElementContext {
                            position: out.elements.len(),
                            path: frame.path.clone(),
                            css_path: frame.css_path.clone(),
                            form,
                            enclosing_label: label.clone(),
                        },
                    });
                }
            }
        }

        for (index, child) in node.children.iter().enumerate().rev() {
            let mut path = frame.path.clone();
            path.push(index);
            let segment = format!("{}:nth-child({})", child.tag.trim().to_lowercase(), index + 1);
            stack.push(Frame {
                node: child,
                path,
                css_path: format!("{} > {}", frame.css_path, segment),
                form,
                label: label.clone(),
            });
        }
    }

    resolve_form_owners(&mut out);
    out
}

/// Apply HTML form-owner semantics: `form="login"` binds an element to `<form id="login">`.
fn resolve_form_owners(out: &mut Extraction) {
    let by_id: HashMap<&str, usize> = out
        .forms
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.id_attr.as_deref().map(|id| (id, i)))
        .collect();

    for el in &mut out.elements {
        if let Some(owner) = el.attr("form").and_then(|id| by_id.get(id)) {
            el.context.form = Some(*owner);
        }
    }
}

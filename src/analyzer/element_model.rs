use std::collections::BTreeMap;

use crate::report::report_model::SelectOption;
use crate::snapshot::snapshot_model::BoundingBox;

/// Child-index path from the snapshot root to a node.
pub type NodePath = Vec<usize>;

pub fn path_key(path: &[usize]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter().map(|i| format!("/{}", i)).collect()
}

/// A `<form>` (or `role="form"`) element seen during extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct FormNode {
    pub path: NodePath,
    pub id_attr: Option<String>,
    pub name_attr: Option<String>,
}

/// Where an extracted element sits in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementContext {
    /// Index in document order among extracted elements
    pub position: usize,
    pub path: NodePath,
    /// `tag:nth-child(k) > ...` from the root
    pub css_path: String,
    /// Index into `Extraction::forms` of the owning form, if any
    pub form: Option<usize>,
    /// Text of the nearest enclosing `<label>`
    pub enclosing_label: Option<String>,
}

impl ElementContext {
    /// Path of the parent node; the root is its own container.
    pub fn container_path(&self) -> &[usize] {
        match self.path.split_last() {
            Some((_, parent)) => parent,
            None => &self.path,
        }
    }
}

/// One interactive candidate, straight from the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    pub computed_visible: bool,
    pub computed_disabled: bool,
    /// Choices of a `<select>`, empty for everything else
    pub options: Vec<SelectOption>,
    pub context: ElementContext,
}

impl RawElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn role(&self) -> Option<String> {
        self.attr("role").map(str::to_lowercase)
    }

    pub fn explicit_type(&self) -> Option<String> {
        self.attr("type").map(str::to_lowercase)
    }
}

/// A field after normalization, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate {
    pub tag_name: String,
    pub input_type: String,
    pub name: String,
    pub name_attr: Option<String>,
    pub element_id: Option<String>,
    pub label: Option<String>,
    pub visible: bool,
    pub selector: String,
    pub required_attr: bool,
    pub disabled: bool,
    pub placeholder: Option<String>,
    pub autocomplete: Option<String>,
    pub readonly: bool,
    pub max_length: Option<u32>,
    pub options: Vec<SelectOption>,
    pub context: ElementContext,
}

impl FieldCandidate {
    /// name and id attributes joined, for lexicon matching
    pub fn identifiers(&self) -> String {
        [self.name_attr.as_deref(), self.element_id.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A clickable control that may submit a form.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub tag: String,
    /// Explicit `type` attribute, lowercased
    pub control_type: Option<String>,
    pub text: String,
    pub disabled: bool,
    pub context: ElementContext,
}

/// Output of the normalizer: each candidate becomes exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedElement {
    Field(FieldCandidate),
    Control(Control),
}

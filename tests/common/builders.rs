#![allow(dead_code)]

use field_analyzer::{BoundingBox, PageSnapshot, SnapshotNode};

/// A node laid out on screen and computed-visible.
pub fn shown(node: SnapshotNode) -> SnapshotNode {
    node.with_box(BoundingBox::new(10.0, 10.0, 200.0, 30.0)).visible(true)
}

pub fn el(tag: &str) -> SnapshotNode {
    shown(SnapshotNode::new(tag))
}

pub fn input(input_type: &str) -> SnapshotNode {
    el("input").with_attr("type", input_type)
}

pub fn named_input(input_type: &str, name: &str) -> SnapshotNode {
    input(input_type).with_attr("name", name)
}

/// `<input type="hidden">` as browsers report it: zero box, not visible.
pub fn hidden_input(name: &str) -> SnapshotNode {
    SnapshotNode::new("input")
        .with_attr("type", "hidden")
        .with_attr("name", name)
        .with_box(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
}

pub fn button(text: &str) -> SnapshotNode {
    el("button").with_text(text)
}

pub fn select(name: &str) -> SnapshotNode {
    el("select").with_attr("name", name)
}

pub fn form(children: Vec<SnapshotNode>) -> SnapshotNode {
    el("form").with_children(children)
}

pub fn div(children: Vec<SnapshotNode>) -> SnapshotNode {
    el("div").with_children(children)
}

/// `<html><body>children</body></html>`
pub fn page(children: Vec<SnapshotNode>) -> PageSnapshot {
    let body = el("body").with_children(children);
    PageSnapshot::new("https://example.com/", el("html").with_child(body))
}

pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

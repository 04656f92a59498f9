use field_analyzer::snapshot::provider::{FileSnapshotProvider, SnapshotProvider, save_snapshot};
use field_analyzer::snapshot::session::{BrowserConfig, BrowserSession, SessionRequest, SessionResponse};
use serde_json::json;
use tempfile::TempDir;

use crate::common::builders::{form, named_input, page};

mod common;

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn navigate_request_wire_format() {
    let request = SessionRequest::Navigate {
        url: "https://example.com".into(),
        timeout_ms: 5000,
        settle_ms: 250,
    };
    let v = serde_json::to_value(&request).unwrap();
    assert_eq!(
        v,
        json!({ "cmd": "navigate", "url": "https://example.com", "timeout_ms": 5000, "settle_ms": 250 })
    );
}

#[test]
fn unit_requests_wire_format() {
    assert_eq!(serde_json::to_value(&SessionRequest::Snapshot).unwrap(), json!({ "cmd": "snapshot" }));
    assert_eq!(serde_json::to_value(&SessionRequest::Quit).unwrap(), json!({ "cmd": "quit" }));
}

#[test]
fn response_optional_fields_default() {
    let ready: SessionResponse = serde_json::from_str(r#"{"ok":true,"ready":true}"#).unwrap();
    assert!(ready.ok);
    assert_eq!(ready.ready, Some(true));
    assert!(ready.data.is_none());

    let failed: SessionResponse =
        serde_json::from_str(r#"{"ok":false,"error":"net::ERR_NAME_NOT_RESOLVED"}"#).unwrap();
    assert!(!failed.ok);
    assert_eq!(failed.error.as_deref(), Some("net::ERR_NAME_NOT_RESOLVED"));
}

#[test]
fn browser_config_defaults() {
    let config = BrowserConfig::default();
    assert_eq!(config.script, "node/snapshot_server.js");
    assert!(config.headless);
    assert_eq!(config.timeout_ms, 30_000);
    assert_eq!(config.settle_ms, 1_000);
}

#[test]
fn launch_fails_without_a_server_script() {
    let config = BrowserConfig {
        script: "/nonexistent/snapshot_server.js".into(),
        ..BrowserConfig::default()
    };
    assert!(BrowserSession::launch(&config).is_err());
}

// ============================================================================
// Saved snapshots
// ============================================================================

#[test]
fn saved_snapshot_replays_identically() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snap.json");
    let snapshot = page(vec![form(vec![named_input("email", "email")])]).with_title("Login");

    save_snapshot(&snapshot, &path).unwrap();
    let replayed = FileSnapshotProvider::new(&path).get_snapshot().unwrap();

    assert_eq!(replayed, snapshot);
}

#[test]
fn snapshot_json_accepts_sparse_nodes() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("sparse.json");
    std::fs::write(
        &path,
        r#"{"url":"https://example.com","root":{"tag":"html","children":[{"tag":"input"}]}}"#,
    )
    .unwrap();

    let snapshot = FileSnapshotProvider::new(&path).get_snapshot().unwrap();

    assert_eq!(snapshot.title, "");
    assert_eq!(snapshot.root.children[0].tag, "input");
    assert!(!snapshot.root.children[0].computed_visible);
    assert!(snapshot.root.children[0].bounding_box.is_none());
}

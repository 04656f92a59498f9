use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AnalyzerError, Result};
use crate::snapshot::session::BrowserSession;
use crate::snapshot::snapshot_model::PageSnapshot;

// ============================================================================
// SnapshotProvider trait — the only thing the core needs from a browser
// ============================================================================

/// Produces one complete snapshot per call. The pipeline never re-queries a live page.
pub trait SnapshotProvider {
    fn get_snapshot(&mut self) -> Result<PageSnapshot>;
}

/// Replays a snapshot previously saved as JSON.
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotProvider for FileSnapshotProvider {
    fn get_snapshot(&mut self) -> Result<PageSnapshot> {
        debug!(path = %self.path.display(), "reading snapshot file");
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            AnalyzerError::SnapshotUnavailable {
                reason: format!("cannot read {}: {}", self.path.display(), e),
            }
        })?;

        serde_json::from_str(&content).map_err(|e| AnalyzerError::JsonParse {
            context: format!("snapshot file {}", self.path.display()),
            source: e,
        })
    }
}

/// Hands out an already-captured snapshot, once.
pub struct StaticSnapshotProvider {
    snapshot: Option<PageSnapshot>,
}

impl StaticSnapshotProvider {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }
}

impl SnapshotProvider for StaticSnapshotProvider {
    fn get_snapshot(&mut self) -> Result<PageSnapshot> {
        self.snapshot
            .take()
            .ok_or_else(|| AnalyzerError::SnapshotUnavailable {
                reason: "static snapshot already consumed".into(),
            })
    }
}

/// Navigates a live browser session to `url` and captures it.
pub struct BrowserSnapshotProvider<'a> {
    session: &'a mut BrowserSession,
    url: String,
}

impl<'a> BrowserSnapshotProvider<'a> {
    pub fn new(session: &'a mut BrowserSession, url: &str) -> Self {
        Self {
            session,
            url: url.to_string(),
        }
    }
}

impl SnapshotProvider for BrowserSnapshotProvider<'_> {
    fn get_snapshot(&mut self) -> Result<PageSnapshot> {
        info!(url = %self.url, "loading page");
        self.session.navigate(&self.url)?;
        self.session.snapshot()
    }
}

/// Persist a snapshot so it can be replayed through `FileSnapshotProvider`.
pub fn save_snapshot(snapshot: &PageSnapshot, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| AnalyzerError::JsonSerialize {
        context: "PageSnapshot".into(),
        source: e,
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

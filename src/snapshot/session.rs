use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AnalyzerError, Result};
use crate::snapshot::snapshot_model::PageSnapshot;

/// How to start and drive the Node.js snapshot server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Navigation timeout, milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra wait after network idle for client-side frameworks to render
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            headless: true,
            timeout_ms: default_timeout_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_script() -> String { "node/snapshot_server.js".to_string() }
fn default_true() -> bool { true }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_settle_ms() -> u64 { 1_000 }

/// Request sent to snapshot_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SessionRequest {
    Navigate {
        url: String,
        timeout_ms: u64,
        settle_ms: u64,
    },
    Snapshot,
    Quit,
}

/// Response received from snapshot_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// A persistent browser session backed by snapshot_server.js.
///
/// The Node.js child owns a headless Chromium for the lifetime of the session.
/// One JSON line goes out per command on stdin; one JSON line comes back on stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    config: BrowserConfig,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the snapshot server and wait for its ready line.
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut command = Command::new("node");
        command.arg(&config.script);
        if !config.headless {
            command.arg("--no-headless");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| AnalyzerError::SubprocessSpawn {
                script: config.script.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AnalyzerError::SessionIO("Failed to capture stdin of snapshot server".into())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            AnalyzerError::SessionIO("Failed to capture stdout of snapshot server".into())
        })?;

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            config: config.clone(),
            closed: false,
        };

        let ready = session.read_response("ready signal")?;
        if !ready.ok || ready.ready != Some(true) {
            return Err(AnalyzerError::SessionProtocol {
                command: "launch".into(),
                error: ready
                    .error
                    .unwrap_or_else(|| "Did not receive ready signal".into()),
            });
        }

        debug!(script = %config.script, headless = config.headless, "snapshot server ready");
        Ok(session)
    }

    fn read_response(&mut self, context: &str) -> Result<SessionResponse> {
        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            AnalyzerError::SessionIO(format!("Failed to read {}: {}", context, e))
        })?;

        if line.trim().is_empty() {
            return Err(AnalyzerError::SessionIO(format!(
                "Empty {} from snapshot server (process may have died)",
                context
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| AnalyzerError::JsonParse {
            context: context.to_string(),
            source: e,
        })
    }

    fn send(&mut self, request: &SessionRequest) -> Result<SessionResponse> {
        let json = serde_json::to_string(request).map_err(|e| AnalyzerError::JsonSerialize {
            context: "SessionRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            AnalyzerError::SessionIO(format!("Failed to write to snapshot server: {}", e))
        })?;
        self.stdin.flush().map_err(|e| {
            AnalyzerError::SessionIO(format!("Failed to flush snapshot server stdin: {}", e))
        })?;

        self.read_response("snapshot server response")
    }

    fn send_ok(&mut self, request: &SessionRequest, command: &str) -> Result<SessionResponse> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(AnalyzerError::SessionProtocol {
                command: command.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Load a URL and wait for it to settle.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        let request = SessionRequest::Navigate {
            url: url.to_string(),
            timeout_ms: self.config.timeout_ms,
            settle_ms: self.config.settle_ms,
        };
        self.send_ok(&request, "navigate")
            .map_err(AnalyzerError::into_snapshot_unavailable)?;
        Ok(())
    }

    /// Capture the current page as one snapshot tree.
    pub fn snapshot(&mut self) -> Result<PageSnapshot> {
        let response = self
            .send_ok(&SessionRequest::Snapshot, "snapshot")
            .map_err(AnalyzerError::into_snapshot_unavailable)?;
        let data = response.data.ok_or_else(|| AnalyzerError::SnapshotUnavailable {
            reason: "No data in snapshot response".into(),
        })?;

        serde_json::from_value(data).map_err(|e| AnalyzerError::JsonParse {
            context: "snapshot payload".into(),
            source: e,
        })
    }

    /// Shut the browser down. Safe to call more than once.
    pub fn quit(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Err(e) = self.send(&SessionRequest::Quit) {
            warn!("snapshot server did not acknowledge quit: {}", e);
        }
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

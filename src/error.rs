use thiserror::Error;

/// Errors surfaced by the analyzer and its collaborators.
///
/// Only `SnapshotUnavailable` (and the session/IO variants that feed it) is fatal to a run.
/// Everything that goes wrong *inside* a snapshot is absorbed by the pipeline.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The collaborator could not produce a snapshot at all (navigation failure, dead browser).
    #[error("Snapshot unavailable: {reason}")]
    SnapshotUnavailable { reason: String },

    /// Node.js subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the session pipes failed
    #[error("Session I/O error: {0}")]
    SessionIO(String),

    /// The snapshot server answered with ok=false or an unexpected payload
    #[error("Session command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Collapse any collaborator failure into the single fatal category the pipeline reports.
    pub fn into_snapshot_unavailable(self) -> Self {
        match self {
            AnalyzerError::SnapshotUnavailable { .. } => self,
            other => AnalyzerError::SnapshotUnavailable {
                reason: other.to_string(),
            },
        }
    }

    pub fn is_snapshot_unavailable(&self) -> bool {
        matches!(self, AnalyzerError::SnapshotUnavailable { .. })
    }
}

/// A single snapshot node that could not be turned into an element record.
///
/// Non-fatal: the extractor logs and counts it, then moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed element at {path}: {reason}")]
pub struct MalformedElement {
    pub path: String,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

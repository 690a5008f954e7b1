use std::path::PathBuf;

use thiserror::Error;

use crate::capture::domain::frame_source::SourceError;

/// Failures reported by an analysis engine at `start()` / `process()` time.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    Configuration(String),
    #[error("classifier data directory not found: {}", .0.display())]
    ClassifierPath(PathBuf),
    #[error("license rejected ({}): {reason}", .path.display())]
    License { path: PathBuf, reason: String },
    #[error("engine is already running")]
    AlreadyRunning,
    #[error("engine is not running")]
    NotRunning,
    #[error("engine worker failed: {0}")]
    Worker(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

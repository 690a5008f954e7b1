use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::domain::engine_error::EngineError;
use crate::capture::domain::frame_source::SourceError;
use crate::rendering::domain::score_log::ScoreLogError;

/// Coarse classification used to prefix top-level diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Engine,
    Runtime,
    Other,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Engine => "an engine error",
            ErrorKind::Runtime => "a runtime error",
            ErrorKind::Other => "an exception",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No video found: {}", .0.display())]
    NoVideo(PathBuf),
    #[error("Error opening webcam: {0}")]
    CameraUnavailable(#[source] SourceError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Log(#[from] ScoreLogError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Engine(_) => ErrorKind::Engine,
            SessionError::NoVideo(_) | SessionError::CameraUnavailable(_) => ErrorKind::Runtime,
            SessionError::Log(_) => ErrorKind::Other,
        }
    }
}

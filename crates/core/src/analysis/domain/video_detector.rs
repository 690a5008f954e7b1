use std::path::Path;

use crate::analysis::domain::engine_error::EngineError;

/// Engine that decodes and analyzes a whole file on its own worker.
pub trait VideoDetector: Send {
    /// Validates configuration. Must precede `process`.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Opens `path` and begins analysis in the background. Poll
    /// [`is_running`](Self::is_running) to learn when the file is finished.
    fn process(&mut self, path: &Path) -> Result<(), EngineError>;

    /// True while a file is being analyzed.
    fn is_running(&self) -> bool;

    /// Cancels any in-flight file and releases the worker.
    fn stop(&mut self) -> Result<(), EngineError>;
}

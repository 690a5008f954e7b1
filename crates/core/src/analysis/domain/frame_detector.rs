use crate::analysis::domain::engine_error::EngineError;
use crate::shared::frame::Frame;

/// What the engine did with a submitted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Queued,
    /// Arrived sooner than the target processing rate allows.
    Throttled,
    /// The queue between capture and analysis was full.
    Dropped,
}

/// Engine fed one frame at a time by the caller (camera mode).
pub trait FrameDetector: Send {
    /// Validates configuration and starts the worker.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Hands a frame to the worker without blocking.
    fn process(&mut self, frame: Frame) -> Result<Submission, EngineError>;

    /// Drains queued frames and halts the worker. No-op when not running.
    fn stop(&mut self) -> Result<(), EngineError>;

    fn is_running(&self) -> bool;
}

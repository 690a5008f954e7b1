use crate::shared::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },
}

/// Basic facts about an opened source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate; 0 when unknown or not meaningful (still images).
    pub fps: f64,
    /// `None` for unbounded sources such as a live camera.
    pub total_frames: Option<usize>,
}

/// Produces timestamped frames from a camera or a decoded file.
///
/// `frames()` ends the sequence on the first failed read instead of
/// returning an error; a dropped camera read or a truncated file simply
/// stops the capture loop.
pub trait FrameSource: Send {
    /// Acquires the device or file. Fails with [`SourceError::Unavailable`]
    /// when it cannot be opened.
    fn open(&mut self) -> Result<SourceInfo, SourceError>;

    /// Returns an iterator over frames in capture order.
    fn frames(&mut self) -> Box<dyn Iterator<Item = Frame> + '_>;

    /// Releases any resources held by the source. Safe to call repeatedly.
    fn close(&mut self);
}

use crate::shared::face::FaceMap;
use crate::shared::frame::Frame;

/// The per-frame vision step: find faces and score them.
///
/// Implementations may keep state across frames (tracking), hence `&mut self`.
pub trait FaceAnalyzer: Send {
    fn analyze(&mut self, frame: &Frame) -> Result<FaceMap, Box<dyn std::error::Error>>;
}

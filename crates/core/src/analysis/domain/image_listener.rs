use crate::shared::face::FaceMap;
use crate::shared::frame::Frame;

/// Receives engine callbacks. Both methods run on the engine's worker thread.
///
/// Each call is self-contained: results are not guaranteed to arrive in
/// submission order, and a frame may be captured without ever producing
/// results (dropped under backpressure).
pub trait ImageListener: Send {
    /// Called when the engine accepts a frame for analysis.
    fn on_image_capture(&mut self, frame: &Frame);

    /// Called once analysis for `frame` completes. `faces` may be empty.
    fn on_image_results(&mut self, faces: &FaceMap, frame: &Frame);
}

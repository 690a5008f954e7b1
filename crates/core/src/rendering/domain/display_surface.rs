use crate::rendering::domain::overlay::Overlay;
use crate::shared::frame::Frame;

/// Somewhere to show an annotated frame.
///
/// `show` is called from the engine's worker thread once per analyzed frame
/// and is responsible for display pacing.
pub trait DisplaySurface: Send {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<(), Box<dyn std::error::Error>>;
}

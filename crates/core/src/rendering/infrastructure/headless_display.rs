use std::time::Duration;

use crate::rendering::domain::display_surface::DisplaySurface;
use crate::rendering::domain::overlay::Overlay;
use crate::shared::frame::Frame;

/// Display that shows nothing but keeps the per-frame pacing delay.
pub struct HeadlessDisplay {
    pacing: Duration,
    frames_shown: usize,
}

impl HeadlessDisplay {
    pub fn new(pacing: Duration) -> Self {
        Self {
            pacing,
            frames_shown: 0,
        }
    }

    pub fn frames_shown(&self) -> usize {
        self.frames_shown
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<(), Box<dyn std::error::Error>> {
        log::trace!(
            "Frame {} ready with {} overlay items",
            frame.index(),
            overlay.items().len()
        );
        self.frames_shown += 1;
        if !self.pacing.is_zero() {
            std::thread::sleep(self.pacing);
        }
        Ok(())
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rendering::domain::display_surface::DisplaySurface;
use crate::rendering::domain::overlay::{Overlay, OverlayItem};
use crate::shared::frame::Frame;

const MARKER_COLOR: image::Rgb<u8> = image::Rgb([255, 0, 0]);

/// Writes each annotated frame to `<dir>/frame_NNNNNN.png` with the `image`
/// crate.
///
/// Only feature-point markers are painted; text items need a font renderer
/// and are left to the on-screen display. Each write is followed by the
/// same pacing delay a window would apply.
pub struct SnapshotDisplay {
    dir: PathBuf,
    pacing: Duration,
}

impl SnapshotDisplay {
    pub fn new(
        dir: impl Into<PathBuf>,
        pacing: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, pacing })
    }

    pub fn path_for(&self, frame: &Frame) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", frame.index()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DisplaySurface for SnapshotDisplay {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<(), Box<dyn std::error::Error>> {
        let mut img =
            image::RgbImage::from_raw(frame.width(), frame.height(), frame.to_rgb().into_owned())
                .ok_or("Failed to create image from frame data")?;

        for item in overlay.items() {
            if let OverlayItem::Marker { x, y, radius } = *item {
                paint_marker(&mut img, x, y, radius);
            }
        }

        img.save(self.path_for(frame))?;
        if !self.pacing.is_zero() {
            std::thread::sleep(self.pacing);
        }
        Ok(())
    }
}

fn paint_marker(img: &mut image::RgbImage, cx: i32, cy: i32, radius: i32) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if (0..w).contains(&x) && (0..h).contains(&y) {
                img.put_pixel(x as u32, y as u32, MARKER_COLOR);
            }
        }
    }
}

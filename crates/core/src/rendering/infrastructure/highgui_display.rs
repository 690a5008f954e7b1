use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use opencv::core::{Mat, Point, Scalar, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, imgproc};

use crate::rendering::domain::display_surface::DisplaySurface;
use crate::rendering::domain::overlay::{Overlay, OverlayItem, TextStyle};
use crate::shared::frame::Frame;

const ESC_KEY: i32 = 27;
const FONT_SCALE: f64 = 0.5;

/// On-screen window backed by OpenCV highgui.
///
/// `wait_key` doubles as the pacing delay. Pressing Esc in the window raises
/// the session's cancel flag.
pub struct HighguiDisplay {
    title: String,
    wait_ms: i32,
    cancelled: Arc<AtomicBool>,
}

// Safety: highgui calls are serialized on whichever thread owns the display.
unsafe impl Send for HighguiDisplay {}

impl HighguiDisplay {
    pub fn new(
        title: &str,
        wait_ms: u64,
        cancelled: Arc<AtomicBool>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
            wait_ms: wait_ms.min(i32::MAX as u64) as i32,
            cancelled,
        })
    }
}

impl DisplaySurface for HighguiDisplay {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<(), Box<dyn std::error::Error>> {
        let mut mat = Mat::new_rows_cols_with_default(
            frame.height() as i32,
            frame.width() as i32,
            CV_8UC3,
            Scalar::all(0.0),
        )?;
        mat.data_bytes_mut()?.copy_from_slice(&frame.to_bgr());

        for item in overlay.items() {
            match item {
                OverlayItem::Marker { x, y, radius } => {
                    imgproc::circle(
                        &mut mat,
                        Point::new(*x, *y),
                        *radius,
                        body_color(),
                        1,
                        imgproc::LINE_8,
                        0,
                    )?;
                }
                OverlayItem::Text { text, x, y, style } => {
                    let color = match style {
                        TextStyle::Header => header_color(),
                        TextStyle::Body => body_color(),
                    };
                    imgproc::put_text(
                        &mut mat,
                        text,
                        Point::new(*x, *y),
                        imgproc::FONT_HERSHEY_COMPLEX_SMALL,
                        FONT_SCALE,
                        color,
                        1,
                        imgproc::LINE_8,
                        false,
                    )?;
                }
            }
        }

        highgui::imshow(&self.title, &mat)?;
        if highgui::wait_key(self.wait_ms)? == ESC_KEY {
            log::info!("Esc pressed, stopping capture");
            self.cancelled.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for HighguiDisplay {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.title) {
            log::debug!("Failed to close window {}: {e}", self.title);
        }
    }
}

/// BGR red.
fn body_color() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// BGR blue.
fn header_color() -> Scalar {
    Scalar::new(255.0, 0.0, 0.0, 0.0)
}

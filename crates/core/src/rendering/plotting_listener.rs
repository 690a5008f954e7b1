use crate::analysis::domain::image_listener::ImageListener;
use crate::rendering::domain::display_surface::DisplaySurface;
use crate::rendering::domain::overlay::compose_overlay;
use crate::rendering::domain::score_log::ScoreLog;
use crate::shared::face::FaceMap;
use crate::shared::frame::Frame;
use crate::shared::rate::{format_fps, RateEstimator, SharedRate};

/// Listener that annotates each analyzed frame, logs single-face scores and
/// hands the result to a display surface.
///
/// Runs on the engine worker. The capture rate is read from the driver's
/// [`SharedRate`]; the processing rate is tracked here.
pub struct PlottingListener {
    capture_rate: SharedRate,
    process_rate: RateEstimator,
    score_log: ScoreLog,
    display: Box<dyn DisplaySurface>,
}

impl PlottingListener {
    pub fn new(
        capture_rate: SharedRate,
        score_log: ScoreLog,
        display: Box<dyn DisplaySurface>,
    ) -> Self {
        Self {
            capture_rate,
            process_rate: RateEstimator::new(),
            score_log,
            display,
        }
    }
}

impl ImageListener for PlottingListener {
    fn on_image_capture(&mut self, _frame: &Frame) {}

    fn on_image_results(&mut self, faces: &FaceMap, frame: &Frame) {
        let capture_fps = self.capture_rate.get();
        let process_fps = self.process_rate.update(frame.timestamp());
        let overlay = compose_overlay(faces, frame.width(), frame.height(), capture_fps);

        let mut points = 0;
        if let (1, Some(face)) = (faces.len(), faces.values().next()) {
            points = face.feature_points.len();
            if let Err(e) = self.score_log.append(face, frame.timestamp()) {
                log::warn!("{e}");
            }
        }

        log::info!(
            "Timestamp: {},{}x{} cfps: {} pfps: {} faces: {} pnts: {}",
            frame.timestamp(),
            frame.width(),
            frame.height(),
            format_fps(capture_fps),
            format_fps(process_fps),
            faces.len(),
            points
        );

        if let Err(e) = self.display.show(frame, &overlay) {
            log::warn!("Display failed for frame {}: {e}", frame.index());
        }
    }
}

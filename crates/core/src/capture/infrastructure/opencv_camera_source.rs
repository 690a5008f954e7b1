use std::time::Instant;

use opencv::core::{Mat, CV_8UC1, CV_8UC3, CV_8UC4};
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::capture::domain::frame_source::{FrameSource, SourceError, SourceInfo};
use crate::shared::frame::{ColorFormat, Frame};

/// Live camera capture through OpenCV's `VideoCapture`.
///
/// Frames are stamped with seconds elapsed since `clock_start`, which the
/// session shares with everything else that reports time.
pub struct OpencvCameraSource {
    device_index: i32,
    requested_fps: u32,
    clock_start: Instant,
    capture: Option<VideoCapture>,
}

// Safety: the capture handle is only touched by the thread that owns the source.
unsafe impl Send for OpencvCameraSource {}

impl OpencvCameraSource {
    pub fn new(device_index: i32, requested_fps: u32, clock_start: Instant) -> Self {
        Self {
            device_index,
            requested_fps,
            clock_start,
            capture: None,
        }
    }

    fn unavailable(&self, detail: impl std::fmt::Display) -> SourceError {
        SourceError::Unavailable(format!("camera {}: {detail}", self.device_index))
    }
}

impl FrameSource for OpencvCameraSource {
    fn open(&mut self) -> Result<SourceInfo, SourceError> {
        let mut cap = VideoCapture::new(self.device_index, videoio::CAP_ANY)
            .map_err(|e| self.unavailable(e))?;

        if !cap.is_opened().map_err(|e| self.unavailable(e))? {
            return Err(self.unavailable("device could not be opened"));
        }

        log::info!("Setting the webcam frame rate to: {}", self.requested_fps);
        if let Err(e) = cap.set(videoio::CAP_PROP_FPS, self.requested_fps as f64) {
            log::warn!("Camera rejected frame rate {}: {e}", self.requested_fps);
        }

        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or(0.0) as u32;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0) as u32;
        let fps = cap
            .get(videoio::CAP_PROP_FPS)
            .unwrap_or(self.requested_fps as f64);

        self.capture = Some(cap);
        Ok(SourceInfo {
            width,
            height,
            fps,
            total_frames: None,
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Frame> + '_> {
        let clock_start = self.clock_start;
        let Some(cap) = self.capture.as_mut() else {
            log::warn!("OpencvCameraSource: frames() called before open()");
            return Box::new(std::iter::empty());
        };

        let mut index = 0;
        Box::new(std::iter::from_fn(move || {
            let frame = read_frame(cap, clock_start, index)?;
            index += 1;
            Some(frame)
        }))
    }

    fn close(&mut self) {
        if let Some(mut cap) = self.capture.take() {
            if let Err(e) = cap.release() {
                log::warn!("Failed to release camera {}: {e}", self.device_index);
            }
        }
    }
}

impl Drop for OpencvCameraSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Reads one BGR frame, or `None` when the device returns no data.
fn read_frame(cap: &mut VideoCapture, clock_start: Instant, index: usize) -> Option<Frame> {
    let mut mat = Mat::default();
    match cap.read(&mut mat) {
        Ok(true) if !mat.empty() => {}
        Ok(_) => {
            log::error!("Failed to read frame from webcam!");
            return None;
        }
        Err(e) => {
            log::error!("Failed to read frame from webcam: {e}");
            return None;
        }
    }
    let timestamp = clock_start.elapsed().as_secs_f64();

    let mat = match into_bgr(mat) {
        Ok(mat) => mat,
        Err(e) => {
            log::error!("Unusable webcam frame: {e}");
            return None;
        }
    };
    let width = mat.cols() as u32;
    let height = mat.rows() as u32;
    let data = if mat.is_continuous() {
        mat.data_bytes().ok()?.to_vec()
    } else {
        mat.try_clone().ok()?.data_bytes().ok()?.to_vec()
    };

    Some(Frame::new(
        data,
        width,
        height,
        ColorFormat::Bgr,
        timestamp,
        index,
    ))
}

/// Converts grey and BGRA captures to packed 8-bit BGR.
fn into_bgr(mat: Mat) -> Result<Mat, String> {
    let code = match mat.typ() {
        t if t == CV_8UC3 => return Ok(mat),
        t if t == CV_8UC1 => imgproc::COLOR_GRAY2BGR,
        t if t == CV_8UC4 => imgproc::COLOR_BGRA2BGR,
        t => return Err(format!("unsupported pixel type {t}")),
    };
    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&mat, &mut bgr, code).map_err(|e| e.to_string())?;
    Ok(bgr)
}

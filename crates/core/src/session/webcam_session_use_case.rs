use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::analysis::domain::frame_detector::{FrameDetector, Submission};
use crate::capture::domain::frame_source::FrameSource;
use crate::session::session_error::SessionError;
use crate::shared::rate::{RateEstimator, SharedRate};

/// Frames read, handed to the engine, and skipped by it during one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub captured: usize,
    pub queued: usize,
    pub throttled: usize,
    pub dropped: usize,
}

/// Live capture loop: camera → capture-rate estimate → frame engine.
///
/// The camera is opened before the engine starts, so a missing device never
/// spins up a worker. The loop ends when the cancel flag is raised or the
/// camera stops producing frames; the camera is closed and the engine
/// stopped on every path out.
pub struct WebcamSessionUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FrameDetector>,
    capture_rate: SharedRate,
    cancelled: Arc<AtomicBool>,
}

impl WebcamSessionUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FrameDetector>,
        capture_rate: SharedRate,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            detector,
            capture_rate,
            cancelled,
        }
    }

    pub fn execute(&mut self) -> Result<CaptureStats, SessionError> {
        let info = self
            .source
            .open()
            .map_err(SessionError::CameraUnavailable)?;
        log::info!(
            "Camera opened at {}x{}, {} fps",
            info.width,
            info.height,
            info.fps
        );

        let result = self
            .detector
            .start()
            .map_err(SessionError::from)
            .and_then(|()| self.capture_loop());

        self.source.close();
        let stopped = self.detector.stop();

        let stats = result?;
        stopped?;
        log::info!(
            "Capture finished: {} frames read, {} queued, {} throttled, {} dropped",
            stats.captured,
            stats.queued,
            stats.throttled,
            stats.dropped
        );
        Ok(stats)
    }

    fn capture_loop(&mut self) -> Result<CaptureStats, SessionError> {
        let mut rate = RateEstimator::new();
        let mut stats = CaptureStats::default();

        for frame in self.source.frames() {
            if self.cancelled.load(Ordering::SeqCst) {
                log::info!("Capture cancelled");
                break;
            }
            stats.captured += 1;
            self.capture_rate.publish(rate.update(frame.timestamp()));

            match self.detector.process(frame)? {
                Submission::Queued => stats.queued += 1,
                Submission::Throttled => stats.throttled += 1,
                Submission::Dropped => stats.dropped += 1,
            }
        }
        Ok(stats)
    }
}

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::analysis::domain::engine_config::EngineConfig;
use crate::analysis::domain::engine_error::EngineError;
use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::analysis::domain::image_listener::ImageListener;
use crate::analysis::domain::video_detector::VideoDetector;
use crate::analysis::infrastructure::frame_throttle::FrameThrottle;
use crate::analysis::infrastructure::result_dispatcher::ResultDispatcher;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::rate::{RateEstimator, SharedRate};

/// Builds the frame source used to decode a file handed to `process()`.
pub type SourceFactory = Box<dyn Fn(&Path) -> Box<dyn FrameSource> + Send>;

/// File-mode engine: decodes and analyzes a whole file on a worker thread.
///
/// Frames are sampled by timestamp so that at most `frame_rate` frames per
/// second of video time are analyzed. Every decoded frame, sampled or not,
/// updates the published capture rate.
pub struct ThreadedVideoDetector {
    config: EngineConfig,
    open_source: SourceFactory,
    capture_rate: SharedRate,
    started: bool,
    idle: Option<ResultDispatcher>,
    running: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<ResultDispatcher>>,
}

impl ThreadedVideoDetector {
    pub fn new(
        config: EngineConfig,
        open_source: SourceFactory,
        analyzer: Box<dyn FaceAnalyzer>,
        listener: Box<dyn ImageListener>,
    ) -> Self {
        let dispatcher = ResultDispatcher::new(analyzer, listener, config.clone());
        Self {
            config,
            open_source,
            capture_rate: SharedRate::new(),
            started: false,
            idle: Some(dispatcher),
            running: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Publishes the decode rate to `capture_rate` instead of a private slot.
    pub fn with_capture_rate(mut self, capture_rate: SharedRate) -> Self {
        self.capture_rate = capture_rate;
        self
    }

    fn join_worker(&mut self) -> Result<(), EngineError> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        let result = match handle.join() {
            Ok(dispatcher) => {
                log::debug!(
                    "Video detector finished after {} analyzed frames",
                    dispatcher.frames_analyzed()
                );
                self.idle = Some(dispatcher);
                Ok(())
            }
            Err(_) => Err(EngineError::Worker("analysis thread panicked".into())),
        };
        self.running.store(false, Ordering::SeqCst);
        result
    }
}

impl VideoDetector for ThreadedVideoDetector {
    fn start(&mut self) -> Result<(), EngineError> {
        if self.started {
            return Err(EngineError::AlreadyRunning);
        }
        self.config.validate()?;
        self.started = true;
        Ok(())
    }

    fn process(&mut self, path: &Path) -> Result<(), EngineError> {
        if !self.started {
            return Err(EngineError::NotRunning);
        }
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }
        // Reclaim the dispatcher from a previous file that ran to completion.
        self.join_worker()?;

        let mut source = (self.open_source)(path);
        let info = source.open()?;
        log::info!(
            "Processing {} ({}x{}, {:.2} fps)",
            path.display(),
            info.width,
            info.height,
            info.fps
        );

        let mut dispatcher = self.idle.take().ok_or_else(|| {
            EngineError::Worker("engine cannot restart after a worker failure".into())
        })?;
        let mut throttle = FrameThrottle::new(self.config.min_frame_interval());
        let capture_rate = self.capture_rate.clone();
        let running = Arc::clone(&self.running);
        let cancelled = Arc::clone(&self.cancelled);
        cancelled.store(false, Ordering::SeqCst);
        running.store(true, Ordering::SeqCst);

        let spawned = std::thread::Builder::new()
            .name("video-detector".into())
            .spawn(move || {
                let mut rate = RateEstimator::new();
                for frame in source.frames() {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    capture_rate.publish(rate.update(frame.timestamp()));
                    if throttle.admit(frame.timestamp()) {
                        dispatcher.dispatch(&frame);
                    }
                }
                source.close();
                running.store(false, Ordering::SeqCst);
                dispatcher
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(EngineError::Worker(e.to_string()))
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.cancelled.store(true, Ordering::SeqCst);
        let result = self.join_worker();
        self.started = false;
        result
    }
}

impl Drop for ThreadedVideoDetector {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("Failed to stop video detector: {e}");
        }
    }
}

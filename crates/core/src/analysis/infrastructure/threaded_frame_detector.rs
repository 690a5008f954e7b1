use std::thread::JoinHandle;

use crossbeam_channel::{Sender, TrySendError};

use crate::analysis::domain::engine_config::EngineConfig;
use crate::analysis::domain::engine_error::EngineError;
use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::analysis::domain::frame_detector::{FrameDetector, Submission};
use crate::analysis::domain::image_listener::ImageListener;
use crate::analysis::infrastructure::frame_throttle::FrameThrottle;
use crate::analysis::infrastructure::result_dispatcher::ResultDispatcher;
use crate::shared::frame::Frame;

/// Frame-mode engine with a dedicated analysis thread.
///
/// Layout: `caller → [bounded queue] → worker [analyze → listener]`
///
/// `process()` never blocks: frames that arrive faster than the configured
/// rate are throttled, and frames that find the queue full are dropped.
pub struct ThreadedFrameDetector {
    config: EngineConfig,
    throttle: FrameThrottle,
    idle: Option<ResultDispatcher>,
    worker: Option<Worker>,
}

struct Worker {
    tx: Sender<Frame>,
    handle: JoinHandle<ResultDispatcher>,
}

impl ThreadedFrameDetector {
    pub fn new(
        config: EngineConfig,
        analyzer: Box<dyn FaceAnalyzer>,
        listener: Box<dyn ImageListener>,
    ) -> Self {
        let throttle = FrameThrottle::new(config.min_frame_interval());
        let dispatcher = ResultDispatcher::new(analyzer, listener, config.clone());
        Self {
            config,
            throttle,
            idle: Some(dispatcher),
            worker: None,
        }
    }
}

impl FrameDetector for ThreadedFrameDetector {
    fn start(&mut self) -> Result<(), EngineError> {
        if self.worker.is_some() {
            return Err(EngineError::AlreadyRunning);
        }
        self.config.validate()?;

        let mut dispatcher = self.idle.take().ok_or_else(|| {
            EngineError::Worker("engine cannot restart after a worker failure".into())
        })?;
        let (tx, rx) = crossbeam_channel::bounded::<Frame>(self.config.buffer_length);

        let handle = std::thread::Builder::new()
            .name("frame-detector".into())
            .spawn(move || {
                for frame in rx {
                    dispatcher.dispatch(&frame);
                }
                dispatcher
            })
            .map_err(|e| EngineError::Worker(e.to_string()))?;

        self.throttle.reset();
        self.worker = Some(Worker { tx, handle });
        log::debug!(
            "Frame detector started (rate {} fps, buffer {})",
            self.config.frame_rate,
            self.config.buffer_length
        );
        Ok(())
    }

    fn process(&mut self, frame: Frame) -> Result<Submission, EngineError> {
        let Some(worker) = self.worker.as_ref() else {
            return Err(EngineError::NotRunning);
        };

        if !self.throttle.admit(frame.timestamp()) {
            return Ok(Submission::Throttled);
        }

        match worker.tx.try_send(frame) {
            Ok(()) => Ok(Submission::Queued),
            Err(TrySendError::Full(frame)) => {
                log::debug!("Analysis queue full, dropping frame {}", frame.index());
                Ok(Submission::Dropped)
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(EngineError::Worker("analysis thread exited".into()))
            }
        }
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        let Some(Worker { tx, handle }) = self.worker.take() else {
            return Ok(());
        };

        // Closing the queue lets the worker drain what is left and return.
        drop(tx);
        match handle.join() {
            Ok(dispatcher) => {
                log::debug!(
                    "Frame detector stopped after {} analyzed frames",
                    dispatcher.frames_analyzed()
                );
                self.idle = Some(dispatcher);
                Ok(())
            }
            Err(_) => Err(EngineError::Worker("analysis thread panicked".into())),
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for ThreadedFrameDetector {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("Failed to stop frame detector: {e}");
        }
    }
}

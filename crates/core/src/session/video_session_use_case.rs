use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::domain::video_detector::VideoDetector;
use crate::session::session_error::SessionError;
use crate::shared::constants::RUNNING_POLL_MS;

/// File mode: hand the whole path to the video engine and wait for it.
pub struct VideoSessionUseCase {
    detector: Box<dyn VideoDetector>,
    cancelled: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl VideoSessionUseCase {
    pub fn new(detector: Box<dyn VideoDetector>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            detector,
            cancelled,
            poll_interval: Duration::from_millis(RUNNING_POLL_MS),
        }
    }

    /// Returns `true` when the file was analyzed to the end, `false` when the
    /// run was cancelled first.
    pub fn execute(&mut self, path: &Path) -> Result<bool, SessionError> {
        if !path.exists() {
            return Err(SessionError::NoVideo(path.to_path_buf()));
        }

        let result = self.run(path);
        let stopped = self.detector.stop();
        let finished = result?;
        stopped?;
        Ok(finished)
    }

    fn run(&mut self, path: &Path) -> Result<bool, SessionError> {
        self.detector.start()?;
        log::info!("Processing {}", path.display());
        self.detector.process(path)?;

        while self.detector.is_running() {
            if self.cancelled.load(Ordering::SeqCst) {
                log::info!("Processing cancelled");
                return Ok(false);
            }
            std::thread::sleep(self.poll_interval);
        }
        log::info!("Finished {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::engine_error::EngineError;
    use crate::capture::domain::frame_source::SourceError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct DetectorLog {
        started: bool,
        stopped: bool,
        processed: Option<PathBuf>,
        polls: usize,
    }

    /// Reports running for `busy_polls` calls to `is_running` after `process`.
    struct MockVideoDetector {
        log: Arc<Mutex<DetectorLog>>,
        busy_polls: usize,
        fail_process: bool,
    }

    impl MockVideoDetector {
        fn new(log: Arc<Mutex<DetectorLog>>, busy_polls: usize) -> Self {
            Self {
                log,
                busy_polls,
                fail_process: false,
            }
        }
    }

    impl VideoDetector for MockVideoDetector {
        fn start(&mut self) -> Result<(), EngineError> {
            self.log.lock().unwrap().started = true;
            Ok(())
        }

        fn process(&mut self, path: &Path) -> Result<(), EngineError> {
            if self.fail_process {
                return Err(SourceError::Decode {
                    source_name: path.display().to_string(),
                    message: "no video stream".into(),
                }
                .into());
            }
            self.log.lock().unwrap().processed = Some(path.to_path_buf());
            Ok(())
        }

        fn is_running(&self) -> bool {
            let mut log = self.log.lock().unwrap();
            log.polls += 1;
            log.processed.is_some() && log.polls <= self.busy_polls
        }

        fn stop(&mut self) -> Result<(), EngineError> {
            self.log.lock().unwrap().stopped = true;
            Ok(())
        }
    }

    fn existing_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not really a video").unwrap();
        path
    }

    #[test]
    fn test_missing_video_never_starts_engine() {
        let log = Arc::new(Mutex::new(DetectorLog::default()));
        let mut use_case = VideoSessionUseCase::new(
            Box::new(MockVideoDetector::new(log.clone(), 0)),
            Arc::new(AtomicBool::new(false)),
        );

        let err = use_case.execute(Path::new("/nonexistent/clip.mp4")).unwrap_err();

        assert!(matches!(err, SessionError::NoVideo(_)));
        assert!(err.to_string().starts_with("No video found"));
        let log = log.lock().unwrap();
        assert!(!log.started);
        assert!(log.processed.is_none());
    }

    #[test]
    fn test_polls_until_engine_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = existing_file(&dir);
        let log = Arc::new(Mutex::new(DetectorLog::default()));
        let mut use_case = VideoSessionUseCase::new(
            Box::new(MockVideoDetector::new(log.clone(), 3)),
            Arc::new(AtomicBool::new(false)),
        );

        assert!(use_case.execute(&path).unwrap());

        let log = log.lock().unwrap();
        assert!(log.started && log.stopped);
        assert_eq!(log.processed.as_deref(), Some(path.as_path()));
        assert_eq!(log.polls, 4);
    }

    #[test]
    fn test_cancel_stops_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let path = existing_file(&dir);
        let log = Arc::new(Mutex::new(DetectorLog::default()));
        let mut use_case = VideoSessionUseCase::new(
            Box::new(MockVideoDetector::new(log.clone(), usize::MAX)),
            Arc::new(AtomicBool::new(true)),
        );

        assert!(!use_case.execute(&path).unwrap());
        assert!(log.lock().unwrap().stopped);
    }

    #[test]
    fn test_process_failure_still_stops_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = existing_file(&dir);
        let log = Arc::new(Mutex::new(DetectorLog::default()));
        let mut detector = MockVideoDetector::new(log.clone(), 0);
        detector.fail_process = true;
        let mut use_case =
            VideoSessionUseCase::new(Box::new(detector), Arc::new(AtomicBool::new(false)));

        let err = use_case.execute(&path).unwrap_err();

        assert!(matches!(err, SessionError::Engine(EngineError::Source(_))));
        assert!(log.lock().unwrap().stopped);
    }
}

use std::path::PathBuf;

use crate::analysis::domain::engine_error::EngineError;
use crate::shared::constants::{DEFAULT_BUFFER_LENGTH, DEFAULT_PROCESS_FRAME_RATE};
use crate::shared::face::{Emotions, Expressions, FaceMap};

/// Settings accepted by an engine before `start()`.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub detect_all_expressions: bool,
    pub detect_all_emotions: bool,
    /// Directory holding the classifier model assets.
    pub classifier_path: Option<PathBuf>,
    pub license_path: Option<PathBuf>,
    /// Upper bound on analyzed frames per second of capture time.
    pub frame_rate: u32,
    /// Depth of the queue between capture and analysis (frame mode only).
    pub buffer_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detect_all_expressions: true,
            detect_all_emotions: true,
            classifier_path: None,
            license_path: None,
            frame_rate: DEFAULT_PROCESS_FRAME_RATE,
            buffer_length: DEFAULT_BUFFER_LENGTH,
        }
    }
}

impl EngineConfig {
    /// Checks everything an engine needs before its worker may start.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.frame_rate == 0 {
            return Err(EngineError::Configuration(
                "frame rate must be greater than zero".into(),
            ));
        }
        if self.buffer_length == 0 {
            return Err(EngineError::Configuration(
                "buffer length must be greater than zero".into(),
            ));
        }
        if !self.detect_all_expressions && !self.detect_all_emotions {
            log::warn!("All classifiers are disabled; results will carry no scores");
        }
        if let Some(dir) = &self.classifier_path {
            if !dir.is_dir() {
                return Err(EngineError::ClassifierPath(dir.clone()));
            }
        }
        if let Some(license) = &self.license_path {
            let meta = std::fs::metadata(license).map_err(|e| EngineError::License {
                path: license.clone(),
                reason: e.to_string(),
            })?;
            if !meta.is_file() {
                return Err(EngineError::License {
                    path: license.clone(),
                    reason: "not a regular file".into(),
                });
            }
            if meta.len() == 0 {
                return Err(EngineError::License {
                    path: license.clone(),
                    reason: "file is empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Minimum spacing in seconds between analyzed frames.
    pub fn min_frame_interval(&self) -> f64 {
        1.0 / self.frame_rate.max(1) as f64
    }

    /// Clears score groups whose classifiers are disabled.
    pub fn mask_disabled(&self, faces: &mut FaceMap) {
        for face in faces.values_mut() {
            if !self.detect_all_expressions {
                face.expressions = Expressions::default();
            }
            if !self.detect_all_emotions {
                face.emotions = Emotions::default();
            }
        }
    }
}

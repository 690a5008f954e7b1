use crate::analysis::domain::engine_config::EngineConfig;
use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::analysis::domain::image_listener::ImageListener;
use crate::shared::frame::Frame;

/// Worker-side half of an engine: analyzes a frame and notifies the listener.
///
/// Owned by exactly one worker thread at a time and handed back on join, so
/// the listener never needs a lock.
pub struct ResultDispatcher {
    analyzer: Box<dyn FaceAnalyzer>,
    listener: Box<dyn ImageListener>,
    config: EngineConfig,
    frames_analyzed: usize,
}

impl ResultDispatcher {
    pub fn new(
        analyzer: Box<dyn FaceAnalyzer>,
        listener: Box<dyn ImageListener>,
        config: EngineConfig,
    ) -> Self {
        Self {
            analyzer,
            listener,
            config,
            frames_analyzed: 0,
        }
    }

    pub fn dispatch(&mut self, frame: &Frame) {
        self.listener.on_image_capture(frame);

        let mut faces = match self.analyzer.analyze(frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("Analysis failed for frame {}: {e}", frame.index());
                return;
            }
        };
        self.config.mask_disabled(&mut faces);
        self.frames_analyzed += 1;

        self.listener.on_image_results(&faces, frame);
    }

    pub fn frames_analyzed(&self) -> usize {
        self.frames_analyzed
    }
}

//! Fakes shared by unit tests across modules.

use std::sync::{Arc, Mutex};

use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::analysis::domain::image_listener::ImageListener;
use crate::capture::domain::frame_source::{FrameSource, SourceError, SourceInfo};
use crate::shared::face::{Face, FaceMap, FeaturePoint};
use crate::shared::frame::{ColorFormat, Frame};

pub fn frame_at(index: usize, timestamp: f64) -> Frame {
    Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, ColorFormat::Bgr, timestamp, index)
}

pub fn scored_face(id: u32, base: f32) -> Face {
    let mut face = Face {
        id,
        feature_points: vec![FeaturePoint::new(1.0, 1.0), FeaturePoint::new(2.0, 3.0)],
        ..Default::default()
    };
    face.measurements.orientation.pitch = 1.5;
    face.measurements.orientation.yaw = -2.25;
    face.measurements.orientation.roll = 0.5;
    face.measurements.interocular_distance = 64.0;
    face.expressions.smile = base;
    face.expressions.attention = base + 0.9;
    face.emotions.joy = base + 0.5;
    face.emotions.valence = -base;
    face
}

/// Returns one face per frame unless told otherwise.
pub struct FakeAnalyzer {
    pub faces_per_frame: usize,
}

impl FaceAnalyzer for FakeAnalyzer {
    fn analyze(&mut self, frame: &Frame) -> Result<FaceMap, Box<dyn std::error::Error>> {
        Ok((0..self.faces_per_frame as u32)
            .map(|id| (id, scored_face(id, frame.index() as f32)))
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct ListenerLog {
    pub captured: Vec<usize>,
    pub results: Vec<(usize, usize)>,
    pub last_faces: FaceMap,
}

/// Records `(frame index, face count)` for every callback and keeps the
/// most recent face map.
#[derive(Clone, Default)]
pub struct RecordingListener {
    pub log: Arc<Mutex<ListenerLog>>,
}

impl ImageListener for RecordingListener {
    fn on_image_capture(&mut self, frame: &Frame) {
        self.log.lock().unwrap().captured.push(frame.index());
    }

    fn on_image_results(&mut self, faces: &FaceMap, frame: &Frame) {
        let mut log = self.log.lock().unwrap();
        log.results.push((frame.index(), faces.len()));
        log.last_faces = faces.clone();
    }
}

/// In-memory source yielding `count` frames spaced `interval` seconds apart.
pub struct FakeSource {
    pub count: usize,
    pub interval: f64,
    pub available: bool,
    pub opened: Arc<Mutex<bool>>,
    pub closed: Arc<Mutex<bool>>,
}

impl FakeSource {
    pub fn new(count: usize, interval: f64) -> Self {
        Self {
            count,
            interval,
            available: true,
            opened: Arc::default(),
            closed: Arc::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(0, 0.0)
        }
    }
}

impl FrameSource for FakeSource {
    fn open(&mut self) -> Result<SourceInfo, SourceError> {
        if !self.available {
            return Err(SourceError::Unavailable("fake device offline".into()));
        }
        *self.opened.lock().unwrap() = true;
        Ok(SourceInfo {
            width: 4,
            height: 4,
            fps: 1.0 / self.interval.max(f64::EPSILON),
            total_frames: Some(self.count),
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Frame> + '_> {
        let interval = self.interval;
        Box::new((0..self.count).map(move |i| frame_at(i, i as f64 * interval)))
    }

    fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::shared::face::{Face, FaceMap};
use crate::shared::frame::Frame;

/// One line of a recording: the faces an engine reported for a frame index.
#[derive(Debug, Deserialize)]
struct RecordedFrame {
    frame: usize,
    #[serde(default)]
    faces: Vec<Face>,
}

/// Replays recorded engine results by frame index.
///
/// Recordings are JSON lines, one object per analyzed frame:
/// `{"frame": 12, "faces": [{"id": 0, "featurePoints": [...], ...}]}`.
/// Frames absent from the recording yield no faces.
pub struct ReplayFaceAnalyzer {
    recording: Arc<HashMap<usize, FaceMap>>,
}

impl ReplayFaceAnalyzer {
    pub fn new(recording: Arc<HashMap<usize, FaceMap>>) -> Self {
        Self { recording }
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, Box<dyn std::error::Error>> {
        let mut recording = HashMap::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: RecordedFrame = serde_json::from_str(&line)
                .map_err(|e| format!("recording line {}: {e}", line_no + 1))?;
            let faces: FaceMap = entry.faces.into_iter().map(|f| (f.id, f)).collect();
            recording.insert(entry.frame, faces);
        }
        Ok(Self::new(Arc::new(recording)))
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = std::fs::File::open(path)
            .map_err(|e| format!("cannot open recording {}: {e}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.recording.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.is_empty()
    }
}

impl FaceAnalyzer for ReplayFaceAnalyzer {
    fn analyze(&mut self, frame: &Frame) -> Result<FaceMap, Box<dyn std::error::Error>> {
        Ok(self
            .recording
            .get(&frame.index())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{frame_at, scored_face};

    #[test]
    fn test_returns_recorded_faces_for_known_frame() {
        let faces = FaceMap::from([(0, scored_face(0, 10.0)), (1, scored_face(1, 20.0))]);
        let recording = Arc::new(HashMap::from([(3, faces.clone())]));
        let mut analyzer = ReplayFaceAnalyzer::new(recording);

        assert_eq!(analyzer.analyze(&frame_at(3, 0.1)).unwrap(), faces);
    }

    #[test]
    fn test_unknown_frame_has_no_faces() {
        let mut analyzer = ReplayFaceAnalyzer::new(Arc::new(HashMap::new()));
        assert!(analyzer.analyze(&frame_at(9, 0.0)).unwrap().is_empty());
    }

    #[test]
    fn test_parses_json_lines() {
        let text = r#"
{"frame": 0, "faces": [{"id": 7, "expressions": {"smile": 55.5}, "emotions": {"joy": 80.0}}]}

{"frame": 2}
"#;
        let mut analyzer = ReplayFaceAnalyzer::from_reader(text.as_bytes()).unwrap();
        assert_eq!(analyzer.len(), 2);

        let faces = analyzer.analyze(&frame_at(0, 0.0)).unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[&7].expressions.smile, 55.5);
        assert_eq!(faces[&7].emotions.joy, 80.0);

        assert!(analyzer.analyze(&frame_at(2, 0.0)).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let text = "{\"frame\": 0}\nnot json\n";
        let err = ReplayFaceAnalyzer::from_reader(text.as_bytes())
            .err()
            .unwrap();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(ReplayFaceAnalyzer::from_path(Path::new("/nonexistent/rec.jsonl")).is_err());
    }
}

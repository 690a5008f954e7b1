use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::shared::face::FaceMap;
use crate::shared::frame::Frame;

/// Analyzer that never finds a face.
///
/// Stands in for the proprietary engine so capture, overlay and display can
/// run end to end without it.
pub struct StubFaceAnalyzer;

impl StubFaceAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StubFaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceAnalyzer for StubFaceAnalyzer {
    fn analyze(&mut self, _frame: &Frame) -> Result<FaceMap, Box<dyn std::error::Error>> {
        Ok(FaceMap::new())
    }
}

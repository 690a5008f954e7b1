//! Annotation layout for one analyzed frame.
//!
//! Composition is pure: it turns face results into a list of draw items in
//! frame pixel coordinates, and display surfaces decide how to paint them.

use crate::shared::face::{score_to_int, Face, FaceMap};
use crate::shared::rate::format_fps;

/// Vertical distance between text lines.
pub const LINE_SPACING: i32 = 10;
pub const LEFT_MARGIN: i32 = 30;
/// Distance of the fps label from the right edge.
pub const FPS_LABEL_INSET: i32 = 110;
pub const MARKER_RADIUS: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Header,
    Body,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverlayItem {
    Marker {
        x: i32,
        y: i32,
        radius: i32,
    },
    /// `y` is the text baseline.
    Text {
        text: String,
        x: i32,
        y: i32,
        style: TextStyle,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlay {
    items: Vec<OverlayItem>,
}

impl Overlay {
    pub fn items(&self) -> &[OverlayItem] {
        &self.items
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            OverlayItem::Text { text, .. } => Some(text.as_str()),
            OverlayItem::Marker { .. } => None,
        })
    }

    pub fn marker_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, OverlayItem::Marker { .. }))
            .count()
    }

    fn text(&mut self, text: impl Into<String>, x: i32, y: i32, style: TextStyle) {
        self.items.push(OverlayItem::Text {
            text: text.into(),
            x,
            y,
            style,
        });
    }
}

/// Lays out the annotation for one frame.
///
/// Face details are drawn only when exactly one face is present; the capture
/// fps label is always drawn in the bottom-right corner.
pub fn compose_overlay(faces: &FaceMap, width: u32, height: u32, capture_fps: f64) -> Overlay {
    let mut overlay = Overlay::default();

    if let (1, Some(face)) = (faces.len(), faces.values().next()) {
        draw_face(&mut overlay, face);
    }

    overlay.text(
        format!("capture fps: {}", format_fps(capture_fps)),
        width as i32 - FPS_LABEL_INSET,
        height as i32 - LEFT_MARGIN - LINE_SPACING,
        TextStyle::Body,
    );
    overlay
}

fn draw_face(overlay: &mut Overlay, face: &Face) {
    for point in &face.feature_points {
        overlay.items.push(OverlayItem::Marker {
            x: point.x as i32,
            y: point.y as i32,
            radius: MARKER_RADIUS,
        });
    }

    let mut y = LINE_SPACING;
    let mut line = |overlay: &mut Overlay, text: String, gap: i32, style: TextStyle| {
        y += gap;
        overlay.text(text, LEFT_MARGIN, y, style);
    };

    line(overlay, "MEASUREMENTS".into(), LINE_SPACING, TextStyle::Header);
    line(overlay, angles_text(face), LINE_SPACING, TextStyle::Body);

    line(overlay, "EXPRESSIONS".into(), LINE_SPACING * 2, TextStyle::Header);
    for (name, score) in face.expression_scores() {
        line(
            overlay,
            format!("{name}: {}", score_to_int(score)),
            LINE_SPACING,
            TextStyle::Body,
        );
    }

    line(overlay, "EMOTIONS".into(), LINE_SPACING * 2, TextStyle::Header);
    for (name, score) in face.emotion_scores() {
        line(
            overlay,
            format!("{name}: {}", score_to_int(score)),
            LINE_SPACING,
            TextStyle::Body,
        );
    }
}

fn angles_text(face: &Face) -> String {
    let m = &face.measurements;
    format!(
        "Pitch: {:.6} Yaw: {:.6} Roll: {:.6} InterOcularDist: {:.6}",
        m.orientation.pitch, m.orientation.yaw, m.orientation.roll, m.interocular_distance
    )
}

//! Per-face measurements produced by an analyzer for one frame.
//!
//! Expression and emotion scores are stored as named fields. Code that needs
//! them as a sequence (overlay columns, log rows) walks [`EXPRESSION_SCORES`]
//! and [`EMOTION_SCORES`], which pair each name with its accessor so the two
//! can never drift apart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type FaceId = u32;

/// All faces found in one frame, ordered by id.
pub type FaceMap = BTreeMap<FaceId, Face>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub x: f32,
    pub y: f32,
}

impl FeaturePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Head orientation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub orientation: Orientation,
    pub interocular_distance: f32,
}

/// Facial action scores, each in 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expressions {
    pub smile: f32,
    pub inner_brow_raise: f32,
    pub brow_raise: f32,
    pub brow_furrow: f32,
    pub nose_wrinkle: f32,
    pub upper_lip_raise: f32,
    pub lip_corner_depressor: f32,
    pub chin_raise: f32,
    pub lip_pucker: f32,
    pub lip_press: f32,
    pub lip_suck: f32,
    pub mouth_open: f32,
    pub smirk: f32,
    pub eye_closure: f32,
    pub attention: f32,
}

/// Composite affect scores. `valence` spans -100..=100, the rest 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emotions {
    pub joy: f32,
    pub fear: f32,
    pub disgust: f32,
    pub sadness: f32,
    pub anger: f32,
    pub surprise: f32,
    pub contempt: f32,
    pub valence: f32,
    pub engagement: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Face {
    pub id: FaceId,
    #[serde(default)]
    pub feature_points: Vec<FeaturePoint>,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub expressions: Expressions,
    #[serde(default)]
    pub emotions: Emotions,
}

/// Named accessor into a score struct.
pub struct ScoreChannel<T> {
    pub name: &'static str,
    pub read: fn(&T) -> f32,
}

macro_rules! channel {
    ($ty:ty, $name:literal, $field:ident) => {
        ScoreChannel::<$ty> {
            name: $name,
            read: |s: &$ty| s.$field,
        }
    };
}

pub const EXPRESSION_SCORES: [ScoreChannel<Expressions>; 15] = [
    channel!(Expressions, "smile", smile),
    channel!(Expressions, "innerBrowRaise", inner_brow_raise),
    channel!(Expressions, "browRaise", brow_raise),
    channel!(Expressions, "browFurrow", brow_furrow),
    channel!(Expressions, "noseWrinkle", nose_wrinkle),
    channel!(Expressions, "upperLipRaise", upper_lip_raise),
    channel!(Expressions, "lipCornerDepressor", lip_corner_depressor),
    channel!(Expressions, "chinRaise", chin_raise),
    channel!(Expressions, "lipPucker", lip_pucker),
    channel!(Expressions, "lipPress", lip_press),
    channel!(Expressions, "lipSuck", lip_suck),
    channel!(Expressions, "mouthOpen", mouth_open),
    channel!(Expressions, "smirk", smirk),
    channel!(Expressions, "eyeClosure", eye_closure),
    channel!(Expressions, "attention", attention),
];

pub const EMOTION_SCORES: [ScoreChannel<Emotions>; 9] = [
    channel!(Emotions, "joy", joy),
    channel!(Emotions, "fear", fear),
    channel!(Emotions, "disgust", disgust),
    channel!(Emotions, "sadness", sadness),
    channel!(Emotions, "anger", anger),
    channel!(Emotions, "surprise", surprise),
    channel!(Emotions, "contempt", contempt),
    channel!(Emotions, "valence", valence),
    channel!(Emotions, "engagement", engagement),
];

impl Face {
    /// Expression scores in table order, paired with their names.
    pub fn expression_scores(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        EXPRESSION_SCORES
            .iter()
            .map(|c| (c.name, (c.read)(&self.expressions)))
    }

    /// Emotion scores in table order, paired with their names.
    pub fn emotion_scores(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        EMOTION_SCORES
            .iter()
            .map(|c| (c.name, (c.read)(&self.emotions)))
    }
}

/// Truncates a score toward zero for display and logging.
pub fn score_to_int(score: f32) -> i32 {
    score as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_table_order() {
        let names: Vec<_> = EXPRESSION_SCORES.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "smile",
                "innerBrowRaise",
                "browRaise",
                "browFurrow",
                "noseWrinkle",
                "upperLipRaise",
                "lipCornerDepressor",
                "chinRaise",
                "lipPucker",
                "lipPress",
                "lipSuck",
                "mouthOpen",
                "smirk",
                "eyeClosure",
                "attention",
            ]
        );
    }

    #[test]
    fn test_emotion_table_order() {
        let names: Vec<_> = EMOTION_SCORES.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "joy",
                "fear",
                "disgust",
                "sadness",
                "anger",
                "surprise",
                "contempt",
                "valence",
                "engagement",
            ]
        );
    }

    #[test]
    fn test_accessors_read_matching_fields() {
        let face = Face {
            expressions: Expressions {
                smile: 1.0,
                lip_corner_depressor: 7.0,
                attention: 15.0,
                ..Default::default()
            },
            emotions: Emotions {
                joy: 1.0,
                valence: -8.0,
                engagement: 9.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let expr: Vec<_> = face.expression_scores().collect();
        assert_eq!(expr[0], ("smile", 1.0));
        assert_eq!(expr[6], ("lipCornerDepressor", 7.0));
        assert_eq!(expr[14], ("attention", 15.0));

        let emo: Vec<_> = face.emotion_scores().collect();
        assert_eq!(emo[0], ("joy", 1.0));
        assert_eq!(emo[7], ("valence", -8.0));
        assert_eq!(emo[8], ("engagement", 9.0));
    }

    #[test]
    fn test_score_to_int_truncates_toward_zero() {
        assert_eq!(score_to_int(99.9), 99);
        assert_eq!(score_to_int(0.4), 0);
        assert_eq!(score_to_int(-12.7), -12);
    }

    #[test]
    fn test_face_deserializes_with_missing_groups() {
        let face: Face = serde_json::from_str(
            r#"{"id":3,"featurePoints":[{"x":1.0,"y":2.0}],"expressions":{"smile":42.5}}"#,
        )
        .unwrap();
        assert_eq!(face.id, 3);
        assert_eq!(face.feature_points, vec![FeaturePoint::new(1.0, 2.0)]);
        assert_eq!(face.expressions.smile, 42.5);
        assert_eq!(face.emotions, Emotions::default());
    }
}

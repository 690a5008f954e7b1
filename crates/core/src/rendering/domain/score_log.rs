use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{LOG_DELIMITER, LOG_TIME_COLUMN};
use crate::shared::face::{score_to_int, Face, EMOTION_SCORES, EXPRESSION_SCORES};

#[derive(Error, Debug)]
pub enum ScoreLogError {
    #[error("failed to create score log {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to score log {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Semicolon-delimited log of per-frame scores for single-face frames.
///
/// The file is reopened in append mode for every row rather than held open,
/// so a crash loses at most the row being written.
#[derive(Clone, Debug)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    /// Truncates (or creates) the file and writes the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ScoreLogError> {
        let path = path.into();
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&path)?;
            writeln!(file, "{}", Self::header())
        };
        write().map_err(|source| ScoreLogError::Create {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row for `face` captured at `timestamp`.
    pub fn append(&self, face: &Face, timestamp: f64) -> Result<(), ScoreLogError> {
        let row = Self::format_row(face, timestamp);
        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
            writeln!(file, "{row}")
        };
        write().map_err(|source| ScoreLogError::Append {
            path: self.path.clone(),
            source,
        })
    }

    /// The 15 expression names, the 9 emotion names, then `time`.
    pub fn header() -> String {
        EXPRESSION_SCORES
            .iter()
            .map(|c| c.name)
            .chain(EMOTION_SCORES.iter().map(|c| c.name))
            .chain(std::iter::once(LOG_TIME_COLUMN))
            .collect::<Vec<_>>()
            .join(&LOG_DELIMITER.to_string())
    }

    /// The 24 truncated scores in table order followed by the timestamp.
    pub fn format_row(face: &Face, timestamp: f64) -> String {
        let mut row = String::new();
        for (_, score) in face.expression_scores().chain(face.emotion_scores()) {
            row.push_str(&score_to_int(score).to_string());
            row.push(LOG_DELIMITER);
        }
        row.push_str(&timestamp.to_string());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::face::{Emotions, Expressions};

    const HEADER: &str = "smile;innerBrowRaise;browRaise;browFurrow;noseWrinkle;upperLipRaise;\
lipCornerDepressor;chinRaise;lipPucker;lipPress;lipSuck;mouthOpen;smirk;eyeClosure;attention;\
joy;fear;disgust;sadness;anger;surprise;contempt;valence;engagement;time";

    fn face_with_sequential_scores() -> Face {
        Face {
            expressions: Expressions {
                smile: 0.9,
                inner_brow_raise: 1.9,
                brow_raise: 2.9,
                brow_furrow: 3.9,
                nose_wrinkle: 4.9,
                upper_lip_raise: 5.9,
                lip_corner_depressor: 6.9,
                chin_raise: 7.9,
                lip_pucker: 8.9,
                lip_press: 9.9,
                lip_suck: 10.9,
                mouth_open: 11.9,
                smirk: 12.9,
                eye_closure: 13.9,
                attention: 14.9,
            },
            emotions: Emotions {
                joy: 15.2,
                fear: 16.2,
                disgust: 17.2,
                sadness: 18.2,
                anger: 19.2,
                surprise: 20.2,
                contempt: 21.2,
                valence: 22.2,
                engagement: 23.2,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_header_has_25_tokens_in_order() {
        let header = ScoreLog::header();
        assert_eq!(header, HEADER);
        assert_eq!(header.split(';').count(), 25);
    }

    #[test]
    fn test_row_truncates_scores_in_table_order() {
        let row = ScoreLog::format_row(&face_with_sequential_scores(), 1.25);
        assert_eq!(
            row,
            "0;1;2;3;4;5;6;7;8;9;10;11;12;13;14;15;16;17;18;19;20;21;22;23;1.25"
        );
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(&path, "stale\ncontent\n").unwrap();

        ScoreLog::create(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{HEADER}\n"));
    }

    #[test]
    fn test_append_adds_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let log = ScoreLog::create(dir.path().join("log.csv")).unwrap();
        let face = face_with_sequential_scores();

        log.append(&face, 0.5).unwrap();
        log.append(&face, 1.0).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].ends_with(";23;0.5"));
        assert!(lines[2].ends_with(";23;1"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_header_survives_many_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log = ScoreLog::create(dir.path().join("log.csv")).unwrap();
        for i in 0..50 {
            log.append(&Face::default(), i as f64).unwrap();
        }
        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(text.lines().next(), Some(HEADER));
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let err = ScoreLog::create("/nonexistent/dir/log.csv").unwrap_err();
        assert!(matches!(err, ScoreLogError::Create { .. }));
    }
}

use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{FrameSource, SourceError, SourceInfo};
use crate::shared::frame::{ColorFormat, Frame};

/// Adapts a single image file to the [`FrameSource`] interface.
///
/// The image is treated as a one-frame video stamped at `t = 0`, so still
/// pictures run through the same engine and overlay path as recordings.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageFileSource {
    fn open(&mut self) -> Result<SourceInfo, SourceError> {
        if !self.path.is_file() {
            return Err(SourceError::Unavailable(format!(
                "no image at {}",
                self.path.display()
            )));
        }

        let img = image::open(&self.path)
            .map_err(|e| SourceError::Decode {
                source_name: self.path.display().to_string(),
                message: e.to_string(),
            })?
            .into_rgb8();
        let (width, height) = img.dimensions();
        self.frame = Some(Frame::new(
            img.into_raw(),
            width,
            height,
            ColorFormat::Rgb,
            0.0,
            0,
        ));

        Ok(SourceInfo {
            width,
            height,
            fps: 0.0,
            total_frames: Some(1),
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Frame> + '_> {
        if self.frame.is_none() {
            log::warn!("ImageFileSource: frames() called before open()");
        }
        Box::new(self.frame.take().into_iter())
    }

    fn close(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("test.png");
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_returns_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut source = ImageFileSource::new(&path);
        let info = source.open().unwrap();
        assert_eq!(info.width, 100);
        assert_eq!(info.height, 80);
        assert_eq!(info.fps, 0.0);
        assert_eq!(info.total_frames, Some(1));
    }

    #[test]
    fn test_open_nonexistent_is_unavailable() {
        let mut source = ImageFileSource::new("/nonexistent/test.png");
        assert!(matches!(source.open(), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn test_open_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        let mut source = ImageFileSource::new(&path);
        assert!(matches!(source.open(), Err(SourceError::Decode { .. })));
    }

    #[test]
    fn test_frames_yields_single_rgb_frame_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();

        let frames: Vec<_> = source.frames().collect();
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!(frame.index(), 0);
        assert_eq!(frame.timestamp(), 0.0);
        assert_eq!(frame.format(), ColorFormat::Rgb);
        assert_eq!(&frame.data()[..3], &[50, 100, 200]);
    }

    #[test]
    fn test_frames_without_open_is_empty() {
        let mut source = ImageFileSource::new("/nonexistent/test.png");
        assert_eq!(source.frames().count(), 0);
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();
        source.close();
        source.close();
        assert_eq!(source.frames().count(), 0);
    }
}

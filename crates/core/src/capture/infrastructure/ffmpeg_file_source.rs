use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{FrameSource, SourceError, SourceInfo};
use crate::shared::frame::{ColorFormat, Frame};

/// Decodes video files via ffmpeg-next (libavformat + libavcodec).
///
/// Each decoded picture is converted to BGR24 and stamped with its
/// presentation time in seconds.
pub struct FfmpegFileSource {
    path: PathBuf,
    state: Option<DecodeState>,
}

struct DecodeState {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
    time_base: f64,
    fps: f64,
    width: u32,
    height: u32,
}

// Safety: FfmpegFileSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegFileSource {}

impl FfmpegFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode_error(&self, e: impl std::fmt::Display) -> SourceError {
        SourceError::Decode {
            source_name: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl FrameSource for FfmpegFileSource {
    fn open(&mut self) -> Result<SourceInfo, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::Unavailable(format!(
                "no video at {}",
                self.path.display()
            )));
        }

        ffmpeg_next::init().map_err(|e| self.decode_error(e))?;
        let ictx = ffmpeg_next::format::input(&self.path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {e}", self.path.display())))?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| self.decode_error("no video stream found"))?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| self.decode_error(e))?;
        let decoder = codec_ctx
            .decoder()
            .video()
            .map_err(|e| self.decode_error(e))?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };
        let tb = stream.time_base();
        let time_base = if tb.denominator() != 0 {
            tb.numerator() as f64 / tb.denominator() as f64
        } else {
            0.0
        };
        let total_frames = match stream.frames() {
            n if n > 0 => Some(n as usize),
            _ => None,
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::BGR24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| self.decode_error(e))?;

        self.state = Some(DecodeState {
            ictx,
            decoder,
            scaler,
            video_stream_index,
            time_base,
            fps,
            width,
            height,
        });

        Ok(SourceInfo {
            width,
            height,
            fps,
            total_frames,
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Frame> + '_> {
        let Some(state) = self.state.as_mut() else {
            log::warn!("FfmpegFileSource: frames() called before open()");
            return Box::new(std::iter::empty());
        };

        Box::new(FfmpegFrameIter {
            state,
            frame_index: 0,
            flushing: false,
            done: false,
        })
    }

    fn close(&mut self) {
        self.state = None;
    }
}

/// Lazy iterator that decodes one frame at a time.
struct FfmpegFrameIter<'a> {
    state: &'a mut DecodeState,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl FfmpegFrameIter<'_> {
    fn try_receive(&mut self) -> Option<Frame> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.state.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let mut bgr_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.state.scaler.run(&decoded, &mut bgr_frame) {
            log::warn!("Frame {} could not be converted: {e}", self.frame_index);
            self.done = true;
            return None;
        }

        let timestamp = frame_timestamp(
            decoded.timestamp().or(decoded.pts()),
            self.state.time_base,
            self.frame_index,
            self.state.fps,
        );
        let pixels = extract_packed_pixels(&bgr_frame, self.state.width, self.state.height);
        let frame = Frame::new(
            pixels,
            self.state.width,
            self.state.height,
            ColorFormat::Bgr,
            timestamp,
            self.frame_index,
        );
        self.frame_index += 1;
        Some(frame)
    }
}

impl Iterator for FfmpegFrameIter<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(frame) = self.try_receive() {
            return Some(frame);
        }

        if self.flushing || self.done {
            self.done = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.state.ictx.packets().next() else {
                let _ = self.state.decoder.send_eof();
                self.flushing = true;
                if let Some(frame) = self.try_receive() {
                    return Some(frame);
                }
                self.done = true;
                return None;
            };

            if stream.index() != self.state.video_stream_index {
                continue;
            }

            if self.state.decoder.send_packet(&packet).is_err() {
                continue;
            }

            if let Some(frame) = self.try_receive() {
                return Some(frame);
            }
            if self.done {
                return None;
            }
        }
    }
}

/// Seconds for a decoded picture: presentation time when the container
/// provides one, otherwise the nominal position `index / fps`.
fn frame_timestamp(pts: Option<i64>, time_base: f64, index: usize, fps: f64) -> f64 {
    match pts {
        Some(pts) if time_base > 0.0 => pts as f64 * time_base,
        _ if fps > 0.0 => index as f64 / fps,
        _ => 0.0,
    }
}

/// Copies a packed 3-byte-per-pixel ffmpeg frame into a tight buffer,
/// stripping any row padding (stride > width * 3).
fn extract_packed_pixels(
    frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = frame.stride(0);
    let data = frame.data(0);
    let row_bytes = width as usize * Frame::CHANNELS;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}

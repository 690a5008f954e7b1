use std::sync::Arc;

/// Channel order of a frame's packed 3-byte pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFormat {
    Bgr,
    Rgb,
}

/// A single captured image: contiguous 3-channel bytes in row-major order,
/// stamped with its capture time in seconds since the session started.
///
/// The pixel buffer is reference-counted, so clones handed to the engine and
/// the renderer share one allocation. Frames are immutable once built.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Arc<[u8]>,
    width: u32,
    height: u32,
    format: ColorFormat,
    timestamp: f64,
    index: usize,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: ColorFormat,
        timestamp: f64,
        index: usize,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data: data.into(),
            width,
            height,
            format,
            timestamp,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Seconds since the session clock started.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the pixels in BGR order, copying only when a swap is needed.
    pub fn to_bgr(&self) -> std::borrow::Cow<'_, [u8]> {
        match self.format {
            ColorFormat::Bgr => std::borrow::Cow::Borrowed(&self.data),
            ColorFormat::Rgb => std::borrow::Cow::Owned(swap_red_blue(&self.data)),
        }
    }

    /// Returns the pixels in RGB order, copying only when a swap is needed.
    pub fn to_rgb(&self) -> std::borrow::Cow<'_, [u8]> {
        match self.format {
            ColorFormat::Rgb => std::borrow::Cow::Borrowed(&self.data),
            ColorFormat::Bgr => std::borrow::Cow::Owned(swap_red_blue(&self.data)),
        }
    }
}

fn swap_red_blue(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(Frame::CHANNELS) {
        px.swap(0, 2);
    }
    out
}

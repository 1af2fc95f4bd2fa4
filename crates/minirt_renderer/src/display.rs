//! Hand-off of finished frames to whatever shows them.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::shading::unpack_rgba;

/// Receives the packed color buffer from [`crate::RenderPipeline::present`].
///
/// Pixels are `0xAABBGGRR`, row-major, top row first.
pub trait FrameSink {
    fn show(&mut self, width: u32, height: u32, pixels: &[u32]) -> io::Result<()>;
}

/// Errors that can occur when saving a captured frame.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("No frame has been presented yet")]
    NoFrame,

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Frame sink that keeps the most recent frame and can write it as an image.
#[derive(Debug, Default)]
pub struct ImageSink {
    frame: Option<image::RgbaImage>,
    frames_shown: u64,
}

impl ImageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// The last presented frame.
    pub fn frame(&self) -> Option<&image::RgbaImage> {
        self.frame.as_ref()
    }

    /// Write the last presented frame; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SinkError> {
        let frame = self.frame.as_ref().ok_or(SinkError::NoFrame)?;
        frame.save(path.as_ref())?;
        log::info!(
            "Saved {}x{} frame to {}",
            frame.width(),
            frame.height(),
            path.as_ref().display()
        );
        Ok(())
    }
}

impl FrameSink for ImageSink {
    fn show(&mut self, width: u32, height: u32, pixels: &[u32]) -> io::Result<()> {
        let bytes: Vec<u8> = pixels.iter().flat_map(|&p| unpack_rgba(p)).collect();
        let frame = image::RgbaImage::from_raw(width, height, bytes).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} pixels do not fill a {}x{} frame", pixels.len(), width, height),
            )
        })?;
        self.frame = Some(frame);
        self.frames_shown += 1;
        Ok(())
    }
}

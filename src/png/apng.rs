//! Truecolor+alpha animated PNG encoding.

use std::io::Write;

use super::chunk::ChunkBuffer;
use super::filter::Scanlines;
use super::{
    validate_frames, write_frames, write_header, write_iend, EncoderOptions, DEFAULT_BUFFER_SIZE,
};
use crate::color::ColorType;
use crate::compress::compression;
use crate::error::Result;
use crate::pixmap::PixelSource;

/// Reusable encoder for RGBA APNG output.
///
/// Frames are written losslessly at 8 bits per channel. The dither option
/// has no effect here.
#[derive(Debug)]
pub struct AnimatedPngEncoder {
    chunk: ChunkBuffer,
    lines: Scanlines,
    options: EncoderOptions,
}

impl Default for AnimatedPngEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedPngEncoder {
    /// Encoder with default options.
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    /// Encoder with the given options.
    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            chunk: ChunkBuffer::with_capacity(DEFAULT_BUFFER_SIZE),
            lines: Scanlines::default(),
            options,
        }
    }

    /// Encoder whose chunk buffer starts at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chunk: ChunkBuffer::with_capacity(capacity),
            lines: Scanlines::default(),
            options: EncoderOptions::default(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Whether row 0 of each frame is written last (bottom-up bitmaps).
    pub fn set_flip_y(&mut self, flip_y: bool) {
        self.options.flip_y = flip_y;
    }

    /// Deflate level, 0-9. Checked when the next write starts.
    pub fn set_compression(&mut self, level: u8) {
        self.options.compression_level = level;
    }

    /// Write `frames` as an APNG that loops forever, showing each frame
    /// for `1 / fps` seconds.
    ///
    /// All frames must share the first frame's size.
    pub fn write<W, P>(&mut self, output: &mut W, frames: &[P], fps: u16) -> Result<()>
    where
        W: Write + ?Sized,
        P: PixelSource,
    {
        let (width, height) = validate_frames(frames, fps)?;
        let level = compression(self.options.compression_level)?;
        self.chunk.clear();
        log::debug!(
            "apng: {} frames of {}x{} at {} fps",
            frames.len(),
            width,
            height,
            fps
        );

        let Self {
            chunk,
            lines,
            options,
        } = self;
        write_header(chunk, output, width, height, ColorType::Rgba)?;
        write_frames(
            chunk,
            lines,
            output,
            level,
            frames,
            fps,
            ColorType::Rgba.bytes_per_pixel(),
            |frame, y, row| frame.read_row_rgba(options.source_row(y, height), row),
        )?;
        write_iend(chunk, output)?;
        output.flush()?;
        Ok(())
    }
}

//! 8-bit indexed PNG and APNG encoding.

use std::io::Write;

use flate2::Compression;

use super::chunk::ChunkBuffer;
use super::filter::Scanlines;
use super::{
    validate_frames, write_frames, write_header, write_iend, write_palette, write_rows,
    EncoderOptions, DEFAULT_BUFFER_SIZE, IDAT,
};
use crate::color::ColorType;
use crate::compress::compression;
use crate::error::Result;
use crate::palette::dither::ErrorDiffusion;
use crate::palette::{Dither, Palette, PaletteSource};
use crate::pixmap::{validate_dimensions, PixelSource};

/// Reusable encoder for palette-based PNG output.
///
/// The encoder keeps its chunk buffer, scanline buffers and current palette
/// between calls, so encoding many images with one instance avoids
/// reallocating. One instance must not be shared between concurrent encodes.
///
/// ```
/// use palpng::{Pixmap, Png8Encoder};
///
/// let image = Pixmap::filled(4, 4, 0xFF0000FF)?;
/// let mut encoder = Png8Encoder::new();
/// let mut png = Vec::new();
/// encoder.write(&mut png, &image, true)?;
/// assert_eq!(encoder.palette().map(|p| p.len()), Some(1));
/// # Ok::<(), palpng::Error>(())
/// ```
#[derive(Debug)]
pub struct Png8Encoder {
    chunk: ChunkBuffer,
    lines: Scanlines,
    rgba_row: Vec<u8>,
    diffusion: ErrorDiffusion,
    palette: Option<Palette>,
    options: EncoderOptions,
}

impl Default for Png8Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Png8Encoder {
    /// Encoder with default options and no palette loaded yet.
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    /// Encoder with the given options.
    pub fn with_options(options: EncoderOptions) -> Self {
        Self::build(DEFAULT_BUFFER_SIZE, options)
    }

    /// Encoder whose chunk buffer starts at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, EncoderOptions::default())
    }

    fn build(capacity: usize, options: EncoderOptions) -> Self {
        Self {
            chunk: ChunkBuffer::with_capacity(capacity),
            lines: Scanlines::default(),
            rgba_row: Vec::new(),
            diffusion: ErrorDiffusion::default(),
            palette: None,
            options,
        }
    }

    /// Current options.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Whether row 0 of the source is written last (bottom-up bitmaps).
    pub fn set_flip_y(&mut self, flip_y: bool) {
        self.options.flip_y = flip_y;
    }

    /// Deflate level, 0-9. Checked when the next write starts.
    pub fn set_compression(&mut self, level: u8) {
        self.options.compression_level = level;
    }

    /// Dithering mode for subsequent writes.
    pub fn set_dither(&mut self, dither: Dither) {
        self.options.dither = dither;
    }

    /// The palette used by the last write, or loaded with [`Self::set_palette`].
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Load a palette for writes that do not compute their own.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = Some(palette);
    }

    /// Write `pixels` as an indexed PNG.
    ///
    /// With `compute_palette`, a palette is built from the image's own
    /// colors first. Otherwise the loaded palette is reused, falling back to
    /// [`Palette::procedural`] when none has been loaded.
    pub fn write<W, P>(&mut self, output: &mut W, pixels: &P, compute_palette: bool) -> Result<()>
    where
        W: Write + ?Sized,
        P: PixelSource + ?Sized,
    {
        validate_dimensions(pixels.width(), pixels.height())?;
        let level = compression(self.options.compression_level)?;
        if compute_palette {
            self.palette = Some(Palette::analyze(pixels));
        }
        self.encode_still(output, pixels, level)
    }

    /// Write `pixels` using a palette resolved from `source`.
    ///
    /// The resolved palette stays loaded afterwards.
    pub fn write_with_palette<W, P>(
        &mut self,
        output: &mut W,
        pixels: &P,
        source: PaletteSource<'_>,
    ) -> Result<()>
    where
        W: Write + ?Sized,
        P: PixelSource + ?Sized,
    {
        validate_dimensions(pixels.width(), pixels.height())?;
        let level = compression(self.options.compression_level)?;
        self.palette = Some(Palette::resolve(source, pixels)?);
        self.encode_still(output, pixels, level)
    }

    /// Write `frames` as an indexed APNG that loops forever at `fps`.
    ///
    /// Every frame shares the loaded palette (procedural if none). Use
    /// [`Palette::analyze_all`] with [`Self::set_palette`] to fit the
    /// palette to the animation first.
    pub fn write_animated<W, P>(&mut self, output: &mut W, frames: &[P], fps: u16) -> Result<()>
    where
        W: Write + ?Sized,
        P: PixelSource,
    {
        let (width, height) = validate_frames(frames, fps)?;
        let level = compression(self.options.compression_level)?;
        self.chunk.clear();

        let Self {
            chunk,
            lines,
            rgba_row,
            diffusion,
            palette,
            options,
        } = self;
        let palette: &Palette = palette.get_or_insert_with(Palette::procedural);
        log::debug!(
            "png8: {} frames of {}x{} at {} fps, {} colors",
            frames.len(),
            width,
            height,
            fps,
            palette.len()
        );

        write_header(chunk, output, width, height, ColorType::Indexed)?;
        write_palette(chunk, output, palette)?;
        rgba_row.resize(width as usize * 4, 0);
        write_frames(
            chunk,
            lines,
            output,
            level,
            frames,
            fps,
            ColorType::Indexed.bytes_per_pixel(),
            |frame, y, row| {
                index_row(frame, y, row, rgba_row, diffusion, palette, options);
            },
        )?;
        write_iend(chunk, output)?;
        output.flush()?;
        Ok(())
    }

    fn encode_still<W, P>(&mut self, output: &mut W, pixels: &P, level: Compression) -> Result<()>
    where
        W: Write + ?Sized,
        P: PixelSource + ?Sized,
    {
        let (width, height) = (pixels.width(), pixels.height());
        self.chunk.clear();

        let Self {
            chunk,
            lines,
            rgba_row,
            diffusion,
            palette,
            options,
        } = self;
        let palette: &Palette = palette.get_or_insert_with(Palette::procedural);
        log::debug!(
            "png8: {}x{}, {} colors, transparent: {}, dither: {:?}",
            width,
            height,
            palette.len(),
            palette.has_transparent(),
            options.dither
        );

        write_header(chunk, output, width, height, ColorType::Indexed)?;
        write_palette(chunk, output, palette)?;
        rgba_row.resize(width as usize * 4, 0);
        chunk.begin(IDAT);
        write_rows(
            chunk,
            lines,
            output,
            level,
            width,
            height,
            ColorType::Indexed.bytes_per_pixel(),
            |y, row| index_row(pixels, y, row, rgba_row, diffusion, palette, options),
        )?;
        write_iend(chunk, output)?;
        output.flush()?;
        Ok(())
    }
}

/// Fill `out` with the palette indices of output row `y`.
fn index_row<P: PixelSource + ?Sized>(
    pixels: &P,
    y: u32,
    out: &mut [u8],
    rgba_row: &mut [u8],
    diffusion: &mut ErrorDiffusion,
    palette: &Palette,
    options: &EncoderOptions,
) {
    let source_y = options.source_row(y, pixels.height());
    pixels.read_row_rgba(source_y, rgba_row);

    match options.dither {
        Dither::None => {
            for (slot, px) in out.iter_mut().zip(rgba_row.chunks_exact(4)) {
                *slot = palette.index_of(u32::from_be_bytes([px[0], px[1], px[2], px[3]]));
            }
        }
        Dither::FloydSteinberg { strength } => {
            if y == 0 {
                diffusion.start(pixels.width());
            }
            diffusion.index_row(palette, rgba_row, out, strength);
        }
    }
}

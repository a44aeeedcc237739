//! PNG and APNG encoders.
//!
//! Implements PNG encoding according to the PNG specification (RFC 2083)
//! plus the APNG animation chunks (`acTL`, `fcTL`, `fdAT`). Every scanline
//! is Paeth-filtered and the image data goes out as a single zlib stream
//! per image or frame.

pub mod apng;
pub mod chunk;
pub mod filter;
pub mod png8;

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::color::{unpack_rgba, ColorType};
use crate::compress::DEFAULT_LEVEL;
use crate::error::{Error, Result};
use crate::palette::{Dither, Palette};
use crate::pixmap::{validate_dimensions, PixelSource};

pub use apng::AnimatedPngEncoder;
pub use chunk::ChunkBuffer;
pub use png8::Png8Encoder;

use filter::Scanlines;

/// PNG file signature (magic bytes).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub(crate) const IHDR: &[u8; 4] = b"IHDR";
pub(crate) const PLTE: &[u8; 4] = b"PLTE";
pub(crate) const TRNS: &[u8; 4] = b"tRNS";
pub(crate) const ACTL: &[u8; 4] = b"acTL";
pub(crate) const FCTL: &[u8; 4] = b"fcTL";
pub(crate) const IDAT: &[u8; 4] = b"IDAT";
pub(crate) const FDAT: &[u8; 4] = b"fdAT";
pub(crate) const IEND: &[u8; 4] = b"IEND";

/// Default size of an encoder's chunk buffer before it has to grow.
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 128;

/// Encoder settings shared by the still and animated encoders.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderOptions {
    /// Write source rows bottom-up, for bitmaps stored with row 0 at the
    /// bottom. Default true.
    pub flip_y: bool,
    /// Deflate level, 0 (stored) to 9 (smallest). Default 6.
    pub compression_level: u8,
    /// Dithering for indexed output; ignored for truecolor output.
    pub dither: Dither,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            flip_y: true,
            compression_level: DEFAULT_LEVEL,
            dither: Dither::None,
        }
    }
}

impl EncoderOptions {
    /// Speed-focused preset.
    pub fn fast() -> Self {
        Self {
            compression_level: 1,
            ..Self::default()
        }
    }

    /// zlib's default trade-off (matches `Default`).
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Highest compression preset; slowest.
    pub fn max_compression() -> Self {
        Self {
            compression_level: 9,
            ..Self::default()
        }
    }

    /// Options for bitmaps whose row 0 is the top row.
    pub fn top_down(mut self) -> Self {
        self.flip_y = false;
        self
    }

    /// Source row that lands on output row `y` of an image `height` tall.
    #[inline]
    pub(crate) fn source_row(&self, y: u32, height: u32) -> u32 {
        if self.flip_y {
            height - 1 - y
        } else {
            y
        }
    }
}

/// Encode a still image as an 8-bit indexed PNG using a palette computed
/// from its colors.
pub fn encode_png8<P: PixelSource + ?Sized>(
    pixels: &P,
    options: &EncoderOptions,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut encoder = Png8Encoder::with_options(options.clone());
    encoder.write(&mut output, pixels, true)?;
    Ok(output)
}

/// Encode frames as a truecolor+alpha animated PNG.
pub fn encode_apng<P: PixelSource>(
    frames: &[P],
    fps: u16,
    options: &EncoderOptions,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut encoder = AnimatedPngEncoder::with_options(options.clone());
    encoder.write(&mut output, frames, fps)?;
    Ok(output)
}

/// Check that `frames` is non-empty and uniformly sized; returns the size.
pub(crate) fn validate_frames<P: PixelSource>(frames: &[P], fps: u16) -> Result<(u32, u32)> {
    let first = frames.first().ok_or(Error::NoFrames)?;
    let (width, height) = (first.width(), first.height());
    validate_dimensions(width, height)?;
    if fps == 0 {
        return Err(Error::InvalidFrameRate(fps));
    }
    for (index, frame) in frames.iter().enumerate().skip(1) {
        if frame.width() != width || frame.height() != height {
            return Err(Error::FrameSizeMismatch {
                index,
                expected_width: width,
                expected_height: height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
    }
    Ok((width, height))
}

/// Write the signature and IHDR chunk.
pub(crate) fn write_header<W: Write + ?Sized>(
    chunk: &mut ChunkBuffer,
    output: &mut W,
    width: u32,
    height: u32,
    color_type: ColorType,
) -> Result<()> {
    output.write_all(&PNG_SIGNATURE)?;

    chunk.begin(IHDR);
    chunk.put_u32(width);
    chunk.put_u32(height);
    chunk.put_u8(color_type.png_bit_depth());
    chunk.put_u8(color_type.png_color_type());
    chunk.put_u8(0); // compression: deflate
    chunk.put_u8(0); // filter method: adaptive
    chunk.put_u8(0); // interlace: none
    chunk.end_chunk(output)?;
    Ok(())
}

/// Write PLTE, plus tRNS when index 0 is the transparent sentinel.
pub(crate) fn write_palette<W: Write + ?Sized>(
    chunk: &mut ChunkBuffer,
    output: &mut W,
    palette: &Palette,
) -> Result<()> {
    chunk.begin(PLTE);
    for &color in palette.colors() {
        let [r, g, b, _] = unpack_rgba(color);
        chunk.put(&[r, g, b]);
    }
    chunk.end_chunk(output)?;

    if palette.has_transparent() {
        chunk.begin(TRNS);
        chunk.put_u8(0);
        chunk.end_chunk(output)?;
    }
    Ok(())
}

/// Write the animation control chunk. `loops` of 0 repeats forever.
pub(crate) fn write_actl<W: Write + ?Sized>(
    chunk: &mut ChunkBuffer,
    output: &mut W,
    frames: u32,
    loops: u32,
) -> Result<()> {
    chunk.begin(ACTL);
    chunk.put_u32(frames);
    chunk.put_u32(loops);
    chunk.end_chunk(output)?;
    Ok(())
}

/// Write a full-canvas frame control chunk lasting `1 / fps` seconds.
pub(crate) fn write_fctl<W: Write + ?Sized>(
    chunk: &mut ChunkBuffer,
    output: &mut W,
    sequence: u32,
    width: u32,
    height: u32,
    fps: u16,
) -> Result<()> {
    chunk.begin(FCTL);
    chunk.put_u32(sequence);
    chunk.put_u32(width);
    chunk.put_u32(height);
    chunk.put_u32(0); // x offset
    chunk.put_u32(0); // y offset
    chunk.put_u16(1); // delay numerator
    chunk.put_u16(fps); // delay denominator
    chunk.put_u8(0); // dispose op: none
    chunk.put_u8(0); // blend op: source
    chunk.end_chunk(output)?;
    Ok(())
}

/// Compress `height` Paeth-filtered rows into the chunk already begun in
/// `chunk`, then emit it.
///
/// `fill_row(y, row)` supplies the raw bytes of output row `y`. A fresh
/// zlib stream is used on every call.
#[allow(clippy::too_many_arguments)]
pub(crate) fn write_rows<W: Write + ?Sized>(
    chunk: &mut ChunkBuffer,
    lines: &mut Scanlines,
    output: &mut W,
    level: Compression,
    width: u32,
    height: u32,
    bpp: usize,
    mut fill_row: impl FnMut(u32, &mut [u8]),
) -> Result<()> {
    lines.start(width, bpp);
    let mut zlib = ZlibEncoder::new(&mut *chunk, level);
    for y in 0..height {
        fill_row(y, lines.current_mut());
        lines.emit(&mut zlib)?;
    }
    zlib.finish()?;
    chunk.end_chunk(output)?;
    Ok(())
}

/// Write the animation body: acTL, then fcTL + IDAT/fdAT per frame.
///
/// `fcTL` and `fdAT` share one sequence counter; `IDAT` carries none.
/// `fill_row(frame, y, row)` supplies output row `y` of `frame`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn write_frames<W: Write + ?Sized, P: PixelSource>(
    chunk: &mut ChunkBuffer,
    lines: &mut Scanlines,
    output: &mut W,
    level: Compression,
    frames: &[P],
    fps: u16,
    bpp: usize,
    mut fill_row: impl FnMut(&P, u32, &mut [u8]),
) -> Result<()> {
    let (width, height) = (frames[0].width(), frames[0].height());
    write_actl(chunk, output, frames.len() as u32, 0)?;

    let mut sequence = 0u32;
    for (i, frame) in frames.iter().enumerate() {
        write_fctl(chunk, output, sequence, width, height, fps)?;
        sequence += 1;

        if i == 0 {
            chunk.begin(IDAT);
        } else {
            chunk.begin(FDAT);
            chunk.put_u32(sequence);
            sequence += 1;
        }
        write_rows(chunk, lines, output, level, width, height, bpp, |y, row| {
            fill_row(frame, y, row)
        })?;
    }
    Ok(())
}

/// Write IEND (image end) chunk.
pub(crate) fn write_iend<W: Write + ?Sized>(chunk: &mut ChunkBuffer, output: &mut W) -> Result<()> {
    chunk.begin(IEND);
    chunk.end_chunk(output)?;
    Ok(())
}

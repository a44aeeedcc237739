//! Color type definitions and packed RGBA8888 helpers.
//!
//! Pixels travel through the encoder as `u32` values laid out `0xRRGGBBAA`.
//! Palette lookups coarsen RGB to 5 bits per channel, giving 32768 buckets
//! addressed as `r << 10 | g << 5 | b`.

/// Number of quantized RGB buckets (32 levels per channel).
pub const BUCKET_COUNT: usize = 1 << 15;

/// Output color types this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    /// Palette indices, 1 byte per pixel.
    Indexed,
    /// RGBA, 4 bytes per pixel.
    Rgba,
}

impl ColorType {
    /// Returns the number of bytes per pixel for this color type.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Indexed => 1,
            ColorType::Rgba => 4,
        }
    }

    /// Returns the PNG color type value.
    #[inline]
    pub(crate) const fn png_color_type(self) -> u8 {
        match self {
            ColorType::Indexed => 3,
            ColorType::Rgba => 6,
        }
    }

    /// Returns the bit depth for PNG encoding.
    #[inline]
    pub(crate) const fn png_bit_depth(self) -> u8 {
        8 // We only support 8-bit depth
    }
}

/// Pack four channels into `0xRRGGBBAA`.
#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32
}

/// Split `0xRRGGBBAA` into `[r, g, b, a]`.
#[inline]
pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

/// Binary transparency test used for indexed output.
///
/// A pixel counts as transparent when the top bit of its alpha is clear, so
/// alpha 0..=127 is transparent and 128..=255 is opaque.
#[inline]
pub const fn is_transparent(color: u32) -> bool {
    color & 0x80 == 0
}

/// Quantized bucket of an RGB triple (5 bits per channel).
#[inline]
pub const fn bucket_index(r: u8, g: u8, b: u8) -> usize {
    ((r as usize) >> 3) << 10 | ((g as usize) >> 3) << 5 | (b as usize) >> 3
}

/// Quantized bucket of a packed color; alpha is ignored.
#[inline]
pub const fn bucket_of(color: u32) -> usize {
    ((color >> 17) & 0x7C00 | (color >> 14) & 0x3E0 | (color >> 11) & 0x1F) as usize
}

/// The 5-bit channel coordinates of a bucket.
#[inline]
pub const fn bucket_components(bucket: usize) -> [u8; 3] {
    [
        ((bucket >> 10) & 0x1F) as u8,
        ((bucket >> 5) & 0x1F) as u8,
        (bucket & 0x1F) as u8,
    ]
}

impl TryFrom<u8> for ColorType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(ColorType::Indexed),
            6 => Ok(ColorType::Rgba),
            other => Err(other),
        }
    }
}

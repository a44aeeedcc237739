//! Rectangular RGBA8888 pixel sources.
//!
//! The encoders only need to read pixels, so any bitmap type can be encoded
//! by implementing [`PixelSource`]. [`Pixmap`] is the owned buffer used by
//! the convenience API, the CLI, and the tests.

use crate::color::unpack_rgba;
use crate::error::{Error, Result};

/// Maximum supported image dimension.
pub const MAX_DIMENSION: u32 = 1 << 24;

/// A readable rectangle of RGBA8888 pixels.
///
/// Row 0 is whichever row the caller's bitmap stores first; the encoders'
/// `flip_y` option decides whether it lands at the top or the bottom of
/// the PNG.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Pixel at `(x, y)` packed as `0xRRGGBBAA`.
    fn pixel(&self, x: u32, y: u32) -> u32;

    /// Copy row `y` as RGBA bytes into `out`, which holds `width * 4` bytes.
    fn read_row_rgba(&self, y: u32, out: &mut [u8]) {
        for (x, px) in out.chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&unpack_rgba(self.pixel(x as u32, y)));
        }
    }
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        (**self).pixel(x, y)
    }

    fn read_row_rgba(&self, y: u32, out: &mut [u8]) {
        (**self).read_row_rgba(y, out)
    }
}

/// Reject zero-sized or oversized images.
pub(crate) fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::ImageTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// An owned RGBA8888 image stored row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Wrap raw RGBA bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        validate_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::InvalidDataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An image where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: u32) -> Result<Self> {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u32) -> Result<Self> {
        validate_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&unpack_rgba(f(x, y)));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&unpack_rgba(color));
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the pixmap, returning its RGBA bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl PixelSource for Pixmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> u32 {
        let i = self.offset(x, y);
        u32::from_be_bytes([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    fn read_row_rgba(&self, y: u32, out: &mut [u8]) {
        let row_bytes = self.width as usize * 4;
        let start = y as usize * row_bytes;
        out[..row_bytes].copy_from_slice(&self.data[start..start + row_bytes]);
    }
}

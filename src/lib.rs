//! # palpng
//!
//! Indexed-color PNG and animated PNG encoding.
//!
//! The encoders turn any RGBA8888 [`PixelSource`] into a PNG byte stream:
//! every scanline is Paeth-filtered and Deflate-compressed, and every chunk
//! carries its CRC32.
//!
//! ## Features
//!
//! - **PNG8 output** with a palette taken from the image, supplied by the
//!   caller, or the built-in 253-color grid
//! - **Palette reduction** to 256 entries using a 32×32×32 bucket grid with
//!   nearest-color fallback
//! - **APNG output** in truecolor+alpha or indexed form
//! - Optional Floyd–Steinberg dithering for indexed output
//!
//! ## Example
//!
//! ```rust
//! use palpng::{png, EncoderOptions, Pixmap};
//!
//! // 2x2 image, two colors.
//! let image = Pixmap::from_fn(2, 2, |x, _| if x == 0 { 0xFF0000FF } else { 0x0000FFFF })?;
//! let png8 = png::encode_png8(&image, &EncoderOptions::default())?;
//!
//! // Three identical frames at 10 fps.
//! let frames = vec![image.clone(); 3];
//! let apng = png::encode_apng(&frames, 10, &EncoderOptions::default())?;
//! assert!(apng.len() > png8.len());
//! # Ok::<(), palpng::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod color;
pub mod compress;
pub mod error;
pub mod palette;
pub mod pixmap;
pub mod png;

pub use color::ColorType;
pub use error::{Error, Result};
pub use palette::{Dither, Palette, PaletteSource};
pub use pixmap::{PixelSource, Pixmap};
pub use png::{AnimatedPngEncoder, EncoderOptions, Png8Encoder};

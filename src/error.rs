//! Error types for the palpng library.

use std::io;

use thiserror::Error;

/// Result type alias for palpng operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding.
///
/// Every variant except [`Error::Io`] describes input that was rejected before
/// any byte reached the output sink.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The output sink failed. The stream may hold a partial file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid image dimensions (zero width or height).
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// Image dimensions exceed maximum supported size.
    #[error("Image {width}x{height} exceeds maximum dimension {max}")]
    ImageTooLarge {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Maximum supported dimension.
        max: u32,
    },

    /// Pixel data length doesn't match expected size.
    #[error("Invalid pixel data length: expected {expected} bytes, got {actual}")]
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        actual: usize,
    },

    /// An animation was requested with no frames.
    #[error("No frames to encode")]
    NoFrames,

    /// A frame's size differs from the first frame.
    #[error(
        "Frame {index} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    FrameSizeMismatch {
        /// Index of the offending frame.
        index: usize,
        /// Width of the first frame.
        expected_width: u32,
        /// Height of the first frame.
        expected_height: u32,
        /// Width of the offending frame.
        actual_width: u32,
        /// Height of the offending frame.
        actual_height: u32,
    },

    /// An explicit palette had no entries.
    #[error("Palette has no usable entries")]
    EmptyPalette,

    /// An explicit palette had more than 256 entries.
    #[error("Palette has {len} entries, at most 256 are allowed")]
    PaletteTooLarge {
        /// Number of entries supplied.
        len: usize,
    },

    /// An explicit palette had a transparent color after entry 0.
    #[error("Palette entry {index} is transparent, only entry 0 may be")]
    MisplacedTransparent {
        /// Index of the offending entry.
        index: usize,
    },

    /// Deflate level outside 0-9.
    #[error("Invalid compression level {0}: must be 0-9")]
    InvalidCompressionLevel(u8),

    /// Frame rate of zero.
    #[error("Invalid frame rate {0}: must be at least 1")]
    InvalidFrameRate(u16),
}

impl Error {
    /// True for errors caused by the caller's input rather than the sink.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

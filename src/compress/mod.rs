//! Checksums and the Deflate settings shared by every encoder.
//!
//! Deflate itself comes from `flate2`; each image or frame gets its own
//! zlib stream so chunks stay independently decodable.

pub mod crc32;

pub use crc32::{crc32, Crc32};

use flate2::Compression;

use crate::error::{Error, Result};

/// zlib's default level.
pub const DEFAULT_LEVEL: u8 = 6;

/// Map a 0-9 level onto `flate2`'s setting.
pub(crate) fn compression(level: u8) -> Result<Compression> {
    if level > 9 {
        return Err(Error::InvalidCompressionLevel(level));
    }
    Ok(Compression::new(level as u32))
}

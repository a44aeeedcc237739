//! PNG chunk framing.
//!
//! A [`ChunkBuffer`] collects one chunk at a time: the 4-byte type tag
//! followed by the payload. [`ChunkBuffer::end_chunk`] then emits
//! length, tag, payload, and CRC32 to the output and empties the buffer.

use std::io::{self, Write};

use crate::compress::Crc32;

/// Accumulates a single chunk (type tag + payload) and its running CRC.
///
/// Implements [`Write`] so a zlib stream can compress straight into the
/// payload.
#[derive(Debug)]
pub struct ChunkBuffer {
    bytes: Vec<u8>,
    crc: Crc32,
}

impl ChunkBuffer {
    /// Create a buffer with room for `capacity` bytes before it grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            crc: Crc32::new(),
        }
    }

    /// Start a chunk by writing its type tag.
    ///
    /// The previous chunk must already have been ended.
    pub fn begin(&mut self, chunk_type: &[u8; 4]) {
        debug_assert!(self.bytes.is_empty(), "previous chunk was not ended");
        self.put(chunk_type);
    }

    /// Append a big-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.put(&value.to_be_bytes());
    }

    /// Append a big-endian `u16`.
    pub fn put_u16(&mut self, value: u16) {
        self.put(&value.to_be_bytes());
    }

    /// Append a single byte.
    pub fn put_u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    /// Append raw payload bytes.
    #[inline]
    pub fn put(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
        self.crc.update(data);
    }

    /// Payload length so far, not counting the type tag.
    pub fn payload_len(&self) -> usize {
        self.bytes.len().saturating_sub(4)
    }

    /// Emit the buffered chunk to `output` and reset for the next one.
    ///
    /// Writes the 4-byte big-endian payload length, the tag and payload
    /// verbatim, then the big-endian CRC32 over tag and payload. The buffer
    /// is cleared even when `output` fails, so the next encode starts clean.
    pub fn end_chunk<W: Write + ?Sized>(&mut self, output: &mut W) -> io::Result<()> {
        let length = self.payload_len() as u32;
        let crc = self.crc.value();
        log::trace!(
            "chunk {} ({} bytes)",
            String::from_utf8_lossy(&self.bytes[..self.bytes.len().min(4)]),
            length
        );

        let result = (|| {
            output.write_all(&length.to_be_bytes())?;
            output.write_all(&self.bytes)?;
            output.write_all(&crc.to_be_bytes())
        })();

        self.clear();
        result
    }

    /// Drop any partially built chunk.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.crc.reset();
    }
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        Self::with_capacity(128 * 128)
    }
}

impl Write for ChunkBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.put(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

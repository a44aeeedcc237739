//! CRC32 checksum implementation (PNG uses CRC-32/ISO-HDLC).

use std::sync::LazyLock;

/// Byte-at-a-time table for the reflected polynomial 0xEDB88320.
static CRC_TABLE: LazyLock<[u32; 256]> = LazyLock::new(|| {
    let mut table = [0u32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut crc = i as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
        *entry = crc;
    }
    table
});

/// Calculate the CRC32 of `data` in one call.
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}

/// Running CRC32 over a chunk's type tag and payload.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    /// Create a new CRC32 calculator.
    pub const fn new() -> Self {
        Self { crc: 0xFFFF_FFFF }
    }

    /// Update the CRC with more data.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let table = &*CRC_TABLE;
        let mut crc = self.crc;
        for &byte in data {
            crc = (crc >> 8) ^ table[((crc ^ byte as u32) & 0xFF) as usize];
        }
        self.crc = crc;
    }

    /// Current checksum of everything fed so far.
    #[inline]
    pub fn value(&self) -> u32 {
        self.crc ^ 0xFFFF_FFFF
    }

    /// Finalize and return the CRC value.
    #[inline]
    pub fn finalize(self) -> u32 {
        self.value()
    }

    /// Forget everything fed so far.
    #[inline]
    pub fn reset(&mut self) {
        self.crc = 0xFFFF_FFFF;
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

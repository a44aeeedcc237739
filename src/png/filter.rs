//! Paeth scanline filtering.
//!
//! Every row this crate writes uses filter type 4 (Paeth). Rows are
//! filtered against the previous raw row; the first row of each image or
//! frame is filtered against zeros.

use std::io::{self, Write};

/// Filter type byte for Paeth, as defined by the PNG specification.
pub const FILTER_PAETH: u8 = 4;

/// Paeth predictor: whichever of left, above, upper-left is closest to
/// `a + b - c`, preferring `a`, then `b`.
#[inline]
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Paeth-filter `row` against `prev_row` into `output` (same length).
pub fn filter_paeth(row: &[u8], prev_row: &[u8], bpp: usize, output: &mut [u8]) {
    debug_assert_eq!(row.len(), prev_row.len());
    debug_assert_eq!(row.len(), output.len());

    let head = bpp.min(row.len());
    // No left neighbour: the predictor collapses to the byte above.
    for i in 0..head {
        output[i] = row[i].wrapping_sub(paeth_predictor(0, prev_row[i], 0));
    }
    for i in head..row.len() {
        let pred = paeth_predictor(row[i - bpp], prev_row[i], prev_row[i - bpp]);
        output[i] = row[i].wrapping_sub(pred);
    }
}

/// Undo [`filter_paeth`] in place, given the already reconstructed `prev_row`.
pub fn unfilter_paeth(row: &mut [u8], prev_row: &[u8], bpp: usize) {
    debug_assert_eq!(row.len(), prev_row.len());

    for i in 0..row.len() {
        let a = if i >= bpp { row[i - bpp] } else { 0 };
        let c = if i >= bpp { prev_row[i - bpp] } else { 0 };
        row[i] = row[i].wrapping_add(paeth_predictor(a, prev_row[i], c));
    }
}

/// Reusable row buffers for one encoder.
///
/// Buffers only ever grow; [`Scanlines::start`] zeroes the previous row so
/// each image or frame filters its first row against zeros.
#[derive(Debug, Default)]
pub struct Scanlines {
    current: Vec<u8>,
    previous: Vec<u8>,
    filtered: Vec<u8>,
    row_len: usize,
    bpp: usize,
}

impl Scanlines {
    /// Prepare for rows of `width` pixels at `bpp` bytes each.
    pub fn start(&mut self, width: u32, bpp: usize) {
        let row_len = width as usize * bpp;
        if self.current.len() < row_len {
            self.current.resize(row_len, 0);
            self.previous.resize(row_len, 0);
            self.filtered.resize(row_len, 0);
        }
        self.previous[..row_len].fill(0);
        self.row_len = row_len;
        self.bpp = bpp;
    }

    /// The raw row to fill before calling [`Scanlines::emit`].
    #[inline]
    pub fn current_mut(&mut self) -> &mut [u8] {
        &mut self.current[..self.row_len]
    }

    /// The raw row that was emitted last (zeros before the first row).
    #[inline]
    pub fn previous(&self) -> &[u8] {
        &self.previous[..self.row_len]
    }

    /// Filter the current row, write filter byte + filtered bytes to `sink`,
    /// and make the current row the new previous row.
    pub fn emit<W: Write + ?Sized>(&mut self, sink: &mut W) -> io::Result<()> {
        let n = self.row_len;
        filter_paeth(
            &self.current[..n],
            &self.previous[..n],
            self.bpp,
            &mut self.filtered[..n],
        );
        sink.write_all(&[FILTER_PAETH])?;
        sink.write_all(&self.filtered[..n])?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(())
    }
}

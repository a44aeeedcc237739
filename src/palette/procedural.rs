//! The built-in 253-entry palette: transparency plus a 6×7×6 RGB grid.
//!
//! Each 5-bit channel level is rounded down to 6 (red, blue) or 7 (green)
//! representative levels, so the bucket grid partitions exactly and needs
//! no distance search.

use super::Palette;
use crate::color::{bucket_components, pack_rgba, BUCKET_COUNT};

const RED_LEVELS: usize = 6;
const GREEN_LEVELS: usize = 7;
const BLUE_LEVELS: usize = 6;

/// Grid entries plus the transparent sentinel at index 0.
pub const PROCEDURAL_LEN: usize = 1 + RED_LEVELS * GREEN_LEVELS * BLUE_LEVELS;

/// Round each 5-bit level `0..32` to the nearest of `levels` steps.
const fn shrink_table(levels: usize) -> [u8; 32] {
    let top = (levels - 1) as u32;
    let mut table = [0u8; 32];
    let mut v = 0;
    while v < 32 {
        table[v] = ((v as u32 * top + 15) / 31) as u8;
        v += 1;
    }
    table
}

/// Evenly spaced 8-bit values for `levels` steps.
const fn level_values<const N: usize>() -> [u8; N] {
    let top = (N - 1) as u32;
    let mut values = [0u8; N];
    let mut i = 0;
    while i < N {
        values[i] = ((i as u32 * 255 + top / 2) / top) as u8;
        i += 1;
    }
    values
}

static SHRINK_RED: [u8; 32] = shrink_table(RED_LEVELS);
static SHRINK_GREEN: [u8; 32] = shrink_table(GREEN_LEVELS);
static SHRINK_BLUE: [u8; 32] = shrink_table(BLUE_LEVELS);

static RED_VALUES: [u8; RED_LEVELS] = level_values::<RED_LEVELS>();
static GREEN_VALUES: [u8; GREEN_LEVELS] = level_values::<GREEN_LEVELS>();
static BLUE_VALUES: [u8; BLUE_LEVELS] = level_values::<BLUE_LEVELS>();

#[inline]
fn grid_index(r: usize, g: usize, b: usize) -> usize {
    1 + (r * GREEN_LEVELS + g) * BLUE_LEVELS + b
}

impl Palette {
    /// The default palette used when no other palette was chosen.
    ///
    /// Index 0 is transparent; the remaining 252 entries enumerate the
    /// 6×7×6 grid in red-major order.
    pub fn procedural() -> Self {
        let mut colors = Vec::with_capacity(PROCEDURAL_LEN);
        colors.push(0);
        for &r in &RED_VALUES {
            for &g in &GREEN_VALUES {
                for &b in &BLUE_VALUES {
                    colors.push(pack_rgba(r, g, b, 0xFF));
                }
            }
        }

        let mut mapping = vec![0u8; BUCKET_COUNT].into_boxed_slice();
        for (bucket, slot) in mapping.iter_mut().enumerate() {
            let [r, g, b] = bucket_components(bucket);
            *slot = grid_index(
                SHRINK_RED[r as usize] as usize,
                SHRINK_GREEN[g as usize] as usize,
                SHRINK_BLUE[b as usize] as usize,
            ) as u8;
        }

        Palette::from_parts(colors, mapping, true)
    }
}

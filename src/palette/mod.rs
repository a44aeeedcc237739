//! Palette construction and RGB → index lookup.
//!
//! A [`Palette`] holds up to 256 RGBA8888 entries together with a
//! 32×32×32 bucket grid that maps any 5:5:5-quantized RGB value to an
//! entry in one table lookup. Index 0 may be a transparent sentinel; it is
//! never chosen for opaque pixels.
//!
//! Three ways to build one:
//! - [`Palette::exact`] from caller-supplied colors,
//! - [`Palette::procedural`], a fixed 6×7×6 RGB grid plus transparency,
//! - [`Palette::analyze`] from the colors actually present in an image.

mod analyze;
pub mod dither;
mod procedural;

use std::collections::HashMap;

use crate::color::{bucket_components, bucket_of, is_transparent, BUCKET_COUNT};
use crate::error::{Error, Result};
use crate::pixmap::PixelSource;

pub use analyze::Histogram;
pub use dither::Dither;

/// Maximum number of palette entries in an 8-bit PNG.
pub const MAX_COLORS: usize = 256;

/// Where the encoder's palette comes from, resolved once per write.
#[derive(Debug, Clone, Copy)]
pub enum PaletteSource<'a> {
    /// Use exactly these RGBA8888 colors.
    Explicit(&'a [u32]),
    /// Count the colors of the image being written.
    FromImage,
    /// The built-in 253-entry grid.
    Procedural,
}

/// An indexed-color table plus its lookup structures.
#[derive(Clone)]
pub struct Palette {
    colors: Vec<u32>,
    mapping: Box<[u8]>,
    exact: HashMap<u32, u8>,
    transparent: bool,
}

impl Palette {
    /// Build a palette from caller-supplied colors.
    ///
    /// Every color becomes an entry, in order. If the first color is
    /// transparent it becomes the transparent sentinel. Only entry 0 may be
    /// transparent, and at least one opaque entry is required. Buckets that
    /// hold no supplied color take the nearest entry, lowest index on ties.
    pub fn exact(colors: &[u32]) -> Result<Self> {
        if colors.len() > MAX_COLORS {
            return Err(Error::PaletteTooLarge { len: colors.len() });
        }
        let transparent = colors.first().is_some_and(|&c| is_transparent(c));
        if colors.len() <= usize::from(transparent) {
            return Err(Error::EmptyPalette);
        }
        if let Some(index) = colors.iter().skip(1).position(|&c| is_transparent(c)) {
            return Err(Error::MisplacedTransparent { index: index + 1 });
        }
        Ok(Self::from_entries(colors.to_vec(), transparent, true))
    }

    /// Count the colors of `pixels` and build a palette from them.
    ///
    /// Images with at most 256 distinct colors (255 when any pixel is
    /// transparent) keep every color exactly. Larger images keep the most
    /// frequent quantized buckets.
    pub fn analyze<P: PixelSource + ?Sized>(pixels: &P) -> Self {
        let mut histogram = Histogram::new();
        histogram.add(pixels);
        histogram.build()
    }

    /// Like [`Palette::analyze`], but counts every frame of an animation.
    pub fn analyze_all<P: PixelSource>(frames: &[P]) -> Self {
        let mut histogram = Histogram::new();
        for frame in frames {
            histogram.add(frame);
        }
        histogram.build()
    }

    /// Resolve a [`PaletteSource`] against the image about to be written.
    pub fn resolve<P: PixelSource + ?Sized>(source: PaletteSource<'_>, pixels: &P) -> Result<Self> {
        match source {
            PaletteSource::Explicit(colors) => Self::exact(colors),
            PaletteSource::FromImage => Ok(Self::analyze(pixels)),
            PaletteSource::Procedural => Ok(Self::procedural()),
        }
    }

    /// Assemble a palette whose entries are final.
    ///
    /// Buckets containing an entry map to the first such entry; the rest are
    /// filled by nearest-color search. With `exact_lookup`, opaque entries are
    /// also registered for exact RGB matches ahead of the bucket grid.
    pub(crate) fn from_entries(colors: Vec<u32>, transparent: bool, exact_lookup: bool) -> Self {
        let first = usize::from(transparent);
        let mut mapping = vec![0u8; BUCKET_COUNT].into_boxed_slice();
        let mut assigned = vec![false; BUCKET_COUNT];
        let mut exact = HashMap::new();

        for (i, &color) in colors.iter().enumerate().skip(first) {
            let bucket = bucket_of(color);
            if !assigned[bucket] {
                assigned[bucket] = true;
                mapping[bucket] = i as u8;
            }
            if exact_lookup {
                exact.entry(color >> 8).or_insert(i as u8);
            }
        }
        fill_nearest(&mut mapping, &assigned, &colors, first);

        Self {
            colors,
            mapping,
            exact,
            transparent,
        }
    }

    /// Assemble a palette whose bucket grid is already complete.
    pub(crate) fn from_parts(colors: Vec<u32>, mapping: Box<[u8]>, transparent: bool) -> Self {
        debug_assert_eq!(mapping.len(), BUCKET_COUNT);
        Self {
            colors,
            mapping,
            exact: HashMap::new(),
            transparent,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; every palette has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries in index order, as `0xRRGGBBAA`.
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Whether index 0 is the fully transparent sentinel.
    pub fn has_transparent(&self) -> bool {
        self.transparent
    }

    /// Bucket-grid lookup for an RGB triple.
    #[inline]
    pub fn map(&self, r: u8, g: u8, b: u8) -> u8 {
        self.mapping[crate::color::bucket_index(r, g, b)]
    }

    /// Palette index for a packed pixel.
    ///
    /// Transparent pixels go to the sentinel when there is one; exact
    /// matches win over the bucket grid.
    #[inline]
    pub fn index_of(&self, color: u32) -> u8 {
        if self.transparent && is_transparent(color) {
            return 0;
        }
        if let Some(&index) = self.exact.get(&(color >> 8)) {
            return index;
        }
        self.mapping[bucket_of(color)]
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("len", &self.colors.len())
            .field("transparent", &self.transparent)
            .field("exact", &self.exact.len())
            .finish()
    }
}

/// Squared distance between two quantized colors.
#[inline]
fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Point every unassigned bucket at the closest entry in `colors[first..]`,
/// measured between quantized coordinates. The lowest index wins ties.
fn fill_nearest(mapping: &mut [u8], assigned: &[bool], colors: &[u32], first: usize) {
    let targets: Vec<[u8; 3]> = colors[first.min(colors.len())..]
        .iter()
        .map(|&c| bucket_components(bucket_of(c)))
        .collect();
    if targets.is_empty() {
        return;
    }

    for bucket in 0..BUCKET_COUNT {
        if assigned[bucket] {
            continue;
        }
        let here = bucket_components(bucket);
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, &t) in targets.iter().enumerate() {
            let d = distance(here, t);
            if d < best_dist {
                best_dist = d;
                best = i;
                if d == 0 {
                    break;
                }
            }
        }
        mapping[bucket] = (first + best) as u8;
    }
}

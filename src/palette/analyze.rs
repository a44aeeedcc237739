//! Palettes computed from image contents.

use std::collections::HashMap;

use super::{Palette, MAX_COLORS};
use crate::color::{bucket_of, is_transparent, BUCKET_COUNT};
use crate::pixmap::PixelSource;

/// Color counts gathered from one or more images.
///
/// Colors are keyed by RGB; alpha only decides whether a pixel is
/// transparent. First-appearance order is kept so that building is
/// deterministic.
#[derive(Debug, Default, Clone)]
pub struct Histogram {
    counts: HashMap<u32, u32>,
    order: Vec<u32>,
    transparent: bool,
}

impl Histogram {
    /// An empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every pixel of `pixels`, row 0 first.
    pub fn add<P: PixelSource + ?Sized>(&mut self, pixels: &P) {
        for y in 0..pixels.height() {
            for x in 0..pixels.width() {
                self.add_color(pixels.pixel(x, y));
            }
        }
    }

    /// Count a single packed pixel.
    pub fn add_color(&mut self, color: u32) {
        if is_transparent(color) {
            self.transparent = true;
            return;
        }
        let rgb = color >> 8;
        let count = self.counts.entry(rgb).or_insert(0);
        if *count == 0 {
            self.order.push(rgb);
        }
        *count += 1;
    }

    /// Number of distinct opaque colors seen.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Whether any transparent pixel was seen.
    pub fn has_transparent(&self) -> bool {
        self.transparent
    }

    /// Turn the counts into a palette.
    ///
    /// Index 0 is reserved for transparency when needed. If every distinct
    /// color fits, each becomes an entry in first-seen order. Otherwise the
    /// colors are grouped into 5:5:5 buckets, the buckets are ranked by pixel
    /// count (ties by ascending bucket index), and the most frequent color
    /// of each of the top buckets becomes an entry.
    pub fn build(&self) -> Palette {
        // Nothing opaque at all: a lone transparent entry keeps the PLTE valid.
        let transparent = self.transparent || self.order.is_empty();
        let limit = MAX_COLORS - usize::from(transparent);

        let mut colors = Vec::with_capacity(MAX_COLORS);
        if transparent {
            colors.push(0);
        }

        if self.order.len() <= limit {
            colors.extend(self.order.iter().map(|&rgb| rgb << 8 | 0xFF));
            log::debug!(
                "analyzed {} exact colors (transparent: {})",
                self.order.len(),
                transparent
            );
            return Palette::from_entries(colors, transparent, true);
        }

        let mut bucket_counts = vec![0u32; BUCKET_COUNT];
        let mut representative = vec![(0u32, 0u32); BUCKET_COUNT];
        for &rgb in &self.order {
            let count = self.counts[&rgb];
            let bucket = bucket_of(rgb << 8);
            bucket_counts[bucket] += count;
            let rep = &mut representative[bucket];
            if count > rep.1 {
                *rep = (rgb, count);
            }
        }

        let mut ranked: Vec<usize> = (0..BUCKET_COUNT)
            .filter(|&b| bucket_counts[b] > 0)
            .collect();
        ranked.sort_by(|&a, &b| bucket_counts[b].cmp(&bucket_counts[a]).then(a.cmp(&b)));
        ranked.truncate(limit);

        colors.extend(ranked.iter().map(|&b| representative[b].0 << 8 | 0xFF));
        log::debug!(
            "reduced {} colors to {} buckets (transparent: {})",
            self.order.len(),
            ranked.len(),
            transparent
        );
        Palette::from_entries(colors, transparent, true)
    }
}

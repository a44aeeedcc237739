//! Error-diffusion dithering for indexed output.

use super::Palette;
use crate::color::{is_transparent, pack_rgba, unpack_rgba};

/// How colors that are not in the palette get approximated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dither {
    /// Each pixel takes its palette lookup as-is.
    #[default]
    None,
    /// Floyd–Steinberg error diffusion on the RGB channels.
    FloydSteinberg {
        /// Multiplier on the diffused error; 1.0 is classic Floyd–Steinberg.
        strength: f32,
    },
}

/// Per-row error buffers, reused across rows, images and frames.
#[derive(Debug, Default)]
pub(crate) struct ErrorDiffusion {
    current: [Vec<f32>; 3],
    next: [Vec<f32>; 3],
}

impl ErrorDiffusion {
    /// Forget all accumulated error and size the buffers for `width` pixels.
    ///
    /// Buffers carry one pad slot on each side so neighbours never need a
    /// bounds check.
    pub(crate) fn start(&mut self, width: u32) {
        let len = width as usize + 2;
        for buf in self.current.iter_mut().chain(self.next.iter_mut()) {
            buf.clear();
            buf.resize(len, 0.0);
        }
    }

    /// Map one RGBA row to palette indices, spreading the rounding error
    /// right and onto the next row.
    ///
    /// Transparent pixels that hit the sentinel neither take nor pass on
    /// error.
    pub(crate) fn index_row(
        &mut self,
        palette: &Palette,
        rgba: &[u8],
        out: &mut [u8],
        strength: f32,
    ) {
        std::mem::swap(&mut self.current, &mut self.next);
        for buf in &mut self.next {
            buf.fill(0.0);
        }

        let w7 = strength * 7.0 / 16.0;
        let w3 = strength * 3.0 / 16.0;
        let w5 = strength * 5.0 / 16.0;
        let w1 = strength / 16.0;
        let sentinel = palette.has_transparent();

        for (x, (px, slot)) in rgba.chunks_exact(4).zip(out.iter_mut()).enumerate() {
            let color = u32::from_be_bytes([px[0], px[1], px[2], px[3]]);
            if sentinel && is_transparent(color) {
                *slot = 0;
                continue;
            }

            let i = x + 1;
            let mut adjusted = [0u8; 3];
            for c in 0..3 {
                adjusted[c] = (px[c] as f32 + self.current[c][i]).round().clamp(0.0, 255.0) as u8;
            }
            let index = palette.index_of(pack_rgba(adjusted[0], adjusted[1], adjusted[2], 0xFF));
            *slot = index;

            let used = unpack_rgba(palette.colors()[index as usize]);
            for c in 0..3 {
                let err = adjusted[c] as f32 - used[c] as f32;
                self.current[c][i + 1] += err * w7;
                self.next[c][i - 1] += err * w3;
                self.next[c][i] += err * w5;
                self.next[c][i + 1] += err * w1;
            }
        }
    }
}

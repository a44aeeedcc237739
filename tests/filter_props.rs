//! Property tests for the Paeth filter and the scanline pipeline.

use palpng::png::filter::{filter_paeth, paeth_predictor, unfilter_paeth, Scanlines, FILTER_PAETH};
use proptest::prelude::*;

/// Reference predictor straight from the PNG specification.
fn reference_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i32 + b as i32 - c as i32;
    let (pa, pb, pc) = ((p - a as i32).abs(), (p - b as i32).abs(), (p - c as i32).abs());
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn rows_strategy() -> impl Strategy<Value = (usize, Vec<Vec<u8>>)> {
    (prop_oneof![Just(1usize), Just(4usize)], 1usize..40, 1usize..8).prop_flat_map(
        |(bpp, width, height)| {
            proptest::collection::vec(proptest::collection::vec(any::<u8>(), width * bpp), height)
                .prop_map(move |rows| (bpp, rows))
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_predictor_matches_reference(a in any::<u8>(), b in any::<u8>(), c in any::<u8>()) {
        prop_assert_eq!(paeth_predictor(a, b, c), reference_predictor(a, b, c));
    }

    /// Unfiltering with the same previous row restores every row, the
    /// first one included.
    #[test]
    fn prop_unfilter_restores_rows((bpp, rows) in rows_strategy()) {
        let mut prev = vec![0u8; rows[0].len()];
        for row in &rows {
            let mut filtered = vec![0u8; row.len()];
            filter_paeth(row, &prev, bpp, &mut filtered);
            unfilter_paeth(&mut filtered, &prev, bpp);
            prop_assert_eq!(&filtered, row);
            prev.clone_from(row);
        }
    }

    /// The streamed form is a filter byte plus the filtered row, per row.
    #[test]
    fn prop_scanlines_emit_filter_byte_and_row((bpp, rows) in rows_strategy()) {
        let width = (rows[0].len() / bpp) as u32;
        let mut lines = Scanlines::default();
        lines.start(width, bpp);
        let mut stream = Vec::new();
        for row in &rows {
            lines.current_mut().copy_from_slice(row);
            lines.emit(&mut stream).unwrap();
        }

        let stride = rows[0].len() + 1;
        prop_assert_eq!(stream.len(), stride * rows.len());
        let mut prev = vec![0u8; rows[0].len()];
        for (line, row) in stream.chunks_exact(stride).zip(&rows) {
            prop_assert_eq!(line[0], FILTER_PAETH);
            let mut restored = line[1..].to_vec();
            unfilter_paeth(&mut restored, &prev, bpp);
            prop_assert_eq!(&restored, row);
            prev.clone_from(row);
        }
    }
}

#[test]
fn test_start_clears_previous_row() {
    let mut lines = Scanlines::default();
    lines.start(3, 1);
    lines.current_mut().copy_from_slice(&[9, 9, 9]);
    lines.emit(&mut Vec::<u8>::new()).unwrap();
    assert_eq!(lines.previous(), &[9, 9, 9]);

    lines.start(2, 1);
    assert_eq!(lines.previous(), &[0, 0]);
}

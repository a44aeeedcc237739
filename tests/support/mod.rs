//! Shared helpers for the integration tests: a raw chunk walker, decoding
//! through the `png` crate, and deterministic synthetic images.

#![allow(dead_code)]

use std::io::{self, Write};

use palpng::color::pack_rgba;
use palpng::compress::crc32;
use palpng::png::PNG_SIGNATURE;
use palpng::{PixelSource, Pixmap};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// One chunk as found in the byte stream.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
    pub crc: u32,
}

impl Chunk {
    pub fn is(&self, tag: &[u8; 4]) -> bool {
        &self.tag == tag
    }

    /// Leading big-endian u32 of the payload (sequence number for fcTL/fdAT).
    pub fn u32_at(&self, offset: usize) -> u32 {
        u32::from_be_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    pub fn u16_at(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.data[offset], self.data[offset + 1]])
    }
}

/// Split a PNG into chunks, checking the signature and that every declared
/// length stays inside the stream.
pub fn chunks(png: &[u8]) -> Vec<Chunk> {
    assert_eq!(&png[..8], &PNG_SIGNATURE, "bad signature");
    let mut found = Vec::new();
    let mut pos = 8;
    while pos < png.len() {
        assert!(pos + 12 <= png.len(), "truncated chunk header at {pos}");
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        assert!(pos + 12 + len <= png.len(), "chunk at {pos} overruns the stream");
        let tag = [png[pos + 4], png[pos + 5], png[pos + 6], png[pos + 7]];
        let data = png[pos + 8..pos + 8 + len].to_vec();
        let c = pos + 8 + len;
        let crc = u32::from_be_bytes([png[c], png[c + 1], png[c + 2], png[c + 3]]);
        found.push(Chunk { tag, data, crc });
        pos = c + 4;
    }
    found
}

/// Tags of every chunk, in order, as strings.
pub fn tags(png: &[u8]) -> Vec<String> {
    chunks(png)
        .iter()
        .map(|c| String::from_utf8_lossy(&c.tag).into_owned())
        .collect()
}

/// Recompute each chunk's CRC over tag + payload and compare.
pub fn assert_crcs(png: &[u8]) {
    for chunk in chunks(png) {
        let mut covered = chunk.tag.to_vec();
        covered.extend_from_slice(&chunk.data);
        assert_eq!(
            crc32(&covered),
            chunk.crc,
            "CRC mismatch in {}",
            String::from_utf8_lossy(&chunk.tag)
        );
    }
}

/// PLTE entries as RGB triplets.
pub fn plte(png: &[u8]) -> Vec<[u8; 3]> {
    let chunk = chunks(png)
        .into_iter()
        .find(|c| c.is(b"PLTE"))
        .expect("no PLTE chunk");
    chunk
        .data
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect()
}

fn to_rgba(data: Vec<u8>, color_type: png::ColorType) -> Vec<u8> {
    match color_type {
        png::ColorType::Rgba => data,
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        other => panic!("unexpected decoded color type {other:?}"),
    }
}

/// A sink that accepts `limit` bytes and then fails.
pub struct FailingWriter {
    limit: usize,
    written: usize,
}

impl FailingWriter {
    pub fn new(limit: usize) -> Self {
        Self { limit, written: 0 }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decode every frame of a PNG or APNG to RGBA, row 0 at the top.
pub fn decode_frames(bytes: &[u8]) -> (u32, u32, Vec<Vec<u8>>) {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().expect("read_info");
    let frame_count = reader
        .info()
        .animation_control
        .as_ref()
        .map(|actl| actl.num_frames)
        .unwrap_or(1);
    let (width, height) = (reader.info().width, reader.info().height);

    let mut frames = Vec::new();
    for _ in 0..frame_count {
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("next_frame");
        buf.truncate(info.buffer_size());
        frames.push(to_rgba(buf, info.color_type));
    }
    (width, height, frames)
}

/// Decode a still PNG to RGBA, row 0 at the top.
pub fn decode_rgba(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let (width, height, mut frames) = decode_frames(bytes);
    (width, height, frames.remove(0))
}

/// Raw palette indices of an indexed PNG, without expansion.
pub fn decode_indices(bytes: &[u8]) -> Vec<u8> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().expect("read_info");
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("next_frame");
    assert_eq!(info.color_type, png::ColorType::Indexed);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    buf.truncate(info.buffer_size());
    buf
}

/// `pixmap` with its rows in reverse order, as RGBA bytes.
pub fn flipped_bytes(pixmap: &Pixmap) -> Vec<u8> {
    let row = pixmap.width() as usize * 4;
    pixmap
        .as_bytes()
        .chunks_exact(row)
        .rev()
        .flatten()
        .copied()
        .collect()
}

/// Image using `colors` cyclically in raster order.
pub fn cycle_colors(width: u32, height: u32, colors: &[u32]) -> Pixmap {
    Pixmap::from_fn(width, height, |x, y| {
        colors[(y * width + x) as usize % colors.len()]
    })
    .expect("valid size")
}

/// Horizontal red / vertical green gradient over a fixed blue.
pub fn gradient(width: u32, height: u32) -> Pixmap {
    Pixmap::from_fn(width, height, |x, y| {
        pack_rgba(
            (x * 255 / (width - 1).max(1)) as u8,
            (y * 255 / (height - 1).max(1)) as u8,
            96,
            255,
        )
    })
    .expect("valid size")
}

/// Seeded random opaque noise.
pub fn noise(width: u32, height: u32, seed: u64) -> Pixmap {
    let mut rng = StdRng::seed_from_u64(seed);
    Pixmap::from_fn(width, height, |_, _| {
        pack_rgba(rng.gen(), rng.gen(), rng.gen(), 255)
    })
    .expect("valid size")
}

/// Squared RGB distance.
pub fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

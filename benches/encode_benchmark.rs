//! Benchmarks for palpng image encoding.
//!
//! Compares indexed output against the `png` crate's truecolor encoder.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use palpng::color::pack_rgba;
use palpng::{AnimatedPngEncoder, Dither, EncoderOptions, PaletteSource, Pixmap, Png8Encoder};

/// Generate a test image with gradient pattern.
fn generate_test_image(width: u32, height: u32) -> Pixmap {
    Pixmap::from_fn(width, height, |x, y| {
        let r = ((x * 255) / width) as u8;
        let g = ((y * 255) / height) as u8;
        let b = (((x + y) * 127) / (width + height)) as u8;
        pack_rgba(r, g, b, 255)
    })
    .unwrap()
}

/// Generate a test image with random-ish pattern (harder to compress).
fn generate_noisy_image(width: u32, height: u32) -> Pixmap {
    let mut seed = 12345u32;
    Pixmap::from_fn(width, height, |_, _| {
        // Simple LCG for deterministic "random" values
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        let r = (seed >> 16) as u8;
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        let g = (seed >> 16) as u8;
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        let b = (seed >> 16) as u8;
        pack_rgba(r, g, b, 255)
    })
    .unwrap()
}

fn png8_encoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("PNG8 Encoding");

    for size in [64u32, 128, 256, 512] {
        let image = generate_test_image(size, size);
        group.throughput(Throughput::Bytes(u64::from(size) * u64::from(size) * 4));
        let label = format!("{size}x{size}");

        let mut encoder = Png8Encoder::new();
        let mut buf = Vec::new();
        group.bench_with_input(BenchmarkId::new("computed", &label), &image, |b, image| {
            b.iter(|| {
                buf.clear();
                encoder.write(&mut buf, black_box(image), true).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("procedural", &label), &image, |b, image| {
            b.iter(|| {
                buf.clear();
                encoder
                    .write_with_palette(&mut buf, black_box(image), PaletteSource::Procedural)
                    .unwrap();
            });
        });

        let mut dithered = Png8Encoder::with_options(EncoderOptions {
            dither: Dither::FloydSteinberg { strength: 1.0 },
            ..EncoderOptions::default()
        });
        group.bench_with_input(BenchmarkId::new("dithered", &label), &image, |b, image| {
            b.iter(|| {
                buf.clear();
                dithered
                    .write_with_palette(&mut buf, black_box(image), PaletteSource::Procedural)
                    .unwrap();
            });
        });

        // Compare with the png crate writing the same pixels as RGBA
        group.bench_with_input(BenchmarkId::new("png_crate_rgba", &label), &image, |b, image| {
            b.iter(|| {
                let mut output = Vec::new();
                let mut encoder = png::Encoder::new(&mut output, size, size);
                encoder.set_color(png::ColorType::Rgba);
                encoder.set_depth(png::BitDepth::Eight);
                let mut writer = encoder.write_header().unwrap();
                writer.write_image_data(black_box(image.as_bytes())).unwrap();
                writer.finish().unwrap();
                output
            });
        });
    }

    group.finish();
}

fn apng_encoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("APNG Encoding");
    let frames: Vec<Pixmap> = (0..8).map(|_| generate_test_image(128, 128)).collect();
    group.throughput(Throughput::Bytes(8 * 128 * 128 * 4));

    let mut buf = Vec::new();
    let mut rgba = AnimatedPngEncoder::new();
    group.bench_function("rgba_8x128", |b| {
        b.iter(|| {
            buf.clear();
            rgba.write(&mut buf, black_box(&frames), 12).unwrap();
        });
    });

    let mut indexed = Png8Encoder::new();
    group.bench_function("indexed_8x128", |b| {
        b.iter(|| {
            buf.clear();
            indexed.write_animated(&mut buf, black_box(&frames), 12).unwrap();
        });
    });

    group.finish();
}

fn compression_ratio_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compression Ratio");
    let gradient = generate_test_image(256, 256);
    let noisy = generate_noisy_image(256, 256);

    for (name, options) in [
        ("fast", EncoderOptions::fast()),
        ("balanced", EncoderOptions::balanced()),
        ("max", EncoderOptions::max_compression()),
    ] {
        let mut encoder = Png8Encoder::with_options(options);
        let mut buf = Vec::new();
        group.bench_function(format!("gradient_{name}"), |b| {
            b.iter(|| {
                buf.clear();
                encoder.write(&mut buf, black_box(&gradient), true).unwrap();
                buf.len()
            });
        });
        group.bench_function(format!("noisy_{name}"), |b| {
            b.iter(|| {
                buf.clear();
                encoder.write(&mut buf, black_box(&noisy), true).unwrap();
                buf.len()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    png8_encoding_benchmark,
    apng_encoding_benchmark,
    compression_ratio_benchmark
);
criterion_main!(benches);

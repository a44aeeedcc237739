//! palpng CLI - indexed PNG and APNG converter
//!
//! Reads one PNG and writes it back as an 8-bit indexed PNG, or reads
//! several same-size PNGs and writes them as an animated PNG.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};

use palpng::{
    AnimatedPngEncoder, Dither, EncoderOptions, Palette, PixelSource, Pixmap, Png8Encoder,
};

/// Convert PNGs to palette-based PNG or animated PNG.
///
/// One input produces an indexed PNG; two or more inputs produce an APNG.
#[derive(Parser, Debug)]
#[command(name = "palpng")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PNG file(s); several files become animation frames in order
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file path
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Where the palette comes from
    #[arg(short, long, value_enum, default_value = "computed")]
    palette: PaletteArg,

    /// Floyd-Steinberg dithering strength (0 disables dithering)
    #[arg(short, long, default_value = "0")]
    dither: f32,

    /// Deflate level (0-9, higher = smaller file)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=9))]
    level: Option<u8>,

    /// Compression preset (an explicit --level wins)
    #[arg(long, value_enum, default_value = "balanced")]
    preset: PresetArg,

    /// Treat inputs as bottom-up bitmaps and flip them
    #[arg(long)]
    flip_y: bool,

    /// Animation frame rate
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..))]
    fps: u16,

    /// Write animations as indexed APNG instead of truecolor
    #[arg(long)]
    indexed: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaletteArg {
    /// Build the palette from the input's own colors
    Computed,
    /// Use the built-in 253-color grid
    Procedural,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Level 1
    Fast,
    /// Level 6
    Balanced,
    /// Level 9
    Max,
}

impl Args {
    fn options(&self) -> EncoderOptions {
        let mut options = match self.preset {
            PresetArg::Fast => EncoderOptions::fast(),
            PresetArg::Balanced => EncoderOptions::balanced(),
            PresetArg::Max => EncoderOptions::max_compression(),
        };
        if let Some(level) = self.level {
            options.compression_level = level;
        }
        options.flip_y = self.flip_y;
        options.dither = if self.dither > 0.0 {
            Dither::FloydSteinberg {
                strength: self.dither,
            }
        } else {
            Dither::None
        };
        options
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut path = self.inputs[0].clone();
            let ext = if self.inputs.len() > 1 {
                "anim.png"
            } else {
                "indexed.png"
            };
            path.set_extension(ext);
            path
        })
    }
}

/// Decode a PNG file into an RGBA pixmap.
fn decode_png(path: &Path) -> Result<Pixmap, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(file);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels)?;
    pixels.truncate(info.buffer_size());

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => pixels,
        png::ColorType::Rgb => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err("Indexed PNG was not expanded by the decoder".into())
        }
    };

    Ok(Pixmap::new(info.width, info.height, rgba)?)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let start = Instant::now();
    let frames = args
        .inputs
        .iter()
        .map(|path| decode_png(path))
        .collect::<Result<Vec<_>, _>>()?;
    let load_time = start.elapsed();
    log::debug!("loaded {} image(s) in {:.2?}", frames.len(), load_time);

    let options = args.options();
    let output_path = args.output_path();
    let mut output = BufWriter::new(File::create(&output_path)?);

    let encode_start = Instant::now();
    if let [image] = frames.as_slice() {
        let mut encoder = Png8Encoder::with_options(options);
        encoder.write(&mut output, image, matches!(args.palette, PaletteArg::Computed))?;
        if let Some(palette) = encoder.palette() {
            log::debug!("palette: {} colors", palette.len());
        }
    } else if args.indexed {
        let mut encoder = Png8Encoder::with_options(options);
        if let PaletteArg::Computed = args.palette {
            encoder.set_palette(Palette::analyze_all(&frames));
        }
        encoder.write_animated(&mut output, &frames, args.fps)?;
    } else {
        AnimatedPngEncoder::with_options(options).write(&mut output, &frames, args.fps)?;
    }
    drop(output);
    let encode_time = encode_start.elapsed();

    let input_size: u64 = args
        .inputs
        .iter()
        .map(|p| fs::metadata(p).map(|m| m.len()))
        .sum::<Result<u64, _>>()?;
    let output_size = fs::metadata(&output_path)?.len();

    if args.verbose {
        eprintln!("Output: {:?}", output_path);
        eprintln!("  Frames: {}", frames.len());
        eprintln!("  Dimensions: {}x{}", frames[0].width(), frames[0].height());
        eprintln!("  Encode time: {:.2?}", encode_time);
    }
    println!(
        "{} -> {} bytes ({:.1}%)",
        input_size,
        output_size,
        output_size as f64 * 100.0 / input_size.max(1) as f64
    );

    Ok(())
}

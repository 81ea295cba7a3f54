use std::io::Write;

use rayon::prelude::*;

use glyph_engine::{CoordWidth, GlyphRendering};

mod ascii;
mod dump;
mod svg;

use dump::DumpOptions;

#[derive(clap::Parser, Debug)]
#[command(about = "Prepare glyphs with the glyph engine and print the results")]
struct Args {
    /// Characters to prepare
    #[arg(long, default_value = "Hamburgefonstiv")]
    text: String,
    /// Character height in pixels
    #[arg(long, default_value_t = 16.0)]
    size: f64,
    /// Rendering mode
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,
    /// Disable hinting
    #[arg(long)]
    no_hinting: bool,
    /// Use a y axis pointing down
    #[arg(long)]
    flip_y: bool,
    /// Store outlines with 16-bit coordinates
    #[arg(long)]
    int16: bool,
    /// Print one JSON record per glyph
    #[arg(long)]
    json: bool,
    /// Draw raster glyphs as text
    #[arg(long)]
    bitmaps: bool,
    /// Print SVG path data for outline glyphs
    #[arg(long)]
    svg: bool,
    /// Paths to font files (may use glob syntax)
    files: Vec<std::path::PathBuf>,
}

/// Specifies which rendering mode(s) to dump.
#[derive(clap::ValueEnum, Copy, Clone, Default, Debug)]
enum Mode {
    /// 1-bit bitmaps from the font library.
    NativeMono,
    /// 8-bit bitmaps from the font library.
    NativeGray8,
    /// Vector outlines.
    Outline,
    /// Outlines rasterized to 1-bit scanlines.
    AggMono,
    /// Outlines rasterized to anti-aliased scanlines.
    AggGray8,
    /// Every mode.
    #[default]
    All,
}

impl Mode {
    fn renderings(self) -> Vec<GlyphRendering> {
        match self {
            Self::NativeMono => vec![GlyphRendering::NativeMono],
            Self::NativeGray8 => vec![GlyphRendering::NativeGray8],
            Self::Outline => vec![GlyphRendering::Outline],
            Self::AggMono => vec![GlyphRendering::AggMono],
            Self::AggGray8 => vec![GlyphRendering::AggGray8],
            Self::All => GlyphRendering::ALL.to_vec(),
        }
    }
}

#[allow(clippy::explicit_write)]
fn main() {
    env_logger::init();
    use clap::Parser as _;
    let args = Args::parse_from(wild::args());
    let options = DumpOptions {
        text: args.text,
        size: args.size,
        modes: args.mode.renderings(),
        hinting: !args.no_hinting,
        flip_y: args.flip_y,
        coord_width: if args.int16 {
            CoordWidth::Int16
        } else {
            CoordWidth::Int32
        },
        json: args.json,
        bitmaps: args.bitmaps,
        svg: args.svg,
    };
    let results: Vec<_> = args
        .files
        .par_iter()
        .map(|path| (path, dump::dump_file(path, &options)))
        .collect();
    let mut ok = true;
    for (path, result) in results {
        match result {
            Ok(text) => write!(std::io::stdout(), "{text}").unwrap(),
            Err(e) => {
                writeln!(std::io::stderr(), "{}: {e}", path.display()).unwrap();
                ok = false;
            }
        }
    }
    if !ok {
        std::process::exit(1);
    }
}

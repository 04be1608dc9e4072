use clap::{Args, Parser, Subcommand};
use image::Rgba;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flipbook")]
#[command(version, about = "Sprite sheet slicer and animation previewer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the (padded) sheet atlas and JSON tile metadata
    Slice(CommonArgs),
    /// Write every tile as its own PNG
    Split(CommonArgs),
    /// Play an animation headlessly and write one rendered frame per tick
    Preview(PreviewArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Slice(args) | Command::Split(args) => args,
            Command::Preview(args) => &args.common,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Sprite sheet image
    #[arg(required_unless_present = "config")]
    pub input: Option<PathBuf>,

    /// Load settings from a .flipbook config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for generated files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (sheet.png, sheet.json, etc.) [default: sheet]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Tile width in pixels [default: 16]
    #[arg(long, value_name = "PIXELS")]
    pub tile_width: Option<u32>,

    /// Tile height in pixels [default: 16]
    #[arg(long, value_name = "PIXELS")]
    pub tile_height: Option<u32>,

    /// Display scale stored with the sheet and used for previews [default: 1]
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// Gutter between tiles in a rebuilt atlas; 0 keeps the source layout [default: 0]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Pixels of edge colour duplicated into each gutter, at most padding/2 [default: 1, capped at padding/2]
    #[arg(long)]
    pub smear: Option<u32>,

    /// Atlas background as hex RGB or RGBA [default: transparent]
    #[arg(long, value_name = "HEX")]
    pub background: Option<HexColor>,

    /// Output RGB instead of RGBA (opaque images)
    #[arg(long)]
    pub opaque: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Animation frame as x,y or x,y:ms; repeat for each frame [default: the first row]
    #[arg(short = 'f', long = "frame", value_name = "X,Y[:MS]")]
    pub frames: Vec<String>,

    /// Duration of frames that do not give their own [default: 100]
    #[arg(long, value_name = "MS")]
    pub frame_ms: Option<u64>,

    /// Number of ticks to simulate [default: 60]
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Simulated ticks per second [default: 60]
    #[arg(long)]
    pub fps: Option<u32>,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

/// An RGBA colour written as `rrggbb` or `rrggbbaa`, with an optional leading `#`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub Rgba<u8>);

impl std::str::FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(format!("expected rrggbb or rrggbbaa, got '{}'", s));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_e| format!("invalid hex colour: '{}'", s))
        };
        let alpha = if hex.len() == 8 { channel(3)? } else { 255 };

        Ok(HexColor(Rgba([channel(0)?, channel(1)?, channel(2)?, alpha])))
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use image::Rgba;

use super::{CompressConfig, FlipbookConfig, LoadedConfig};
use crate::canvas::TRANSPARENT;
use crate::cli::{CommonArgs, CompressionLevel, HexColor, PreviewArgs};

/// Merged configuration from CLI args and optional config file.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub scale: f64,
    pub padding: u32,
    /// Explicit smear; `None` leaves the builder default
    pub smear: Option<u32>,
    pub background: Rgba<u8>,
    pub opaque: bool,
    pub verbose: bool,
    pub compress: Option<CompressionLevel>,
    pub frames: Vec<String>,
    pub frame_duration: Duration,
    pub ticks: u32,
    pub fps: u32,
}

impl MergedConfig {
    /// Load the config named by `args` (if any) and merge it with the CLI arguments
    pub fn from_args(args: &CommonArgs, preview: Option<&PreviewArgs>) -> Result<Self> {
        let loaded = match &args.config {
            Some(config_path) => Some(
                LoadedConfig::load(config_path)
                    .with_context(|| format!("failed to load config: {}", config_path.display()))?,
            ),
            None => None,
        };
        Self::merge(args, preview, loaded.as_ref())
    }

    /// Merge config file values with CLI arguments.
    /// CLI arguments always take precedence over config values.
    pub fn merge(
        args: &CommonArgs,
        preview: Option<&PreviewArgs>,
        loaded: Option<&LoadedConfig>,
    ) -> Result<Self> {
        let defaults = FlipbookConfig::default();
        let config = loaded.map_or(&defaults, |lc| &lc.config);

        // Input: CLI > config
        let input = match (&args.input, loaded) {
            (Some(input), _) => input.clone(),
            (None, Some(lc)) => lc
                .resolve_input()
                .context("no input image given on the command line or in the config")?,
            (None, None) => anyhow::bail!("no input image given"),
        };

        // Output directory: CLI > config > default
        let output = args.output.clone().unwrap_or_else(|| {
            loaded
                .map(LoadedConfig::resolve_output_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let name = args.name.clone().unwrap_or_else(|| config.name.clone());
        let tile_width = args.tile_width.unwrap_or(config.tile_width);
        let tile_height = args.tile_height.unwrap_or(config.tile_height);
        let scale = args.scale.unwrap_or(config.scale);
        let padding = args.padding.unwrap_or(config.padding);
        let smear = args.smear.or(config.smear);

        // Background: CLI > config > transparent
        let background = match (args.background, &config.background) {
            (Some(HexColor(color)), _) => color,
            (None, Some(hex)) => {
                let HexColor(color) = hex
                    .parse::<HexColor>()
                    .map_err(|e| anyhow::anyhow!("invalid background in config file: {}", e))?;
                color
            }
            (None, None) => TRANSPARENT,
        };

        // Boolean flags: CLI presence sets them to true, otherwise use config
        let opaque = args.opaque || config.opaque;

        // Verbose is CLI-only
        let verbose = args.verbose;

        // Compress: CLI option overrides config
        let compress = args.compress.or_else(|| {
            config.compress.as_ref().map(|c| match c {
                CompressConfig::Level(n) => CompressionLevel::Level(*n),
                CompressConfig::Max(_) => CompressionLevel::Max,
            })
        });

        // Preview settings: CLI > config > default
        let frames = match preview {
            Some(p) if !p.frames.is_empty() => p.frames.clone(),
            _ => config.frames.clone(),
        };
        let frame_ms = preview
            .and_then(|p| p.frame_ms)
            .unwrap_or(config.frame_ms);
        let ticks = preview.and_then(|p| p.ticks).unwrap_or(config.ticks);
        let fps = preview.and_then(|p| p.fps).unwrap_or(config.fps);
        if fps == 0 {
            anyhow::bail!("fps must be at least 1");
        }

        Ok(MergedConfig {
            input,
            output,
            name,
            tile_width,
            tile_height,
            scale,
            padding,
            smear,
            background,
            opaque,
            verbose,
            compress,
            frames,
            frame_duration: Duration::from_millis(frame_ms),
            ticks,
            fps,
        })
    }

    /// Time between simulated preview ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

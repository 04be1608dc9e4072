use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use flipbook::animation::Animation;
use flipbook::canvas::ImageView;
use flipbook::cli::{CliArgs, Command};
use flipbook::config::MergedConfig;
use flipbook::output::{save_png, write_json, write_tiles};
use flipbook::preview::{frames_from_specs, play, scaled_tile_size};
use flipbook::sheet::{SheetBuilder, SpriteSheet, load_image};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let preview = match &cli.command {
        Command::Preview(args) => Some(args),
        Command::Slice(_) | Command::Split(_) => None,
    };

    // Load config if specified and merge with CLI args
    let merged = MergedConfig::from_args(cli.command.common(), preview)?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Flipbook v{}", env!("CARGO_PKG_VERSION"));

    // Create output directory if it doesn't exist
    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    let sheet = build_sheet(&merged)?;
    let (grid_w, grid_h) = sheet.grid_size();
    info!(
        "Sliced {} into {}x{} tiles of {}x{}",
        merged.input.display(),
        grid_w,
        grid_h,
        merged.tile_width,
        merged.tile_height
    );

    match &cli.command {
        Command::Slice(_) => {
            let image_name = format!("{}.png", merged.name);
            let path = merged.output.join(&image_name);
            save_png(sheet.atlas(), &path, merged.opaque, merged.compress)?;
            info!("Saved {}", path.display());

            write_json(&sheet, &image_name, &merged.output, &merged.name)?;
            info!("Generated {}.json", merged.name);
        }
        Command::Split(_) => {
            let written = write_tiles(
                &sheet,
                &merged.output,
                &merged.name,
                merged.opaque,
                merged.compress,
            )?;
            info!(
                "Wrote {} tiles to {}",
                written.len(),
                merged.output.display()
            );
        }
        Command::Preview(_) => run_preview(&sheet, &merged)?,
    }

    info!("Done!");

    Ok(())
}

fn build_sheet(merged: &MergedConfig) -> Result<SpriteSheet> {
    let source = load_image(&merged.input)?;

    let mut builder = SheetBuilder::new(merged.tile_width, merged.tile_height)
        .scale(merged.scale)
        .padding(merged.padding)
        .background(merged.background);
    if let Some(smear) = merged.smear {
        builder = builder.smear(smear);
    }

    let sheet = builder
        .build(ImageView::new(source))
        .with_context(|| format!("failed to slice {}", merged.input.display()))?;

    Ok(sheet)
}

fn run_preview(sheet: &SpriteSheet, merged: &MergedConfig) -> Result<()> {
    let frames = frames_from_specs(sheet, &merged.frames, merged.frame_duration)?;
    info!("Previewing {} frames over {} ticks", frames.len(), merged.ticks);

    let start = Instant::now();
    let mut animation = Animation::starting_at(frames, start)?;
    let playback = play(
        &mut animation,
        start,
        merged.tick_interval(),
        merged.ticks,
        scaled_tile_size(sheet)?,
        &sheet.draw_options(),
    )?;

    let path = merged.output.join(format!("{}_preview.png", merged.name));
    save_png(&playback.strip, &path, merged.opaque, merged.compress)?;
    info!("Saved {}", path.display());

    let frame_list = playback
        .indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    info!("Frame per tick: {}", frame_list);

    Ok(())
}

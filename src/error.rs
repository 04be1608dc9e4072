use std::path::PathBuf;
use thiserror::Error;

use crate::canvas::Rect;

#[derive(Error, Debug)]
pub enum FlipbookError {
    #[error("Tile size must be positive, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },

    #[error("Source image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Smear of {smear}px does not fit in a padding of {padding}px (at most {max}px)")]
    InvalidSmear { smear: u32, padding: u32, max: u32 },

    #[error("An animation needs at least one frame")]
    EmptyAnimation,

    #[error("Tile ({x}, {y}) is outside the {grid_width}x{grid_height} grid")]
    TileOutOfRange {
        x: u32,
        y: u32,
        grid_width: u32,
        grid_height: u32,
    },

    #[error("Region {region:?} is outside the {width}x{height} image")]
    RegionOutOfBounds {
        region: Rect,
        width: u32,
        height: u32,
    },

    #[error("Canvas of {width}x{height} pixels exceeds the {max_pixels} pixel limit")]
    CanvasTooLarge {
        width: u64,
        height: u64,
        max_pixels: u64,
    },

    #[error("Invalid frame '{spec}': {reason}")]
    InvalidFrameSpec { spec: String, reason: String },

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}

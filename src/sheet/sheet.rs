use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use super::SheetBuilder;
use crate::animation::Frame;
use crate::canvas::{DrawOptions, ImageView};
use crate::error::FlipbookError;

/// A source image cut into a grid of equally sized tiles.
///
/// Tiles are stored row-major and addressed by `(x, y)` grid coordinates.
/// A sheet never changes after it is built; every tile is a view that shares
/// pixels with either the source image or the padded atlas the sheet owns.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub(super) source: ImageView,
    pub(super) padded: Option<Arc<RgbaImage>>,
    pub(super) tiles: Vec<ImageView>,
    pub(super) tile_width: u32,
    pub(super) tile_height: u32,
    pub(super) grid_width: u32,
    pub(super) grid_height: u32,
    pub(super) padding: u32,
    pub(super) smear: u32,
    pub(super) scale: f64,
}

impl SpriteSheet {
    /// Slice `source` without padding; tiles view the source pixels directly
    pub fn new(
        source: ImageView,
        tile_width: u32,
        tile_height: u32,
        scale: f64,
    ) -> Result<Self, FlipbookError> {
        SheetBuilder::new(tile_width, tile_height)
            .scale(scale)
            .build(source)
    }

    /// Slice `source` into a padded atlas using the default padding and smear
    pub fn padded(
        source: ImageView,
        tile_width: u32,
        tile_height: u32,
        scale: f64,
    ) -> Result<Self, FlipbookError> {
        SheetBuilder::new(tile_width, tile_height)
            .scale(scale)
            .padded()
            .build(source)
    }

    /// Tile at grid position `(x, y)`
    pub fn tile(&self, x: u32, y: u32) -> Result<&ImageView, FlipbookError> {
        if x >= self.grid_width || y >= self.grid_height {
            return Err(FlipbookError::TileOutOfRange {
                x,
                y,
                grid_width: self.grid_width,
                grid_height: self.grid_height,
            });
        }
        let index = x as usize + y as usize * self.grid_width as usize;
        Ok(&self.tiles[index])
    }

    /// All tiles in row-major order with their grid coordinates
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, &ImageView)> {
        let width = self.grid_width;
        (0..self.grid_height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .zip(self.tiles.iter())
            .map(|((x, y), tile)| (x, y, tile))
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Grid size in tiles as `(columns, rows)`
    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }

    pub fn grid_height(&self) -> u32 {
        self.grid_height
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// The image the sheet was sliced from
    pub fn source(&self) -> &ImageView {
        &self.source
    }

    /// The padded atlas, when the sheet was built with padding
    pub fn padded_image(&self) -> Option<&Arc<RgbaImage>> {
        self.padded.as_ref()
    }

    pub fn is_padded(&self) -> bool {
        self.padded.is_some()
    }

    /// The image all tiles read from: the padded atlas or the source
    pub fn atlas(&self) -> &Arc<RgbaImage> {
        self.padded.as_ref().unwrap_or_else(|| self.source.backing())
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn smear(&self) -> u32 {
        self.smear
    }

    /// Display multiplier the sheet was built with
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Draw options scaled by the sheet's display multiplier
    #[expect(
        clippy::cast_possible_truncation,
        reason = "display scale comfortably fits in f32"
    )]
    pub fn draw_options(&self) -> DrawOptions {
        let scale = self.scale as f32;
        DrawOptions::new().scale(scale, scale)
    }

    /// Frames for the tiles `columns` of row `y`, each shown for `duration`
    pub fn row_frames(
        &self,
        y: u32,
        columns: Range<u32>,
        duration: Duration,
    ) -> Result<Vec<Frame>, FlipbookError> {
        columns
            .map(|x| Ok(Frame::new(self.tile(x, y)?.clone(), duration)))
            .collect()
    }
}

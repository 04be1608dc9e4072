use std::sync::Arc;

use image::{Rgba, RgbaImage};
use log::debug;

use super::SpriteSheet;
use crate::canvas::{Blend, Canvas, DrawOptions, ImageView, Rect, Surface, TRANSPARENT};
use crate::error::FlipbookError;

/// Padding used by [`SheetBuilder::padded`]
pub const DEFAULT_PADDING: u32 = 2;

/// Pixels of duplicated edge written on each side of a tile, capped at half the padding
pub const DEFAULT_SMEAR: u32 = 1;

/// Configuration for slicing a sprite sheet
#[derive(Debug, Clone)]
pub struct SheetBuilder {
    pub tile_width: u32,
    pub tile_height: u32,
    pub scale: f64,
    pub padding: u32,
    /// Explicit smear width; `None` uses [`DEFAULT_SMEAR`] clamped to the padding
    pub smear: Option<u32>,
    pub background: Rgba<u8>,
}

impl SheetBuilder {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            scale: 1.0,
            padding: 0,
            smear: None,
            background: TRANSPARENT,
        }
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Gutter width between tiles in the rebuilt atlas; 0 slices the source in place
    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Enable padding with [`DEFAULT_PADDING`]
    pub fn padded(self) -> Self {
        self.padding(DEFAULT_PADDING)
    }

    /// How many pixels of edge colour to duplicate into each side's gutter.
    ///
    /// Must be at most `padding / 2`; 0 leaves the gutter as background.
    pub fn smear(mut self, smear: u32) -> Self {
        self.smear = Some(smear);
        self
    }

    /// Smear width actually applied to the atlas
    pub fn effective_smear(&self) -> u32 {
        if self.padding == 0 {
            return 0;
        }
        self.smear.unwrap_or(DEFAULT_SMEAR.min(self.padding / 2))
    }

    /// Colour of atlas pixels no tile or smear covers
    pub fn background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    /// Slice `source` into a sprite sheet
    pub fn build(&self, source: ImageView) -> Result<SpriteSheet, FlipbookError> {
        self.validate(&source)?;

        let grid_width = source.width() / self.tile_width;
        let grid_height = source.height() / self.tile_height;

        let unused_x = source.width() % self.tile_width;
        let unused_y = source.height() % self.tile_height;
        if unused_x > 0 || unused_y > 0 {
            debug!(
                "Sheet {}x{} is not a multiple of {}x{}; ignoring {}px on the right and {}px at the bottom",
                source.width(),
                source.height(),
                self.tile_width,
                self.tile_height,
                unused_x,
                unused_y
            );
        }

        let (padded, tiles) = if self.padding > 0 {
            let (atlas, tiles) = self.build_padded(&source, grid_width, grid_height)?;
            (Some(atlas), tiles)
        } else {
            (None, self.slice(&source, grid_width, grid_height)?)
        };

        debug!(
            "Sliced {}x{} tiles of {}x{} (padding {}, smear {})",
            grid_width,
            grid_height,
            self.tile_width,
            self.tile_height,
            self.padding,
            self.effective_smear()
        );

        Ok(SpriteSheet {
            source,
            padded,
            tiles,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            grid_width,
            grid_height,
            padding: self.padding,
            smear: self.effective_smear(),
            scale: self.scale,
        })
    }

    fn validate(&self, source: &ImageView) -> Result<(), FlipbookError> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(FlipbookError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }

        if source.width() == 0 || source.height() == 0 {
            return Err(FlipbookError::EmptyImage {
                width: source.width(),
                height: source.height(),
            });
        }

        // Each neighbour owns half of a shared gutter
        let max = self.padding / 2;
        match self.smear {
            Some(smear) if self.padding > 0 && smear > max => {
                return Err(FlipbookError::InvalidSmear {
                    smear,
                    padding: self.padding,
                    max,
                });
            }
            _ => {}
        }

        Ok(())
    }

    /// Rectangle of cell `(x, y)` in the source
    fn cell_rect(&self, x: u32, y: u32) -> Rect {
        Rect::new(
            x * self.tile_width,
            y * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }

    fn slice(
        &self,
        source: &ImageView,
        grid_width: u32,
        grid_height: u32,
    ) -> Result<Vec<ImageView>, FlipbookError> {
        let mut tiles = Vec::with_capacity(grid_width as usize * grid_height as usize);
        for y in 0..grid_height {
            for x in 0..grid_width {
                tiles.push(source.sub_view(self.cell_rect(x, y))?);
            }
        }
        Ok(tiles)
    }

    fn build_padded(
        &self,
        source: &ImageView,
        grid_width: u32,
        grid_height: u32,
    ) -> Result<(Arc<RgbaImage>, Vec<ImageView>), FlipbookError> {
        let pad = self.padding;
        let width = padded_extent(source.width(), grid_width, pad);
        let height = padded_extent(source.height(), grid_height, pad);

        // Every placement below lies inside a canvas whose sides fit in u32
        let mut canvas = Canvas::checked(width, height, self.background)?;
        let mut placements = Vec::with_capacity(grid_width as usize * grid_height as usize);

        for y in 0..grid_height {
            for x in 0..grid_width {
                let cell = source.sub_view(self.cell_rect(x, y))?;
                let dx = x * self.tile_width + (x + 1) * pad;
                let dy = y * self.tile_height + (y + 1) * pad;
                let placed = Rect::new(dx, dy, self.tile_width, self.tile_height);

                canvas.draw(&cell, &DrawOptions::at(dx, dy).blend(Blend::Copy));
                self.smear_tile(&mut canvas, &cell, dx, dy);

                // Smeared copies also land on the tile itself
                canvas.clear(placed);
                canvas.draw(&cell, &DrawOptions::at(dx, dy).blend(Blend::Copy));

                placements.push(placed);
            }
        }

        let atlas = canvas.into_shared();
        let tiles = placements
            .into_iter()
            .map(|rect| ImageView::region(Arc::clone(&atlas), rect))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((atlas, tiles))
    }

    /// Redraw `cell` shifted along each axis so its edge pixels spill into the gutter.
    ///
    /// Shifts run from widest to narrowest so every gutter pixel ends up holding
    /// the nearest edge pixel rather than an interior one.
    fn smear_tile(&self, canvas: &mut Canvas, cell: &ImageView, dx: u32, dy: u32) {
        for shift in (1..=self.effective_smear()).rev() {
            let shifted = [
                (dx - shift, dy),
                (dx + shift, dy),
                (dx, dy - shift),
                (dx, dy + shift),
            ];
            for (x, y) in shifted {
                canvas.draw(cell, &DrawOptions::at(x, y).blend(Blend::Copy));
            }
        }
    }
}

/// Source extent plus one gutter before each of `cells` tiles and one after the last
fn padded_extent(extent: u32, cells: u32, padding: u32) -> u64 {
    u64::from(extent) + (u64::from(cells) + 1) * u64::from(padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

    /// Every pixel encodes its own source coordinates
    fn coordinate_image(width: u32, height: u32) -> ImageView {
        ImageView::new(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                u8::try_from(x).unwrap_or(u8::MAX),
                u8::try_from(y).unwrap_or(u8::MAX),
                7,
                255,
            ])
        }))
    }

    fn assert_matches_source(sheet: &SpriteSheet) {
        let (tw, th) = sheet.tile_size();
        for (x, y, tile) in sheet.tiles() {
            let expected = image::imageops::crop_imm(
                sheet.source().backing().as_ref(),
                x * tw,
                y * th,
                tw,
                th,
            )
            .to_image();
            assert_eq!(tile.to_image(), expected, "tile ({}, {}) differs", x, y);
        }
    }

    #[test]
    fn test_exact_grid_produces_every_tile() {
        let sheet = SheetBuilder::new(8, 10).build(coordinate_image(32, 20)).unwrap();

        assert_eq!(sheet.grid_size(), (4, 2));
        assert_eq!(sheet.tile_count(), 8);
        for (_, _, tile) in sheet.tiles() {
            assert_eq!(tile.dimensions(), (8, 10));
        }
        assert!(!sheet.is_padded());
    }

    #[test]
    fn test_bottom_right_lookup() {
        let sheet = SheetBuilder::new(8, 10).build(coordinate_image(32, 20)).unwrap();
        let tile = sheet.tile(3, 1).unwrap();

        assert_eq!(tile.rect(), Rect::new(24, 10, 8, 10));
        assert_eq!(tile.pixel(7, 9), Some(Rgba([31, 19, 7, 255])));
    }

    #[test]
    fn test_basic_tiles_match_source_and_share_storage() {
        let source = coordinate_image(32, 20);
        let sheet = SheetBuilder::new(8, 10).build(source.clone()).unwrap();

        assert_matches_source(&sheet);
        assert!(sheet.tile(1, 1).unwrap().shares_storage_with(&source));
    }

    #[test]
    fn test_partial_tiles_are_dropped() {
        let sheet = SheetBuilder::new(8, 8).build(coordinate_image(30, 17)).unwrap();

        assert_eq!(sheet.grid_size(), (3, 2));
        assert_eq!(sheet.tile_count(), 6);
        assert!(sheet.tile(3, 0).is_err());
        assert_matches_source(&sheet);
    }

    #[test]
    fn test_tile_larger_than_image_gives_empty_grid() {
        let sheet = SheetBuilder::new(64, 64).build(coordinate_image(32, 20)).unwrap();

        assert_eq!(sheet.grid_size(), (0, 0));
        assert_eq!(sheet.tile_count(), 0);
        assert!(sheet.tile(0, 0).is_err());
    }

    #[test]
    fn test_zero_tile_size_is_rejected() {
        let result = SheetBuilder::new(0, 8).build(coordinate_image(16, 16));
        assert!(matches!(
            result,
            Err(FlipbookError::InvalidTileSize {
                width: 0,
                height: 8
            })
        ));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let result = SheetBuilder::new(8, 8).build(ImageView::new(RgbaImage::new(0, 4)));
        assert!(matches!(result, Err(FlipbookError::EmptyImage { .. })));
    }

    #[test]
    fn test_smear_wider_than_half_gutter_is_rejected() {
        let result = SheetBuilder::new(8, 8)
            .padding(2)
            .smear(2)
            .build(coordinate_image(16, 16));
        assert!(matches!(
            result,
            Err(FlipbookError::InvalidSmear {
                smear: 2,
                padding: 2,
                max: 1
            })
        ));
    }

    #[test]
    fn test_default_smear_shrinks_to_fit_narrow_padding() {
        let source = coordinate_image(16, 8);

        let sheet = SheetBuilder::new(8, 8)
            .padding(1)
            .background(MAGENTA)
            .build(source.clone())
            .unwrap();
        assert_eq!(sheet.smear(), 0);
        assert_eq!(sheet.atlas().get_pixel(9, 1), &MAGENTA);
        assert_matches_source(&sheet);

        let padded = SheetBuilder::new(8, 8).padded().build(source.clone()).unwrap();
        assert_eq!(padded.smear(), 1);
        let basic = SheetBuilder::new(8, 8).build(source.clone()).unwrap();
        assert_eq!(basic.smear(), 0);

        let explicit = SheetBuilder::new(8, 8).padding(1).smear(1).build(source);
        assert!(matches!(
            explicit,
            Err(FlipbookError::InvalidSmear {
                smear: 1,
                padding: 1,
                max: 0
            })
        ));
    }

    #[test]
    fn test_padded_atlas_too_large_is_rejected() {
        let result = SheetBuilder::new(1, 1)
            .padding(u32::MAX)
            .smear(0)
            .build(ImageView::new(RgbaImage::new(1, 1)));
        let expected = 1 + 2 * u64::from(u32::MAX);
        assert!(matches!(
            result,
            Err(FlipbookError::CanvasTooLarge { width, height, .. })
                if width == expected && height == expected
        ));

        let wide = SheetBuilder::new(1, 1)
            .padding(1 << 20)
            .smear(0)
            .build(ImageView::new(RgbaImage::new(2, 1)));
        assert!(matches!(wide, Err(FlipbookError::CanvasTooLarge { .. })));
    }

    #[test]
    fn test_padded_atlas_size_and_placement() {
        let sheet = SheetBuilder::new(8, 10)
            .padded()
            .build(coordinate_image(32, 20))
            .unwrap();

        let atlas = sheet.padded_image().unwrap();
        assert_eq!(atlas.dimensions(), (32 + 5 * 2, 20 + 3 * 2));
        assert_eq!(sheet.tile(0, 0).unwrap().rect(), Rect::new(2, 2, 8, 10));
        assert_eq!(sheet.tile(1, 0).unwrap().rect(), Rect::new(12, 2, 8, 10));
        assert_eq!(sheet.tile(3, 1).unwrap().rect(), Rect::new(32, 14, 8, 10));
    }

    #[test]
    fn test_padded_tiles_keep_size_and_content() {
        let sheet = SheetBuilder::new(8, 10)
            .padded()
            .build(coordinate_image(32, 20))
            .unwrap();

        for (_, _, tile) in sheet.tiles() {
            assert_eq!(tile.dimensions(), (8, 10));
        }
        assert_matches_source(&sheet);
    }

    #[test]
    fn test_smear_duplicates_edges_into_own_gutter() {
        let sheet = SheetBuilder::new(8, 10)
            .padded()
            .background(MAGENTA)
            .build(coordinate_image(32, 20))
            .unwrap();
        let atlas = sheet.atlas();

        // Gutter between tile (0, 0) at x 2..10 and tile (1, 0) at x 12..20
        assert_eq!(atlas.get_pixel(10, 2), &Rgba([7, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(11, 2), &Rgba([8, 0, 7, 255]));

        // Gutter between rows: tile (0, 0) ends at y 12, tile (0, 1) starts at y 14
        assert_eq!(atlas.get_pixel(2, 12), &Rgba([0, 9, 7, 255]));
        assert_eq!(atlas.get_pixel(2, 13), &Rgba([0, 10, 7, 255]));

        // Outer margin and gutter corners are never smeared
        assert_eq!(atlas.get_pixel(1, 2), &Rgba([0, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(0, 2), &MAGENTA);
        assert_eq!(atlas.get_pixel(1, 1), &MAGENTA);
        assert_eq!(atlas.get_pixel(10, 12), &MAGENTA);
    }

    #[test]
    fn test_wide_smear_repeats_edge_pixel() {
        let sheet = SheetBuilder::new(8, 8)
            .padding(4)
            .smear(2)
            .background(MAGENTA)
            .build(coordinate_image(16, 8))
            .unwrap();
        let atlas = sheet.atlas();

        // Tile (0, 0) at x 4..12, tile (1, 0) at x 16..24
        assert_eq!(atlas.get_pixel(12, 4), &Rgba([7, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(13, 4), &Rgba([7, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(14, 4), &Rgba([8, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(15, 4), &Rgba([8, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(2, 4), &Rgba([0, 0, 7, 255]));
        assert_eq!(atlas.get_pixel(1, 4), &MAGENTA);
        assert_matches_source(&sheet);
    }

    #[test]
    fn test_zero_smear_leaves_gutter_as_background() {
        let sheet = SheetBuilder::new(8, 8)
            .padding(1)
            .smear(0)
            .background(MAGENTA)
            .build(coordinate_image(16, 8))
            .unwrap();

        assert_eq!(sheet.atlas().get_pixel(9, 1), &MAGENTA);
        assert_matches_source(&sheet);
    }

    #[test]
    fn test_slicing_a_sub_view() {
        let atlas = coordinate_image(40, 40);
        let region = atlas.sub_view(Rect::new(8, 8, 16, 16)).unwrap();
        let sheet = SheetBuilder::new(8, 8).build(region).unwrap();

        assert_eq!(sheet.tile(1, 1).unwrap().rect(), Rect::new(16, 16, 8, 8));
        assert_eq!(
            sheet.tile(1, 1).unwrap().pixel(0, 0),
            Some(Rgba([16, 16, 7, 255]))
        );
    }
}

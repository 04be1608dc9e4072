use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;
use rayon::prelude::*;

use super::save_png;
use crate::cli::CompressionLevel;
use crate::sheet::SpriteSheet;

/// File name for the tile at grid position `(x, y)`
pub fn tile_png_filename(base_name: &str, x: u32, y: u32) -> String {
    format!("{}_{}_{}.png", base_name, x, y)
}

/// Write every tile of `sheet` to its own PNG, returning the written paths in row-major order
pub fn write_tiles(
    sheet: &SpriteSheet,
    output_dir: &Path,
    base_name: &str,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<Vec<PathBuf>> {
    let tiles: Vec<_> = sheet.tiles().collect();

    tiles
        .par_iter()
        .map(|(x, y, tile)| {
            let path = output_dir.join(tile_png_filename(base_name, *x, *y));
            save_png(&tile.to_image(), &path, opaque, compress)?;
            debug!("Wrote {}", path.display());
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageView;
    use crate::sheet::SheetBuilder;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_tile_filename() {
        assert_eq!(tile_png_filename("melon", 3, 1), "melon_3_1.png");
    }

    #[test]
    fn test_write_tiles_round_trips_each_tile() {
        // 2x2 grid of 4x3 tiles, each pixel tagged with its sheet coordinates
        let image = RgbaImage::from_fn(8, 6, |x, y| {
            Rgba([
                u8::try_from(x * 30).unwrap_or(u8::MAX),
                u8::try_from(y * 40).unwrap_or(u8::MAX),
                90,
                255,
            ])
        });
        let sheet = SheetBuilder::new(4, 3).build(ImageView::new(image)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let written = write_tiles(&sheet, dir.path(), "melon", false, None).unwrap();

        let expected: Vec<PathBuf> = [
            "melon_0_0.png",
            "melon_1_0.png",
            "melon_0_1.png",
            "melon_1_1.png",
        ]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
        assert_eq!(written, expected);

        for (x, y, tile) in sheet.tiles() {
            let path = dir.path().join(tile_png_filename("melon", x, y));
            let decoded = image::open(&path).unwrap().into_rgba8();
            assert_eq!(decoded, tile.to_image(), "{} differs", path.display());
        }
    }

    #[test]
    fn test_write_tiles_into_missing_dir_fails() {
        let sheet = SheetBuilder::new(2, 2)
            .build(ImageView::new(RgbaImage::new(2, 2)))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = write_tiles(&sheet, &dir.path().join("missing"), "melon", false, None);
        assert!(result.is_err());
    }
}

use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::FlipbookError;

/// Save an image as PNG, optionally with compression
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(image, path, opaque)?;

    let output_data = if let Some(level) = compress {
        // Compress with oxipng
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| {
            FlipbookError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data
    };

    fs::write(path, output_data).map_err(|e| FlipbookError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Encode to PNG in memory
fn encode_png(image: &RgbaImage, path: &Path, opaque: bool) -> Result<Vec<u8>, FlipbookError> {
    let mut png_data = Cursor::new(Vec::new());
    let written = if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)
    } else {
        image.write_to(&mut png_data, ImageFormat::Png)
    };

    written.map_err(|e| FlipbookError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(png_data.into_inner())
}

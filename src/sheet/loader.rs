use std::path::Path;

use anyhow::Result;
use image::{ImageReader, RgbaImage};
use log::debug;

use crate::error::FlipbookError;

/// Decode the image at `path` into RGBA pixels
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(FlipbookError::InputNotFound(path.to_path_buf()).into());
    }

    let image = ImageReader::open(path)
        .map_err(|e| FlipbookError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| FlipbookError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| FlipbookError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(image)
}

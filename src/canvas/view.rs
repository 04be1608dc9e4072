use std::sync::Arc;

use image::{Rgba, RgbaImage};

use super::Rect;
use crate::error::FlipbookError;

/// A read-only window onto a rectangle of a shared image.
///
/// Views hold a reference-counted handle to their backing pixels, so the
/// backing image stays alive for as long as any view derived from it does.
/// Cloning a view never copies pixel data.
#[derive(Debug, Clone)]
pub struct ImageView {
    backing: Arc<RgbaImage>,
    rect: Rect,
}

impl ImageView {
    /// View covering the whole of `image`
    pub fn new(image: RgbaImage) -> Self {
        Self::whole(Arc::new(image))
    }

    /// View covering the whole of an already shared image
    pub fn whole(backing: Arc<RgbaImage>) -> Self {
        let rect = Rect::sized(backing.width(), backing.height());
        Self { backing, rect }
    }

    /// View over `rect` of `backing`, which must lie inside the image
    pub fn region(backing: Arc<RgbaImage>, rect: Rect) -> Result<Self, FlipbookError> {
        let bounds = Rect::sized(backing.width(), backing.height());
        if !bounds.contains(&rect) {
            return Err(FlipbookError::RegionOutOfBounds {
                region: rect,
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self { backing, rect })
    }

    /// View over `rect`, given relative to this view's own origin
    pub fn sub_view(&self, rect: Rect) -> Result<Self, FlipbookError> {
        let out_of_bounds = || FlipbookError::RegionOutOfBounds {
            region: rect,
            width: self.rect.width,
            height: self.rect.height,
        };
        if !Rect::sized(self.rect.width, self.rect.height).contains(&rect) {
            return Err(out_of_bounds());
        }
        let absolute = rect
            .checked_offset(self.rect.x, self.rect.y)
            .ok_or_else(out_of_bounds)?;
        Ok(Self {
            backing: Arc::clone(&self.backing),
            rect: absolute,
        })
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.rect.width, self.rect.height)
    }

    /// Rectangle of the backing image this view covers
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The image this view reads from
    pub fn backing(&self) -> &Arc<RgbaImage> {
        &self.backing
    }

    /// Returns true if both views read from the same pixel storage
    pub fn shares_storage_with(&self, other: &ImageView) -> bool {
        Arc::ptr_eq(&self.backing, &other.backing)
    }

    /// Pixel at `(x, y)` relative to the view origin, or `None` outside the view
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.rect.width || y >= self.rect.height {
            return None;
        }
        Some(*self.backing.get_pixel(self.rect.x + x, self.rect.y + y))
    }

    /// Copy the viewed pixels into a new image
    pub fn to_image(&self) -> RgbaImage {
        image::imageops::crop_imm(
            self.backing.as_ref(),
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height,
        )
        .to_image()
    }
}

use std::sync::Arc;

use glam::{Affine2, Vec2};
use image::{Pixel, Rgba, RgbaImage};

use super::{ImageView, Rect};
use crate::error::FlipbookError;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Largest canvas [`Canvas::checked`] will allocate (1 GiB of RGBA)
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// How source pixels combine with the pixels already on the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Blend {
    /// Alpha-composite the source over the target
    #[default]
    Over,
    /// Replace target pixels with source pixels, alpha included
    Copy,
}

/// Transform and compositing mode for a single draw call.
///
/// Transform helpers post-multiply, so `DrawOptions::new().scale(2.0, 2.0).translate(10.0, 0.0)`
/// scales the image first and then moves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub transform: Affine2,
    pub blend: Blend,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            blend: Blend::Over,
        }
    }
}

impl DrawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the image with its top-left corner at pixel `(x, y)`
    pub fn at(x: u32, y: u32) -> Self {
        Self::new().translate(x as f32, y as f32)
    }

    pub fn translate(mut self, tx: f32, ty: f32) -> Self {
        self.transform = Affine2::from_translation(Vec2::new(tx, ty)) * self.transform;
        self
    }

    pub fn scale(mut self, sx: f32, sy: f32) -> Self {
        self.transform = Affine2::from_scale(Vec2::new(sx, sy)) * self.transform;
        self
    }

    /// Rotate clockwise in screen space (y grows downwards) by `angle` radians
    pub fn rotate(mut self, angle: f32) -> Self {
        self.transform = Affine2::from_angle(angle) * self.transform;
        self
    }

    pub fn blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }
}

/// Something views can be drawn onto
pub trait Surface {
    /// Draw `view` with the given transform and blend mode
    fn draw(&mut self, view: &ImageView, options: &DrawOptions);

    /// Reset every pixel of `rect` to transparent
    fn clear(&mut self, rect: Rect);
}

/// An owned, mutable RGBA canvas
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Canvas filled with `color` whose size is computed by the caller in `u64`.
    ///
    /// Fails instead of allocating when either side overflows `u32` or the
    /// total exceeds [`MAX_CANVAS_PIXELS`].
    pub fn checked(width: u64, height: u64, color: Rgba<u8>) -> Result<Self, FlipbookError> {
        let too_large = || FlipbookError::CanvasTooLarge {
            width,
            height,
            max_pixels: MAX_CANVAS_PIXELS,
        };
        let pixels = width.checked_mul(height).ok_or_else(too_large)?;
        if pixels > MAX_CANVAS_PIXELS {
            return Err(too_large());
        }
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(too_large());
        };
        Ok(Self::filled(w, h, color))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::sized(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Freeze the canvas so views can share its pixels
    pub fn into_shared(self) -> Arc<RgbaImage> {
        Arc::new(self.image)
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Fill the part of `rect` that lies on the canvas
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some(clipped) = rect.intersection(&self.bounds()) else {
            return;
        };
        for y in clipped.rows() {
            for x in clipped.columns() {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    /// Destination pixels touched by an image of `width`x`height` under `transform`
    fn destination_bounds(&self, transform: &Affine2, width: u32, height: u32) -> Option<Rect> {
        let (w, h) = (width as f32, height as f32);
        let corners = [
            Vec2::ZERO,
            Vec2::new(w, 0.0),
            Vec2::new(0.0, h),
            Vec2::new(w, h),
        ]
        .map(|corner| transform.transform_point2(corner));

        let min = corners.iter().fold(Vec2::INFINITY, |acc, p| acc.min(*p));
        let max = corners.iter().fold(Vec2::NEG_INFINITY, |acc, p| acc.max(*p));

        let left = to_pixel(min.x.floor().max(0.0))?;
        let top = to_pixel(min.y.floor().max(0.0))?;
        let right = to_pixel(max.x.ceil().min(self.width() as f32))?;
        let bottom = to_pixel(max.y.ceil().min(self.height() as f32))?;

        if left >= right || top >= bottom {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

impl Surface for Canvas {
    fn draw(&mut self, view: &ImageView, options: &DrawOptions) {
        let (width, height) = view.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let transform = options.transform;
        if transform.matrix2.determinant().abs() <= f32::EPSILON {
            return;
        }
        let inverse = transform.inverse();

        let Some(bounds) = self.destination_bounds(&transform, width, height) else {
            return;
        };

        // Nearest-neighbour sampling at destination pixel centres
        for y in bounds.rows() {
            for x in bounds.columns() {
                let source = inverse.transform_point2(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                let (Some(sx), Some(sy)) = (to_pixel(source.x), to_pixel(source.y)) else {
                    continue;
                };
                let Some(pixel) = view.pixel(sx, sy) else {
                    continue;
                };

                let target = self.image.get_pixel_mut(x, y);
                match options.blend {
                    Blend::Over => target.blend(&pixel),
                    Blend::Copy => *target = pixel,
                }
            }
        }
    }

    fn clear(&mut self, rect: Rect) {
        self.fill_rect(rect, TRANSPARENT);
    }
}

/// Floor a non-negative coordinate to a pixel index
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked to be finite and non-negative"
)]
fn to_pixel(value: f32) -> Option<u32> {
    if !value.is_finite() || value < 0.0 || value >= u32::MAX as f32 {
        return None;
    }
    Some(value.floor() as u32)
}

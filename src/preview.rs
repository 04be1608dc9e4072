//! Headless playback: drive an animation with a fixed-step clock and record
//! what it would have put on screen.

use std::time::{Duration, Instant};

use image::RgbaImage;
use log::debug;

use crate::animation::{Animation, Frame, parse_frame_spec};
use crate::canvas::{Canvas, DrawOptions, MAX_CANVAS_PIXELS, TRANSPARENT};
use crate::error::FlipbookError;
use crate::sheet::SpriteSheet;

/// Result of a headless playback run
#[derive(Debug)]
pub struct Playback {
    /// One cell per tick, left to right, each showing the frame current after that tick
    pub strip: RgbaImage,
    /// Frame index after each tick
    pub indices: Vec<usize>,
}

/// Build animation frames from `x,y[:ms]` descriptions of sheet tiles.
///
/// An empty list animates the sheet's first row.
pub fn frames_from_specs(
    sheet: &SpriteSheet,
    specs: &[String],
    default_duration: Duration,
) -> Result<Vec<Frame>, FlipbookError> {
    if specs.is_empty() {
        return sheet.row_frames(0, 0..sheet.grid_width(), default_duration);
    }

    specs
        .iter()
        .map(|spec| {
            let (x, y, duration) = parse_frame_spec(spec)?;
            let tile = sheet.tile(x, y)?;
            Ok(Frame::new(
                tile.clone(),
                duration.unwrap_or(default_duration),
            ))
        })
        .collect()
}

/// Tick `animation` `ticks` times, `interval` apart starting from `start`, and
/// render each result into its own cell of a horizontal strip.
///
/// Cells are `cell_width`x`cell_height` pixels; frames are drawn with `options`
/// relative to the cell's top-left corner. Fails before ticking when the strip
/// would be too large to allocate.
pub fn play(
    animation: &mut Animation,
    start: Instant,
    interval: Duration,
    ticks: u32,
    (cell_width, cell_height): (u32, u32),
    options: &DrawOptions,
) -> Result<Playback, FlipbookError> {
    let strip_width = u64::from(cell_width) * u64::from(ticks);
    let mut canvas = Canvas::checked(strip_width, u64::from(cell_height), TRANSPARENT)?;
    let mut indices = Vec::with_capacity(ticks as usize);
    let mut now = start;
    let mut left = 0u32;

    for _ in 0..ticks {
        now += interval;
        animation.tick(now);
        indices.push(animation.current_index());

        let placed = options.translate(left as f32, 0.0);
        animation.render(&mut canvas, &placed);
        // The allocated strip is at most u32::MAX wide
        left = left.saturating_add(cell_width);
    }

    debug!(
        "Played {} ticks at {:?} intervals: {:?}",
        ticks, interval, indices
    );

    Ok(Playback {
        strip: canvas.into_image(),
        indices,
    })
}

/// Pixel size of one tile drawn at the sheet's display scale.
///
/// Negative scales count as 0; a non-finite scale or a size past `u32` is an error.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "both sides are checked to be finite and within u32 before the cast"
)]
pub fn scaled_tile_size(sheet: &SpriteSheet) -> Result<(u32, u32), FlipbookError> {
    // f64::max would turn NaN into 0
    let scale = if sheet.scale().is_nan() {
        f64::INFINITY
    } else {
        sheet.scale().max(0.0)
    };
    let (w, h) = sheet.tile_size();
    let width = (f64::from(w) * scale).ceil();
    let height = (f64::from(h) * scale).ceil();

    let limit = f64::from(u32::MAX);
    if !(width.is_finite() && height.is_finite()) || width > limit || height > limit {
        return Err(FlipbookError::CanvasTooLarge {
            width: if width.is_finite() { width as u64 } else { u64::MAX },
            height: if height.is_finite() { height as u64 } else { u64::MAX },
            max_pixels: MAX_CANVAS_PIXELS,
        });
    }
    Ok((width as u32, height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageView;
    use crate::sheet::SheetBuilder;
    use image::Rgba;

    /// A 5x1 sheet of 8x10 tiles where tile `i` is filled with shade `i * 50`
    fn melon_sheet(scale: f64) -> SpriteSheet {
        let image = RgbaImage::from_fn(40, 10, |x, _| {
            Rgba([u8::try_from(x / 8 * 50).unwrap_or(u8::MAX), 0, 0, 255])
        });
        SheetBuilder::new(8, 10)
            .scale(scale)
            .build(ImageView::new(image))
            .unwrap()
    }

    #[test]
    fn test_default_frames_use_first_row() {
        let sheet = melon_sheet(1.0);
        let frames = frames_from_specs(&sheet, &[], Duration::from_millis(50)).unwrap();

        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|f| f.duration() == Duration::from_millis(50)));
    }

    #[test]
    fn test_specs_pick_tiles_and_durations() {
        let sheet = melon_sheet(1.0);
        let specs = vec!["4,0:250".to_string(), "1,0".to_string()];
        let frames = frames_from_specs(&sheet, &specs, Duration::from_millis(50)).unwrap();

        assert_eq!(frames[0].duration(), Duration::from_millis(250));
        assert_eq!(frames[0].image().pixel(0, 0), Some(Rgba([200, 0, 0, 255])));
        assert_eq!(frames[1].duration(), Duration::from_millis(50));
    }

    #[test]
    fn test_spec_outside_grid_fails() {
        let sheet = melon_sheet(1.0);
        let specs = vec!["5,0".to_string()];
        assert!(matches!(
            frames_from_specs(&sheet, &specs, Duration::from_millis(50)),
            Err(FlipbookError::TileOutOfRange { x: 5, .. })
        ));
    }

    #[test]
    fn test_play_records_and_renders_each_tick() {
        let sheet = melon_sheet(2.0);
        let frames = sheet
            .row_frames(0, 0..3, Duration::from_millis(50))
            .unwrap();
        let start = Instant::now();
        let mut animation = Animation::starting_at(frames, start).unwrap();

        let cell = scaled_tile_size(&sheet).unwrap();
        assert_eq!(cell, (16, 20));

        let playback = play(
            &mut animation,
            start,
            Duration::from_millis(30),
            4,
            cell,
            &sheet.draw_options(),
        )
        .unwrap();

        assert_eq!(playback.indices, vec![0, 1, 1, 2]);
        assert_eq!(playback.strip.dimensions(), (64, 20));
        assert_eq!(playback.strip.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(playback.strip.get_pixel(16 + 15, 19), &Rgba([50, 0, 0, 255]));
        assert_eq!(playback.strip.get_pixel(48, 0), &Rgba([100, 0, 0, 255]));
    }

    #[test]
    fn test_oversized_strip_fails_without_ticking() {
        let sheet = melon_sheet(2.0);
        let frames = sheet
            .row_frames(0, 0..3, Duration::from_millis(50))
            .unwrap();
        let start = Instant::now();
        let mut animation = Animation::starting_at(frames, start).unwrap();

        let result = play(
            &mut animation,
            start,
            Duration::from_millis(30),
            300_000_000,
            (16, 16),
            &sheet.draw_options(),
        );

        assert!(matches!(
            result,
            Err(FlipbookError::CanvasTooLarge {
                width: 4_800_000_000,
                height: 16,
                ..
            })
        ));
        assert_eq!(animation.current_index(), 0);
    }

    #[test]
    fn test_unbounded_scale_is_rejected() {
        for scale in [f64::INFINITY, f64::NAN, 1e12] {
            assert!(
                matches!(
                    scaled_tile_size(&melon_sheet(scale)),
                    Err(FlipbookError::CanvasTooLarge { .. })
                ),
                "scale {} accepted",
                scale
            );
        }
        assert_eq!(scaled_tile_size(&melon_sheet(-1.0)).unwrap(), (0, 0));
    }
}

use std::time::Duration;

use crate::canvas::ImageView;
use crate::error::FlipbookError;

/// One image of an animation and how long it stays on screen
#[derive(Debug, Clone)]
pub struct Frame {
    image: ImageView,
    duration: Duration,
}

impl Frame {
    pub fn new(image: ImageView, duration: Duration) -> Self {
        Self { image, duration }
    }

    pub fn image(&self) -> &ImageView {
        &self.image
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Parse a `x,y` or `x,y:ms` frame description into tile coordinates and an
/// optional duration in milliseconds
pub fn parse_frame_spec(spec: &str) -> Result<(u32, u32, Option<Duration>), FlipbookError> {
    let invalid = |reason: &str| FlipbookError::InvalidFrameSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (coords, duration) = match spec.split_once(':') {
        Some((coords, ms)) => {
            let ms = ms
                .trim()
                .parse::<u64>()
                .map_err(|_e| invalid("duration must be whole milliseconds"))?;
            (coords, Some(Duration::from_millis(ms)))
        }
        None => (spec, None),
    };

    let (x, y) = coords
        .split_once(',')
        .ok_or_else(|| invalid("expected tile coordinates as x,y"))?;
    let x = x
        .trim()
        .parse::<u32>()
        .map_err(|_e| invalid("x must be a non-negative integer"))?;
    let y = y
        .trim()
        .parse::<u32>()
        .map_err(|_e| invalid("y must be a non-negative integer"))?;

    Ok((x, y, duration))
}

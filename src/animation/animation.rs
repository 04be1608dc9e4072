use std::time::Instant;

use log::trace;

use super::Frame;
use crate::canvas::{DrawOptions, Surface};
use crate::error::FlipbookError;

/// Whether an animation advances when ticked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Playing,
    Paused,
}

/// A looping sequence of frames driven by a clock.
///
/// Each tick advances by at most one frame. When ticks arrive less often than
/// frames are due, the animation slows down instead of skipping frames.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<Frame>,
    current: usize,
    last_advance: Instant,
    state: PlaybackState,
}

impl Animation {
    /// Start playing `frames` from the first one, timed from now
    pub fn new(frames: Vec<Frame>) -> Result<Self, FlipbookError> {
        Self::starting_at(frames, Instant::now())
    }

    /// Start playing `frames` with the first frame shown at `start`
    pub fn starting_at(frames: Vec<Frame>, start: Instant) -> Result<Self, FlipbookError> {
        if frames.is_empty() {
            return Err(FlipbookError::EmptyAnimation);
        }
        Ok(Self {
            frames,
            current: 0,
            last_advance: start,
            state: PlaybackState::Playing,
        })
    }

    /// Advance to the next frame if the current one has been shown for longer than its duration
    pub fn tick(&mut self, now: Instant) {
        if self.state == PlaybackState::Paused {
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_advance);
        if elapsed > self.frames[self.current].duration() {
            self.last_advance = now;
            self.current = (self.current + 1) % self.frames.len();
            trace!("Animation advanced to frame {}", self.current);
        }
    }

    /// [`tick`](Self::tick) against the wall clock
    pub fn update(&mut self) {
        self.tick(Instant::now());
    }

    /// Draw the current frame onto `target`
    pub fn render<S: Surface + ?Sized>(&self, target: &mut S, options: &DrawOptions) {
        target.draw(self.current_frame().image(), options);
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Rewind to the first frame, timed from `now`
    pub fn reset(&mut self, now: Instant) {
        self.current = 0;
        self.last_advance = now;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; an animation cannot be built without frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

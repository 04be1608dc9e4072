mod animation;
mod frame;

pub use animation::{Animation, PlaybackState};
pub use frame::{Frame, parse_frame_spec};

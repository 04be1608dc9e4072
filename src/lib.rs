pub mod animation;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod preview;
pub mod sheet;

pub use animation::{Animation, Frame, PlaybackState};
pub use canvas::{Blend, Canvas, DrawOptions, ImageView, Rect, Surface};
pub use cli::{CliArgs, Command, CommonArgs, PreviewArgs};
pub use error::FlipbookError;
pub use sheet::{SheetBuilder, SpriteSheet};

mod draw;
mod rect;
mod view;

pub use draw::{Blend, Canvas, DrawOptions, MAX_CANVAS_PIXELS, Surface, TRANSPARENT};
pub use rect::Rect;
pub use view::ImageView;

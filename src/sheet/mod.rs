mod builder;
mod loader;
mod sheet;

pub use builder::{DEFAULT_PADDING, DEFAULT_SMEAR, SheetBuilder};
pub use loader::load_image;
pub use sheet::SpriteSheet;

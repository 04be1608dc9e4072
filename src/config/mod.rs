mod load;
mod merge;
mod types;

pub use load::LoadedConfig;
pub use merge::MergedConfig;
pub use types::{CompressConfig, FlipbookConfig};

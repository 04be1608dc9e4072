use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Flipbook configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipbookConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Sprite sheet image to slice
    pub input: Option<String>,
    /// Output directory for generated files
    pub output_dir: String,
    /// Base name for output files (sheet.png, sheet.json, etc.)
    pub name: String,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Display multiplier stored with the sheet
    pub scale: f64,
    /// Gutter between tiles in the padded atlas (0 disables padding)
    pub padding: u32,
    /// Pixels of edge colour duplicated into each gutter (default: 1, at most padding / 2)
    pub smear: Option<u32>,
    /// Atlas background as hex RGBA, e.g. "#ff00ffff"
    pub background: Option<String>,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Output RGB instead of RGBA
    pub opaque: bool,
    /// Preview frames as "x,y" or "x,y:ms"
    pub frames: Vec<String>,
    /// Duration of preview frames that do not specify one
    pub frame_ms: u64,
    /// Number of simulated preview ticks
    pub ticks: u32,
    /// Simulated ticks per second
    pub fps: u32,
}

impl Default for FlipbookConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: None,
            output_dir: ".".to_string(),
            name: "sheet".to_string(),
            tile_width: 16,
            tile_height: 16,
            scale: 1.0,
            padding: 0,
            smear: None,
            background: None,
            compress: None,
            opaque: false,
            frames: Vec::new(),
            frame_ms: 100,
            ticks: 60,
            fps: 60,
        }
    }
}

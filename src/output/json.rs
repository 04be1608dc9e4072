use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::error::FlipbookError;
use crate::sheet::SpriteSheet;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    sheet: JsonSheet,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSheet {
    image: String,
    size: Size,
    tile_size: Size,
    grid_size: Size,
    padding: u32,
    smear: u32,
    scale: f64,
    tiles: Vec<JsonTile>,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonTile {
    x: u32,
    y: u32,
    frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write JSON metadata describing where each tile sits in `image_name`
pub fn write_json(
    sheet: &SpriteSheet,
    image_name: &str,
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = serde_json::to_string_pretty(&sheet_to_json(sheet, image_name))?;

    fs::write(&json_path, content).map_err(|e| FlipbookError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

fn sheet_to_json(sheet: &SpriteSheet, image_name: &str) -> JsonOutput {
    let atlas = sheet.atlas();
    let (tile_w, tile_h) = sheet.tile_size();
    let (grid_w, grid_h) = sheet.grid_size();

    let tiles = sheet
        .tiles()
        .map(|(x, y, tile)| {
            let rect = tile.rect();
            JsonTile {
                x,
                y,
                frame: Frame {
                    x: rect.x,
                    y: rect.y,
                    w: rect.width,
                    h: rect.height,
                },
            }
        })
        .collect();

    JsonOutput {
        meta: Meta {
            app: "flipbook",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        sheet: JsonSheet {
            image: image_name.to_string(),
            size: Size {
                w: atlas.width(),
                h: atlas.height(),
            },
            tile_size: Size {
                w: tile_w,
                h: tile_h,
            },
            grid_size: Size {
                w: grid_w,
                h: grid_h,
            },
            padding: sheet.padding(),
            smear: sheet.smear(),
            scale: sheet.scale(),
            tiles,
        },
    }
}

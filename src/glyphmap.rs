// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Glyph maps: icon names mapped to font codes.
//!
//! This is the format icon font tools like `react-native-vector-icons` expect.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Error;

/// A glyph map file name.
pub const FILE_NAME: &str = "glyphmap.json";

/// Icon names mapped to glyph codes, in insertion order.
pub type GlyphMap = Map<String, Value>;

#[derive(Deserialize)]
struct IcoMoonJson {
    icons: Vec<IcoMoonIcon>,
}

#[derive(Deserialize)]
struct IcoMoonIcon {
    properties: IcoMoonProperties,
}

#[derive(Deserialize)]
struct IcoMoonProperties {
    name: String,
    code: u32,
}

/// Builds a glyph map from an IcoMoon `selection.json`.
///
/// Later icons with the same name overwrite earlier ones.
pub fn from_icomoon(text: &str) -> Result<GlyphMap, Error> {
    let icomoon: IcoMoonJson = serde_json::from_str(text)?;

    let mut map = GlyphMap::new();
    for icon in icomoon.icons {
        map.insert(icon.properties.name, Value::from(icon.properties.code));
    }

    Ok(map)
}

/// Builds a glyph map from a font generator `info.json`.
///
/// The file maps glyph names to objects with an `encodedCode` string.
/// Glyphs without one are skipped.
pub fn from_font_info(text: &str) -> Result<GlyphMap, Error> {
    let info: Map<String, Value> = serde_json::from_str(text)?;

    let mut map = GlyphMap::new();
    for (name, glyph) in info {
        match glyph.get("encodedCode") {
            Some(Value::String(code)) => {
                map.insert(name, Value::String(code.clone()));
            }
            _ => log::debug!("Glyph '{}' has no encoded code. Skipped.", name),
        }
    }

    Ok(map)
}

/// Converts an IcoMoon `selection.json` into a `glyphmap.json` placed next to it.
///
/// Returns the path to the new file.
pub fn convert_icomoon_file(path: &Path) -> Result<PathBuf, Error> {
    log::info!("Reading {}", path.display());
    let text = fs::read_to_string(path)?;
    let map = from_icomoon(&text)?;

    let out_path = path.with_file_name(FILE_NAME);
    log::info!("Saving {} glyphs to {}", map.len(), out_path.display());
    fs::write(&out_path, serde_json::to_string(&map)?)?;
    Ok(out_path)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Packaging a cropped icon set into a font.
//!
//! Font files are produced by an external generator, `svgtofont` by default.
//! We only run it and reduce its `info.json` into a glyph map.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{glyphmap, Error};

/// The default font generator.
pub const DEFAULT_GENERATOR: &str = "svgtofont";

/// Font packaging options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Font family name.
    pub font_name: String,

    /// A directory with SVG icons.
    pub svg_dir: PathBuf,

    /// An output directory for fonts and the glyph map.
    ///
    /// Default: `./font`
    pub out_dir: PathBuf,

    /// A generator executable.
    ///
    /// `None` will look for `svgtofont` in `PATH`.
    pub generator: Option<PathBuf>,

    /// Do not run the generator and only build a glyph map
    /// from an existing `info.json`.
    pub skip_generator: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            font_name: String::new(),
            svg_dir: PathBuf::new(),
            out_dir: PathBuf::from("./font"),
            generator: None,
            skip_generator: false,
        }
    }
}

/// Generates a font and its glyph map.
///
/// Returns the path to the glyph map.
pub fn generate(opt: &Options) -> Result<PathBuf, Error> {
    crate::session::ensure_distinct_dirs(&opt.svg_dir, &opt.out_dir)?;
    fs::create_dir_all(&opt.out_dir)?;

    if !opt.skip_generator {
        log::info!("Generating a font named: {}", opt.font_name);
        run_generator(opt)?;
    }

    write_glyph_map(&opt.out_dir)
}

/// Generator settings that have no command line flags.
///
/// `svgtofont` looks for it in the working directory.
const GENERATOR_CONFIG: &str = ".svgtofontrc";

/// Returns the generator executable.
fn find_generator(opt: &Options) -> Result<PathBuf, Error> {
    match opt.generator {
        // The generator runs inside the output directory,
        // so a relative path must be resolved beforehand.
        Some(ref path) if path.components().count() > 1 => {
            Ok(fs::canonicalize(path).unwrap_or_else(|_| path.clone()))
        }
        Some(ref path) => Ok(path.clone()),
        None => which::which(DEFAULT_GENERATOR).map_err(|e| {
            Error::GeneratorFailed(format!("'{}' is not found cause {}", DEFAULT_GENERATOR, e))
        }),
    }
}

fn run_generator(opt: &Options) -> Result<(), Error> {
    let generator = find_generator(opt)?;
    let svg_dir = fs::canonicalize(&opt.svg_dir)?;
    let out_dir = fs::canonicalize(&opt.out_dir)?;

    // `info.json` is produced only on request.
    let config = serde_json::json!({
        "generateInfoData": true,
        "css": false,
    });
    let config_path = out_dir.join(GENERATOR_CONFIG);
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    log::debug!("Running {} in {}", generator.display(), out_dir.display());
    let status = Command::new(&generator)
        .current_dir(&out_dir)
        .arg("--sources")
        .arg(&svg_dir)
        .arg("--output")
        .arg(&out_dir)
        .arg("--fontName")
        .arg(&opt.font_name)
        .status();

    if let Err(e) = fs::remove_file(&config_path) {
        log::warn!("Failed to remove {} cause {}.", config_path.display(), e);
    }

    let status = status.map_err(|e| {
        Error::GeneratorFailed(format!("failed to run '{}' cause {}", generator.display(), e))
    })?;

    if !status.success() {
        return Err(Error::GeneratorFailed(format!(
            "'{}' has finished with {}",
            generator.display(),
            status
        )));
    }

    if !out_dir.join("info.json").is_file() {
        return Err(Error::GeneratorFailed(format!(
            "'{}' has not produced info.json",
            generator.display()
        )));
    }

    Ok(())
}

/// Reduces `info.json` in `out_dir` into `glyphmap.json`.
pub fn write_glyph_map(out_dir: &Path) -> Result<PathBuf, Error> {
    let info_path = out_dir.join("info.json");
    let text = fs::read_to_string(&info_path)?;
    let map = glyphmap::from_font_info(&text)?;

    let path = out_dir.join(glyphmap::FILE_NAME);
    fs::write(&path, serde_json::to_string_pretty(&map)?)?;
    log::info!("Created {} with {} glyphs.", path.display(), map.len());
    Ok(path)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An icon set cropping session.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, GeometryHost};

/// A source icon.
#[derive(Clone, PartialEq, Debug)]
pub struct Icon {
    /// File name, like `home.svg`.
    pub name: String,
    /// Raw SVG markup.
    pub source: String,
}

/// Walks through all SVG files of a directory, one at a time.
#[derive(Debug)]
pub struct Session {
    svg_dir: PathBuf,
    out_dir: PathBuf,
    files: Vec<String>,
    current: usize,
    host: GeometryHost,
}

impl Session {
    /// Creates a new session over the `*.svg` files in `svg_dir`.
    ///
    /// Icons are sorted by name.
    pub fn new(svg_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let svg_dir = svg_dir.into();
        let out_dir = out_dir.into();
        let files = list_icons(&svg_dir)?;
        log::info!("Found {} SVG files.", files.len());

        Ok(Session {
            svg_dir,
            out_dir,
            files,
            current: 0,
            host: GeometryHost::default(),
        })
    }

    /// Sets the host used by [`Session::crop_icon`].
    pub fn with_host(mut self, host: GeometryHost) -> Self {
        self.host = host;
        self
    }

    /// Re-reads the icons list and starts over.
    pub fn restart(&mut self) -> Result<(), Error> {
        self.files = list_icons(&self.svg_dir)?;
        self.current = 0;
        log::info!("Found {} SVG files.", self.files.len());
        Ok(())
    }

    /// Returns the next icon and advances the cursor.
    ///
    /// Returns `None` when all icons were visited.
    pub fn next_icon(&mut self) -> Option<Result<Icon, Error>> {
        let name = self.files.get(self.current)?.clone();
        self.current += 1;

        let path = self.svg_dir.join(&name);
        Some(
            fs::read_to_string(&path)
                .map(|source| Icon { name, source })
                .map_err(Error::from),
        )
    }

    /// Crops an icon.
    pub fn crop_icon(&self, icon: &Icon) -> Result<String, Error> {
        log::info!("Cropping {}", icon.name);
        crate::crop_with(&icon.source, &self.host)
    }

    /// Writes an icon into the output directory.
    ///
    /// Only the file name part of `name` is used, so an icon never leaves the output directory.
    pub fn save(&self, name: &str, content: &str) -> Result<PathBuf, Error> {
        let file_name = match Path::new(name).file_name() {
            Some(v) => v,
            None => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("'{}' is not a valid file name", name),
                )));
            }
        };

        let path = self.out_dir.join(file_name);
        log::info!("Saving {}", path.display());
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Returns the number of icons.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Checks that the directory has no icons.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the number of icons not visited yet.
    pub fn remaining(&self) -> usize {
        self.files.len() - self.current
    }

    /// Returns the source directory.
    pub fn svg_dir(&self) -> &Path {
        &self.svg_dir
    }

    /// Returns the output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// Checks that the source and output directories are not the same.
///
/// Cropped icons would overwrite the source ones otherwise.
pub fn ensure_distinct_dirs(svg_dir: &Path, out_dir: &Path) -> Result<(), Error> {
    if absolute(svg_dir) == absolute(out_dir) {
        return Err(Error::SameDirectory);
    }

    Ok(())
}

// The output directory may not exist yet.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }

    let path = match std::env::current_dir() {
        Ok(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    };

    // Drop `.` components and trailing separators.
    path.components().collect()
}

/// Returns names of all `*.svg` files in a directory, sorted.
fn list_icons(dir: &Path) -> Result<Vec<String>, Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        if !is_svg {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(name) => log::warn!("'{}' has a non UTF-8 name. Skipped.", name.to_string_lossy()),
        }
    }

    files.sort();
    Ok(files)
}

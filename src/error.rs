// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// No element survived the visibility filter.
    ///
    /// The document is left untouched, since a zero viewport would make it invisible.
    EmptyVisibleSet,

    /// Failed to parse an SVG data.
    MalformedDocument(icontree::Error),

    /// Failed to read or write a file.
    Io(std::io::Error),

    /// Failed to read or write JSON.
    InvalidJson(serde_json::Error),

    /// The external font generator could not be run or has failed.
    GeneratorFailed(String),

    /// Input and output directories are the same.
    ///
    /// Cropped icons would overwrite the originals.
    SameDirectory,
}

impl From<icontree::Error> for Error {
    fn from(e: icontree::Error) -> Self {
        Error::MalformedDocument(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::EmptyVisibleSet => {
                write!(f, "the image has no visible elements")
            }
            Error::MalformedDocument(ref e) => {
                write!(f, "{}", e)
            }
            Error::Io(ref e) => {
                write!(f, "{}", e)
            }
            Error::InvalidJson(ref e) => {
                write!(f, "invalid JSON cause {}", e)
            }
            Error::GeneratorFailed(ref msg) => {
                write!(f, "font generation failed cause {}", msg)
            }
            Error::SameDirectory => {
                write!(f, "input and output directories must be different")
            }
        }
    }
}

impl std::error::Error for Error {}

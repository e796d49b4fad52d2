// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`iconcrop` removes the empty space around SVG icons.

The cropper finds the bounding box of all visible elements of an icon
and replaces the root `viewBox`, `width` and `height` with a `viewBox` of that box.
Elements are measured by a [`Host`]. [`GeometryHost`] does it natively,
following the way browsers report element rects.

```
let cropped = iconcrop::crop(
    "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
        <rect x='4' y='6' width='10' height='8'/>\
    </svg>",
).unwrap();
assert!(cropped.contains("viewBox=\"4 6 10 8\""));
```

Besides the cropper, the crate contains the tools around it: a browser-based
review [`session`] and the [`font`] packaging step for a cropped icon set.
*/

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod crop;
mod error;
pub mod font;
pub mod glyphmap;
pub mod host;
pub mod render;
pub mod server;
pub mod session;

pub use crate::crop::{crop_document, BoundingBox, Viewport};
pub use crate::error::Error;
pub use crate::host::{Host, Paint, Rect, ResolvedStyle};
pub use crate::render::{GeometryHost, Options};

pub use icontree;

/// Crops an SVG icon.
///
/// Uses [`GeometryHost`] with default options.
/// The result is written without reformatting.
pub fn crop(text: &str) -> Result<String, Error> {
    crop_with(text, &GeometryHost::default())
}

/// Crops an SVG icon using the provided host.
pub fn crop_with(text: &str, host: &impl Host) -> Result<String, Error> {
    let mut doc = icontree::Document::parse_str(text)?;
    crop_document(&mut doc, host)?;
    Ok(doc.to_string(&icontree::WriteOptions::default()))
}

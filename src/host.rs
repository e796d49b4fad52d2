// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use icontree::{Document, NodeId};

/// A measured rectangle.
///
/// `width` and `height` are never negative.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a new `Rect` from values.
    ///
    /// Negative sizes are clamped to zero.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Creates a new `Rect` from edges.
    #[inline]
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Rect::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Checks that the rect covers no area in both directions.
    ///
    /// A horizontal line has a zero height, but is still not empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

impl From<kurbo::Rect> for Rect {
    #[inline]
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Rect::new(r.x0, r.y0, r.width(), r.height())
    }
}

/// A resolved paint.
#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    /// `none`.
    None,
    /// A plain color, `currentColor` already resolved.
    Color(svgtypes::Color),
    /// A paint server reference, like `url(#gradient)`.
    Url(String),
}

impl Paint {
    /// Checks that the paint is `none`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    /// Checks that the paint is opaque pure white, aka `rgb(255, 255, 255)`.
    pub fn is_white(&self) -> bool {
        match self {
            Paint::Color(c) => {
                c.red == 255 && c.green == 255 && c.blue == 255 && c.alpha == 255
            }
            _ => false,
        }
    }
}

/// Computed style values the cropper cares about.
#[derive(Clone, PartialEq, Debug)]
pub struct ResolvedStyle {
    pub fill: Paint,
    pub stroke: Paint,
    /// In user units.
    pub stroke_width: f64,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        ResolvedStyle {
            fill: Paint::Color(svgtypes::Color::new_rgb(0, 0, 0)),
            stroke: Paint::None,
            stroke_width: 1.0,
        }
    }
}

/// Geometry and style queries for document nodes.
///
/// The cropper itself never inspects geometry, it only asks a host.
/// [`GeometryHost`](crate::GeometryHost) is the default implementation.
pub trait Host {
    /// Returns node's rectangle in the root user space.
    ///
    /// `None` means that the node has no visual box and is treated as zero-sized.
    fn measure(&self, doc: &Document, id: NodeId) -> Option<Rect>;

    /// Returns node's computed `fill`, `stroke` and `stroke-width`.
    fn resolved_style(&self, doc: &Document, id: NodeId) -> ResolvedStyle;
}

impl<T: Host + ?Sized> Host for &T {
    #[inline]
    fn measure(&self, doc: &Document, id: NodeId) -> Option<Rect> {
        (**self).measure(doc, id)
    }

    #[inline]
    fn resolved_style(&self, doc: &Document, id: NodeId) -> ResolvedStyle {
        (**self).resolved_style(doc, id)
    }
}

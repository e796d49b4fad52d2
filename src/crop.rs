// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use icontree::{Attribute, Document, Node, NodeId};

use crate::host::{Host, Rect};
use crate::Error;

/// Elements that never contribute to the image bounds on their own.
const INVISIBLE_ELEMENTS: &[&str] = &[
    "defs",
    "g",
    "foreignObject",
    "svg",
    "style",
    "title",
    "desc",
];

/// Attributes that describe the old viewport.
const VIEWPORT_ATTRIBUTES: &[&str] = &["viewBox", "width", "height"];

/// A bounding box accumulator.
///
/// Starts inverted, so the first folded rect defines it completely.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Default for BoundingBox {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// Creates an empty bounding box.
    #[inline]
    pub fn new() -> Self {
        BoundingBox {
            top: f64::INFINITY,
            left: f64::INFINITY,
            bottom: f64::NEG_INFINITY,
            right: f64::NEG_INFINITY,
        }
    }

    /// Checks that nothing was folded in yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.top <= self.bottom && self.left <= self.right)
    }

    /// Extends the box to include the `rect`.
    pub fn fold(&mut self, rect: Rect) {
        self.top = self.top.min(rect.top());
        self.left = self.left.min(rect.left());
        self.bottom = self.bottom.max(rect.bottom());
        self.right = self.right.max(rect.right());
    }
}

/// A cropped viewport, written as the root `viewBox`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Converts a bounding box into a viewport, rounding all numbers to 2 decimal places.
    ///
    /// Returns `None` for an empty box.
    pub fn from_bbox(bbox: &BoundingBox) -> Option<Self> {
        if bbox.is_empty() {
            return None;
        }

        Some(Viewport {
            left: round_number(bbox.left),
            top: round_number(bbox.top),
            width: round_number(bbox.right - bbox.left),
            height: round_number(bbox.bottom - bbox.top),
        })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.width, self.height)
    }
}

/// Rounds a number to 2 decimal places.
///
/// Negative zero becomes a plain zero, so `-0` is never printed.
fn round_number(n: f64) -> f64 {
    let n = (n * 100.0).round() / 100.0;
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

/// Returns all document nodes in pre-order, including the root and text nodes.
pub fn flatten(doc: &Document) -> Vec<NodeId> {
    doc.descendants().map(|node| node.id()).collect()
}

/// Checks that a node contributes to the image bounds.
pub fn is_visible(doc: &Document, id: NodeId, host: &impl Host) -> bool {
    let node = doc.get(id);

    let tag_name = match node.tag_name() {
        Some(v) => v,
        None => return false,
    };

    if INVISIBLE_ELEMENTS.contains(&tag_name) {
        return false;
    }

    let style = host.resolved_style(doc, id);

    // A white or transparent background rect.
    if tag_name == "rect"
        && !node.has_children()
        && style.stroke.is_none()
        && (style.fill.is_none() || style.fill.is_white())
    {
        return false;
    }

    let has_area = match host.measure(doc, id) {
        Some(rect) => !rect.is_empty(),
        None => false,
    };
    if !has_area {
        return false;
    }

    if let Some(parent) = node.parent_element() {
        if parent.has_attribute("mask") || parent.tag_name() == Some("defs") {
            return false;
        }
    }

    !style.stroke.is_none() || !style.fill.is_none()
}

/// Folds the rectangles of the provided nodes into a bounding box.
///
/// Stroked nodes are inflated by a half of their stroke width.
pub fn accumulate(doc: &Document, nodes: &[NodeId], host: &impl Host) -> BoundingBox {
    let mut bbox = BoundingBox::new();
    for id in nodes.iter().copied() {
        let rect = match host.measure(doc, id) {
            Some(v) => v,
            None => continue,
        };

        let style = host.resolved_style(doc, id);
        let rect = if !style.stroke.is_none() {
            let w = style.stroke_width / 2.0;
            Rect::from_ltrb(
                rect.left() - w,
                rect.top() - w,
                rect.right() + w,
                rect.bottom() + w,
            )
        } else {
            rect
        };

        bbox.fold(rect);
    }

    bbox
}

/// Crops the document to the bounds of its visible elements.
///
/// Replaces the root `viewBox`, `width` and `height` attributes with a new `viewBox`.
/// On error, the document is left unchanged.
pub fn crop_document(doc: &mut Document, host: &impl Host) -> Result<Viewport, Error> {
    let root_id = doc.root_element().id();
    let original: Vec<Attribute> = doc.root_element().attributes().to_vec();

    for name in VIEWPORT_ATTRIBUTES {
        doc.remove_attribute(root_id, name);
    }

    let (visible, bbox) = {
        let doc: &Document = doc;
        let visible: Vec<NodeId> = flatten(doc)
            .into_iter()
            .filter(|id| is_visible(doc, *id, host))
            .collect();
        let bbox = accumulate(doc, &visible, host);
        (visible, bbox)
    };

    let viewport = match Viewport::from_bbox(&bbox) {
        Some(v) => v,
        None => {
            doc.replace_attributes(root_id, original);
            return Err(Error::EmptyVisibleSet);
        }
    };

    log::debug!(
        "{} visible elements, viewBox is '{}'.",
        visible.len(),
        viewport
    );

    doc.set_attribute(root_id, "viewBox", &viewport.to_string());
    Ok(viewport)
}

/// Returns a short element description for logs.
pub(crate) fn describe(node: Node) -> String {
    let tag_name = node.tag_name().unwrap_or("#text");
    match node.element_id() {
        "" => tag_name.to_string(),
        id => format!("{} '{}'", tag_name, id),
    }
}

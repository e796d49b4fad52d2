// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use icontree::{ElementId, Node};
use kurbo::Rect;
use svgtypes::Length;

use super::path::PathData;
use super::units::{convert_length, convert_user_length};
use super::Options;

/// Returns a tight bounding box of a basic shape, a path or an image
/// in its own user space.
pub(crate) fn bbox(node: Node, opt: &Options) -> Option<Rect> {
    match node.tag()? {
        ElementId::Rect => rect_bbox(node, opt),
        ElementId::Circle => circle_bbox(node, opt),
        ElementId::Ellipse => ellipse_bbox(node, opt),
        ElementId::Line => line_bbox(node, opt),
        ElementId::Polyline => points_bbox(node, "Polyline"),
        ElementId::Polygon => points_bbox(node, "Polygon"),
        ElementId::Path => path_bbox(node),
        ElementId::Image => image_bbox(node, opt),
        _ => None,
    }
}

/// Checks that the element is a shape, a path or an image.
pub(crate) fn is_shape(tag: ElementId) -> bool {
    matches!(
        tag,
        ElementId::Rect
            | ElementId::Circle
            | ElementId::Ellipse
            | ElementId::Line
            | ElementId::Polyline
            | ElementId::Polygon
            | ElementId::Path
            | ElementId::Image
    )
}

fn path_bbox(node: Node) -> Option<Rect> {
    let value: &str = node.parse_attribute("d")?;
    PathData::parse(value).bbox()
}

// Rounded corners do not affect the bounding box, so `rx` and `ry` are ignored.
fn rect_bbox(node: Node, opt: &Options) -> Option<Rect> {
    // 'width' and 'height' attributes must be positive and non-zero.
    let width = convert_user_length(node, "width", opt, Length::zero());
    let height = convert_user_length(node, "height", opt, Length::zero());
    if !is_valid_length(width) {
        log::warn!(
            "Rect '{}' has an invalid 'width' value. Skipped.",
            node.element_id()
        );
        return None;
    }
    if !is_valid_length(height) {
        log::warn!(
            "Rect '{}' has an invalid 'height' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    let x = convert_user_length(node, "x", opt, Length::zero());
    let y = convert_user_length(node, "y", opt, Length::zero());

    Some(Rect::from_origin_size((x, y), (width, height)))
}

fn circle_bbox(node: Node, opt: &Options) -> Option<Rect> {
    let cx = convert_user_length(node, "cx", opt, Length::zero());
    let cy = convert_user_length(node, "cy", opt, Length::zero());
    let r = convert_user_length(node, "r", opt, Length::zero());

    if !is_valid_length(r) {
        log::warn!(
            "Circle '{}' has an invalid 'r' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    Some(Rect::new(cx - r, cy - r, cx + r, cy + r))
}

fn ellipse_bbox(node: Node, opt: &Options) -> Option<Rect> {
    let cx = convert_user_length(node, "cx", opt, Length::zero());
    let cy = convert_user_length(node, "cy", opt, Length::zero());
    let (rx, ry) = resolve_rx_ry(node, opt);

    if !is_valid_length(rx) {
        log::warn!(
            "Ellipse '{}' has an invalid 'rx' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    if !is_valid_length(ry) {
        log::warn!(
            "Ellipse '{}' has an invalid 'ry' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    Some(Rect::new(cx - rx, cy - ry, cx + rx, cy + ry))
}

fn resolve_rx_ry(node: Node, opt: &Options) -> (f64, f64) {
    let mut rx_opt: Option<Length> = node.parse_attribute("rx");
    let mut ry_opt: Option<Length> = node.parse_attribute("ry");

    // Remove negative values first.
    if let Some(v) = rx_opt {
        if v.number.is_sign_negative() {
            rx_opt = None;
        }
    }
    if let Some(v) = ry_opt {
        if v.number.is_sign_negative() {
            ry_opt = None;
        }
    }

    // Resolve. `auto` is an invalid length, so it falls back to the other radius.
    match (rx_opt, ry_opt) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => {
            let rx = convert_length(rx, node, "rx", opt);
            (rx, rx)
        }
        (None, Some(ry)) => {
            let ry = convert_length(ry, node, "ry", opt);
            (ry, ry)
        }
        (Some(rx), Some(ry)) => {
            let rx = convert_length(rx, node, "rx", opt);
            let ry = convert_length(ry, node, "ry", opt);
            (rx, ry)
        }
    }
}

fn line_bbox(node: Node, opt: &Options) -> Option<Rect> {
    let x1 = convert_user_length(node, "x1", opt, Length::zero());
    let y1 = convert_user_length(node, "y1", opt, Length::zero());
    let x2 = convert_user_length(node, "x2", opt, Length::zero());
    let y2 = convert_user_length(node, "y2", opt, Length::zero());

    Some(Rect::new(x1, y1, x2, y2).abs())
}

fn points_bbox(node: Node, eid: &str) -> Option<Rect> {
    let points: Vec<(f64, f64)> = match node.parse_attribute("points") {
        Some(v) => v,
        None => {
            log::warn!(
                "{} '{}' has an invalid 'points' value. Skipped.",
                eid,
                node.element_id()
            );
            return None;
        }
    };

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if points.len() < 2 {
        log::warn!(
            "{} '{}' has less than 2 points. Skipped.",
            eid,
            node.element_id()
        );
        return None;
    }

    let (x, y) = points[0];
    let mut rect = Rect::new(x, y, x, y);
    for (x, y) in points.iter().skip(1).copied() {
        rect = rect.union_pt(kurbo::Point::new(x, y));
    }

    Some(rect)
}

fn image_bbox(node: Node, opt: &Options) -> Option<Rect> {
    // Images without a size are sized by their content, which is not loaded.
    let width = convert_user_length(node, "width", opt, Length::zero());
    let height = convert_user_length(node, "height", opt, Length::zero());
    if !is_valid_length(width) || !is_valid_length(height) {
        log::debug!(
            "Image '{}' has no explicit size. Skipped.",
            node.element_id()
        );
        return None;
    }

    let x = convert_user_length(node, "x", opt, Length::zero());
    let y = convert_user_length(node, "y", opt, Length::zero());

    Some(Rect::from_origin_size((x, y), (width, height)))
}

#[inline]
fn is_valid_length(n: f64) -> bool {
    n > 0.0 && n.is_finite()
}

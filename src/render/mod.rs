// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Native measurement of SVG elements.

Elements are measured the way a browser reports client rects of an inline SVG
whose root has no viewport: in the root user space, with the transforms of
all ancestors applied. A transformed box is mapped as a quad and its
axis-aligned hull is taken. Strokes are not included.
*/

use icontree::{AttributeId, Document, ElementId, Node, NodeId};
use kurbo::{Affine, Rect};
use svgtypes::Length;

use crate::crop::describe;
use crate::host::{self, Host, ResolvedStyle};

mod path;
mod shapes;
mod style;
mod units;

pub use path::{PathData, PathSegment};

/// Nested `use` elements deeper than this are ignored.
const USE_RECURSION_LIMIT: u32 = 64;

/// Measurement options.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Default font size for `em` and `ex` units.
    ///
    /// Default: 16
    pub font_size: f64,

    /// Viewport width for percentage units.
    ///
    /// A root `svg` without a `width` is 300px wide in browsers.
    ///
    /// Default: 300
    pub viewport_width: f64,

    /// Viewport height for percentage units.
    ///
    /// Default: 150
    pub viewport_height: f64,

    /// Target DPI for absolute units.
    ///
    /// Default: 96
    pub dpi: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            font_size: 16.0,
            viewport_width: 300.0,
            viewport_height: 150.0,
            dpi: 96.0,
        }
    }
}

/// A [`Host`] that computes geometry and style from the document itself.
#[derive(Clone, Copy, Default, Debug)]
pub struct GeometryHost {
    opt: Options,
}

impl GeometryHost {
    /// Creates a new host.
    pub fn new(opt: Options) -> Self {
        GeometryHost { opt }
    }

    /// Returns the element box in the space established by `ts`.
    fn client_rect(&self, node: Node, ts: Affine, depth: u32) -> Option<Rect> {
        if is_display_none(node) {
            return None;
        }

        let tag = match node.tag() {
            Some(v) => v,
            None => {
                log::debug!("'{}' is not an SVG element. Skipped.", describe(node));
                return None;
            }
        };

        let ts = ts * element_transform(node);

        if shapes::is_shape(tag) {
            return shapes::bbox(node, &self.opt).map(|r| ts.transform_rect_bbox(r));
        }

        match tag {
            ElementId::G | ElementId::A | ElementId::Switch => {
                self.children_rect(node, ts, depth)
            }
            ElementId::Svg => {
                let ts = ts * nested_svg_transform(node, &self.opt);
                self.children_rect(node, ts, depth)
            }
            ElementId::Use => self.use_rect(node, ts, depth),
            ElementId::Text => {
                log::debug!("Text measuring is not supported. '{}' skipped.", describe(node));
                None
            }
            _ => None,
        }
    }

    fn children_rect(&self, node: Node, ts: Affine, depth: u32) -> Option<Rect> {
        node.children()
            .filter(|n| n.is_element())
            .filter_map(|n| self.client_rect(n, ts, depth))
            .reduce(|a, b| a.union(b))
    }

    fn use_rect(&self, node: Node, ts: Affine, depth: u32) -> Option<Rect> {
        if depth >= USE_RECURSION_LIMIT {
            log::warn!("'{}' is nested too deep. Skipped.", describe(node));
            return None;
        }

        let target = match node.href() {
            Some(v) => v,
            None => {
                log::debug!("'{}' references nothing. Skipped.", describe(node));
                return None;
            }
        };

        // A self-recursive `use`.
        if node.ancestors().any(|n| n == target) {
            log::warn!("'{}' references its own ancestor. Skipped.", describe(node));
            return None;
        }

        let x = units::convert_user_length(node, "x", &self.opt, Length::zero());
        let y = units::convert_user_length(node, "y", &self.opt, Length::zero());
        let ts = ts * Affine::translate((x, y));

        if target.has_tag(ElementId::Symbol) {
            if is_display_none(target) {
                return None;
            }

            let ts = ts * symbol_transform(node, target, &self.opt);
            return self.children_rect(target, ts, depth + 1);
        }

        self.client_rect(target, ts, depth + 1)
    }
}

impl Host for GeometryHost {
    fn measure(&self, doc: &Document, id: NodeId) -> Option<host::Rect> {
        let node = doc.get(id);
        if !node.is_element() || !is_rendered(node) {
            return None;
        }

        // The root element defines the space, so its own viewport is not applied.
        if node.parent_element().is_none() {
            return self
                .children_rect(node, Affine::IDENTITY, 0)
                .map(host::Rect::from);
        }

        self.client_rect(node, parent_transform(node, &self.opt), 0)
            .map(host::Rect::from)
    }

    fn resolved_style(&self, doc: &Document, id: NodeId) -> ResolvedStyle {
        style::resolve(doc.get(id), &self.opt)
    }
}

/// Checks that neither the element nor its ancestors prevent rendering.
fn is_rendered(node: Node) -> bool {
    for n in node.ancestors().skip(1).filter(|n| n.is_element()) {
        if let Some(tag) = n.tag() {
            if tag.is_never_rendered() {
                return false;
            }
        } else {
            // Content of foreign elements is not SVG.
            return false;
        }

        if is_display_none(n) {
            return false;
        }
    }

    true
}

#[inline]
fn is_display_none(node: Node) -> bool {
    node.property(AttributeId::Display) == Some("none")
}

/// Returns the transform from the element's parent space into the root user space.
///
/// The root element itself is ignored, since it defines the space.
fn parent_transform(node: Node, opt: &Options) -> Affine {
    let mut ancestors: Vec<_> = node
        .ancestors()
        .skip(1)
        .filter(|n| n.is_element())
        .collect();
    // Drop the root element.
    ancestors.pop();

    let mut ts = Affine::IDENTITY;
    for n in ancestors.iter().rev() {
        ts = ts * element_transform(*n);
        if n.has_tag(ElementId::Svg) {
            ts = ts * nested_svg_transform(*n, opt);
        }
    }

    ts
}

/// Maps nested `svg` content into the parent user space.
fn nested_svg_transform(node: Node, opt: &Options) -> Affine {
    let x = units::convert_user_length(node, "x", opt, Length::zero());
    let y = units::convert_user_length(node, "y", opt, Length::zero());
    let width = units::convert_user_length(node, "width", opt, full_size());
    let height = units::convert_user_length(node, "height", opt, full_size());

    Affine::translate((x, y)) * view_box_transform(node, width, height)
}

/// Maps `symbol` content into the referencing `use` space.
fn symbol_transform(use_node: Node, symbol: Node, opt: &Options) -> Affine {
    let width = units::convert_user_length(use_node, "width", opt, full_size());
    let height = units::convert_user_length(use_node, "height", opt, full_size());

    view_box_transform(symbol, width, height)
}

#[inline]
fn full_size() -> Length {
    Length::new(100.0, svgtypes::LengthUnit::Percent)
}

/// Returns the `transform` attribute as an affine transform.
fn element_transform(node: Node) -> Affine {
    match node.parse_attribute::<svgtypes::Transform>("transform") {
        Some(ts) => Affine::new([ts.a, ts.b, ts.c, ts.d, ts.e, ts.f]),
        None => Affine::IDENTITY,
    }
}

/// Converts `viewBox` and `preserveAspectRatio` into a transform for the provided viewport.
fn view_box_transform(node: Node, width: f64, height: f64) -> Affine {
    let vb = match node.parse_attribute::<svgtypes::ViewBox>("viewBox") {
        Some(vb) if vb.w > 0.0 && vb.h > 0.0 => vb,
        _ => return Affine::IDENTITY,
    };
    let aspect = node
        .parse_attribute::<svgtypes::AspectRatio>("preserveAspectRatio")
        .unwrap_or(svgtypes::AspectRatio {
            defer: false,
            align: svgtypes::Align::XMidYMid,
            slice: false,
        });

    let sx = width / vb.w;
    let sy = height / vb.h;

    let (sx, sy) = if aspect.align == svgtypes::Align::None {
        (sx, sy)
    } else {
        let s = if aspect.slice { sx.max(sy) } else { sx.min(sy) };
        (s, s)
    };

    let x = -vb.x * sx;
    let y = -vb.y * sy;
    let w = width - vb.w * sx;
    let h = height - vb.h * sy;

    let (tx, ty) = aligned_pos(aspect.align, x, y, w, h);
    Affine::new([sx, 0.0, 0.0, sy, tx, ty])
}

/// Returns object aligned position.
fn aligned_pos(align: svgtypes::Align, x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
    use svgtypes::Align;

    match align {
        Align::None => (x, y),
        Align::XMinYMin => (x, y),
        Align::XMidYMin => (x + w / 2.0, y),
        Align::XMaxYMin => (x + w, y),
        Align::XMinYMid => (x, y + h / 2.0),
        Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
        Align::XMaxYMid => (x + w, y + h / 2.0),
        Align::XMinYMax => (x, y + h),
        Align::XMidYMax => (x + w / 2.0, y + h),
        Align::XMaxYMax => (x + w, y + h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(text: &str, id: &str) -> Option<(f64, f64, f64, f64)> {
        let doc = Document::parse_str(text).unwrap();
        let node = doc.element_by_id(id).unwrap();
        GeometryHost::default()
            .measure(&doc, node.id())
            .map(|r| (r.x(), r.y(), r.width(), r.height()))
    }

    fn approx(a: (f64, f64, f64, f64), b: (f64, f64, f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-6
            && (a.1 - b.1).abs() < 1e-6
            && (a.2 - b.2).abs() < 1e-6
            && (a.3 - b.3).abs() < 1e-6
    }

    #[test]
    fn root_viewport_is_ignored() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10' width='100' transform='scale(5)'>\
                <rect id='r' x='1' y='2' width='3' height='4'/>\
            </svg>",
            "r",
        );
        assert_eq!(r, Some((1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn ancestor_transforms() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <g transform='translate(10 20)'><g transform='scale(2)'>\
                    <rect id='r' x='1' y='1' width='2' height='2' transform='translate(1)'/>\
                </g></g>\
            </svg>",
            "r",
        );
        assert_eq!(r, Some((14.0, 22.0, 4.0, 4.0)));
    }

    #[test]
    fn rotation_uses_hull() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <rect id='r' x='-1' y='-1' width='2' height='2' transform='rotate(45)'/>\
            </svg>",
            "r",
        )
        .unwrap();
        let d = 2.0_f64.sqrt();
        assert!(approx(r, (-d, -d, 2.0 * d, 2.0 * d)));
    }

    #[test]
    fn group_is_union() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <g id='g'><rect x='0' y='0' width='2' height='2'/><circle cx='10' cy='10' r='1'/></g>\
            </svg>",
            "g",
        );
        assert_eq!(r, Some((0.0, 0.0, 11.0, 11.0)));
    }

    #[test]
    fn never_rendered() {
        let text = "<svg xmlns='http://www.w3.org/2000/svg'>\
                <defs><rect id='r1' width='2' height='2'/></defs>\
                <clipPath><rect id='r2' width='2' height='2'/></clipPath>\
                <g display='none'><rect id='r3' width='2' height='2'/></g>\
                <rect id='r4' width='2' height='2' style='display:none'/>\
                <text id='t' x='10' y='10'>Text</text>\
            </svg>";

        for id in &["r1", "r2", "r3", "r4", "t"] {
            assert_eq!(measure(text, id), None, "{}", id);
        }
    }

    #[test]
    fn use_element() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>\
                <defs><rect id='r' x='1' y='1' width='2' height='2'/></defs>\
                <use id='u' xlink:href='#r' x='10' transform='scale(2)'/>\
            </svg>",
            "u",
        );
        assert_eq!(r, Some((22.0, 2.0, 4.0, 4.0)));
    }

    #[test]
    fn self_recursive_use() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <g id='g'><use id='u' href='#g'/></g>\
            </svg>",
            "u",
        );
        assert_eq!(r, None);
    }

    #[test]
    fn use_symbol() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <symbol id='s' viewBox='0 0 10 10'><rect width='5' height='5'/></symbol>\
                <use id='u' href='#s' width='20' height='20'/>\
            </svg>",
            "u",
        );
        assert_eq!(r, Some((0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn nested_svg() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <svg x='5' y='5' width='20' height='10' viewBox='0 0 10 10'>\
                    <rect id='r' width='10' height='10'/>\
                </svg>\
            </svg>",
            "r",
        );
        // Scaled by 1 and centered horizontally.
        assert_eq!(r, Some((10.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn foreign_elements() {
        let r = measure(
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:x='http://example.com'>\
                <x:shape id='f' width='10' height='10'/>\
            </svg>",
            "f",
        );
        assert_eq!(r, None);
    }
}

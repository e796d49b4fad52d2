// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use icontree::{AttributeId, Node};
use svgtypes::{Color, Length};

use super::{units, Options};
use crate::host::{Paint, ResolvedStyle};

/// A specified paint.
///
/// `currentColor` is kept as is while inheriting
/// and resolved only on the element that uses it.
#[derive(Clone, PartialEq, Debug)]
enum SpecifiedPaint {
    Paint(Paint),
    CurrentColor,
}

impl SpecifiedPaint {
    fn resolve(self, color: Color) -> Paint {
        match self {
            SpecifiedPaint::Paint(paint) => paint,
            SpecifiedPaint::CurrentColor => Paint::Color(color),
        }
    }
}

/// Resolves computed `fill`, `stroke` and `stroke-width` of an element.
pub(crate) fn resolve(node: Node, opt: &Options) -> ResolvedStyle {
    let nodes: Vec<_> = node.ancestors().filter(|n| n.is_element()).collect();

    let mut color = Color::new_rgb(0, 0, 0);
    let mut fill = SpecifiedPaint::Paint(Paint::Color(color));
    let mut stroke = SpecifiedPaint::Paint(Paint::None);
    let mut stroke_width = 1.0;

    for n in nodes.iter().rev() {
        if let Some(value) = specified(*n, AttributeId::Color) {
            match Color::from_str(value) {
                Ok(c) => color = c,
                Err(_) if value == "currentColor" => {}
                Err(_) => log::warn!("Failed to parse color value: '{}'.", value),
            }
        }

        if let Some(value) = specified(*n, AttributeId::Fill) {
            if let Some(paint) = parse_paint(value) {
                fill = paint;
            }
        }

        if let Some(value) = specified(*n, AttributeId::Stroke) {
            if let Some(paint) = parse_paint(value) {
                stroke = paint;
            }
        }

        if let Some(value) = specified(*n, AttributeId::StrokeWidth) {
            match Length::from_str(value) {
                Ok(length) if !length.number.is_sign_negative() => {
                    stroke_width = units::convert_length(length, *n, "stroke-width", opt);
                }
                _ => log::warn!("Failed to parse stroke-width value: '{}'.", value),
            }
        }
    }

    ResolvedStyle {
        fill: fill.resolve(color),
        stroke: stroke.resolve(color),
        stroke_width,
    }
}

/// Returns a specified property value, unless it should be inherited.
fn specified(node: Node, aid: AttributeId) -> Option<&str> {
    node.property(aid).filter(|v| *v != "inherit")
}

fn parse_paint(value: &str) -> Option<SpecifiedPaint> {
    let paint = match svgtypes::Paint::from_str(value) {
        Ok(v) => v,
        Err(_) => {
            log::warn!("Failed to parse paint value: '{}'.", value);
            return None;
        }
    };

    let paint = match paint {
        svgtypes::Paint::None => SpecifiedPaint::Paint(Paint::None),
        svgtypes::Paint::Inherit => return None,
        svgtypes::Paint::CurrentColor => SpecifiedPaint::CurrentColor,
        svgtypes::Paint::Color(color) => SpecifiedPaint::Paint(Paint::Color(color)),
        svgtypes::Paint::FuncIRI(link, _) => SpecifiedPaint::Paint(Paint::Url(link.to_string())),
        // `context-fill` and `context-stroke` are meaningful only inside markers.
        _ => SpecifiedPaint::Paint(Paint::None),
    };

    Some(paint)
}

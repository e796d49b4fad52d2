// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use icontree::{AttributeId, Node};
use svgtypes::{Length, LengthUnit as Unit};

use super::Options;

/// Converts a length into user units.
#[inline(never)]
pub(crate) fn convert_length(length: Length, node: Node, name: &str, opt: &Options) -> f64 {
    let dpi = opt.dpi;
    let n = length.number;
    match length.unit {
        Unit::None | Unit::Px => n,
        Unit::Em => n * resolve_font_size(node, opt),
        Unit::Ex => n * resolve_font_size(node, opt) / 2.0,
        Unit::In => n * dpi,
        Unit::Cm => n * dpi / 2.54,
        Unit::Mm => n * dpi / 25.4,
        Unit::Pt => n * dpi / 72.0,
        Unit::Pc => n * dpi / 6.0,
        Unit::Percent => match name {
            "x" | "cx" | "x1" | "x2" | "rx" | "width" => {
                convert_percent(length, opt.viewport_width)
            }
            "y" | "cy" | "y1" | "y2" | "ry" | "height" => {
                convert_percent(length, opt.viewport_height)
            }
            _ => {
                let vb_len = (opt.viewport_width * opt.viewport_width
                    + opt.viewport_height * opt.viewport_height)
                    .sqrt()
                    / 2.0_f64.sqrt();

                convert_percent(length, vb_len)
            }
        },
    }
}

/// Converts an attribute into user units.
///
/// Missing or invalid attributes are resolved to `def`.
#[inline]
pub(crate) fn convert_user_length(node: Node, name: &str, opt: &Options, def: Length) -> f64 {
    let length = node.parse_attribute(name).unwrap_or(def);
    convert_length(length, node, name, opt)
}

fn convert_percent(length: Length, base: f64) -> f64 {
    base * length.number / 100.0
}

/// Resolves the computed `font-size` of an element.
#[inline(never)]
pub(crate) fn resolve_font_size(node: Node, opt: &Options) -> f64 {
    let nodes: Vec<_> = node.ancestors().filter(|n| n.is_element()).collect();
    let mut font_size = opt.font_size;
    for n in nodes.iter().rev() {
        let value = match n.property(AttributeId::FontSize) {
            Some(v) => v,
            None => continue,
        };

        if value == "inherit" {
            continue;
        }

        if let Ok(length) = Length::from_str(value) {
            let dpi = opt.dpi;
            let n = length.number;
            font_size = match length.unit {
                Unit::None | Unit::Px => n,
                Unit::Em => n * font_size,
                Unit::Ex => n * font_size / 2.0,
                Unit::In => n * dpi,
                Unit::Cm => n * dpi / 2.54,
                Unit::Mm => n * dpi / 25.4,
                Unit::Pt => n * dpi / 72.0,
                Unit::Pc => n * dpi / 6.0,
                Unit::Percent => {
                    // If `font-size` has percent units that it's value
                    // is relative to the parent node `font-size`.
                    length.number * font_size * 0.01
                }
            }
        } else {
            font_size = convert_named_font_size(value, font_size);
        }
    }

    font_size
}

fn convert_named_font_size(name: &str, parent_font_size: f64) -> f64 {
    let factor = match name {
        "xx-small" => -3,
        "x-small" => -2,
        "small" => -1,
        "medium" => 0,
        "large" => 1,
        "x-large" => 2,
        "xx-large" => 3,
        "smaller" => -1,
        "larger" => 1,
        _ => {
            log::warn!("Invalid 'font-size' value: '{}'.", name);
            0
        }
    };

    // 'On a computer screen a scaling factor of 1.2 is suggested between adjacent indexes.'
    parent_font_size * 1.2f64.powi(factor)
}

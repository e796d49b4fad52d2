// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::ParamCurveExtrema;

/// A path's absolute segment.
///
/// Can contain only `M`, `L`, `C` and `Z` segments.
/// All other segments will be converted into this one.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
}

/// An SVG path data container.
///
/// All segments are in absolute coordinates.
#[derive(Clone, Default, Debug)]
pub struct PathData(pub Vec<PathSegment>);

impl PathData {
    /// Creates a new path.
    #[inline]
    pub fn new() -> Self {
        PathData(Vec::new())
    }

    /// Parses the `d` attribute value.
    ///
    /// Like browsers, everything up to the first error is kept.
    pub fn parse(text: &str) -> Self {
        let mut path = PathData::new();
        for segment in svgtypes::SimplifyingPathParser::from(text) {
            let segment = match segment {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Path data parsing failed cause {}.", e);
                    break;
                }
            };

            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => {
                    path.push_move_to(x, y);
                }
                svgtypes::SimplePathSegment::LineTo { x, y } => {
                    path.push_line_to(x, y);
                }
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    path.push_quad_to(x1, y1, x, y);
                }
                svgtypes::SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    path.push_curve_to(x1, y1, x2, y2, x, y);
                }
                svgtypes::SimplePathSegment::ClosePath => {
                    path.push_close_path();
                }
            }
        }

        path
    }

    /// Pushes a MoveTo segment to the path.
    #[inline]
    pub fn push_move_to(&mut self, x: f64, y: f64) {
        self.0.push(PathSegment::MoveTo { x, y });
    }

    /// Pushes a LineTo segment to the path.
    #[inline]
    pub fn push_line_to(&mut self, x: f64, y: f64) {
        self.0.push(PathSegment::LineTo { x, y });
    }

    /// Pushes a CurveTo segment to the path.
    #[inline]
    pub fn push_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.0.push(PathSegment::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    /// Pushes a QuadTo segment to the path.
    ///
    /// Will be converted into cubic curve.
    #[inline]
    pub fn push_quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        let (prev_x, prev_y) = self.last_pos();
        self.0.push(quad_to_curve(prev_x, prev_y, x1, y1, x, y));
    }

    /// Pushes a ClosePath segment to the path.
    #[inline]
    pub fn push_close_path(&mut self) {
        self.0.push(PathSegment::ClosePath);
    }

    /// Returns the current point.
    ///
    /// `ClosePath` moves it back to the start of the subpath.
    fn last_pos(&self) -> (f64, f64) {
        let mut start = (0.0, 0.0);
        let mut pos = (0.0, 0.0);
        for seg in &self.0 {
            match *seg {
                PathSegment::MoveTo { x, y } => {
                    start = (x, y);
                    pos = (x, y);
                }
                PathSegment::LineTo { x, y } | PathSegment::CurveTo { x, y, .. } => {
                    pos = (x, y);
                }
                PathSegment::ClosePath => {
                    pos = start;
                }
            }
        }

        pos
    }

    /// Calculates path's tight bounding box.
    ///
    /// Curves are bounded by their extrema, not by their control points.
    /// Returns `None` for an empty path.
    pub fn bbox(&self) -> Option<kurbo::Rect> {
        calc_bbox(&self.0)
    }
}

fn calc_bbox(segments: &[PathSegment]) -> Option<kurbo::Rect> {
    let (mut minx, mut miny) = match segments.first() {
        Some(PathSegment::MoveTo { x, y }) => (*x, *y),
        _ => return None,
    };
    let (mut maxx, mut maxy) = (minx, miny);

    let mut start_x = minx;
    let mut start_y = miny;
    let mut prev_x = minx;
    let mut prev_y = miny;

    for seg in segments.iter().cloned() {
        match seg {
            PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => {
                if let PathSegment::MoveTo { .. } = seg {
                    start_x = x;
                    start_y = y;
                }

                prev_x = x;
                prev_y = y;

                minx = minx.min(x);
                maxx = maxx.max(x);
                miny = miny.min(y);
                maxy = maxy.max(y);
            }
            PathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let curve = kurbo::CubicBez::from_points(prev_x, prev_y, x1, y1, x2, y2, x, y);
                let r = curve.bounding_box();

                prev_x = x;
                prev_y = y;

                minx = minx.min(r.x0);
                maxx = maxx.max(r.x1);
                miny = miny.min(r.y0);
                maxy = maxy.max(r.y1);
            }
            PathSegment::ClosePath => {
                prev_x = start_x;
                prev_y = start_y;
            }
        }
    }

    Some(kurbo::Rect::new(minx, miny, maxx, maxy))
}

#[inline]
fn quad_to_curve(px: f64, py: f64, x1: f64, y1: f64, x: f64, y: f64) -> PathSegment {
    #[inline]
    fn calc(n1: f64, n2: f64) -> f64 {
        (n1 + n2 * 2.0) / 3.0
    }

    PathSegment::CurveTo {
        x1: calc(px, x1),
        y1: calc(py, y1),
        x2: calc(x, x1),
        y2: calc(y, y1),
        x,
        y,
    }
}

pub(crate) trait CubicBezExt {
    #[allow(clippy::too_many_arguments)]
    fn from_points(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64)
        -> Self;
}

impl CubicBezExt for kurbo::CubicBez {
    fn from_points(
        px: f64,
        py: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    ) -> Self {
        kurbo::CubicBez {
            p0: kurbo::Point::new(px, py),
            p1: kurbo::Point::new(x1, y1),
            p2: kurbo::Point::new(x2, y2),
            p3: kurbo::Point::new(x, y),
        }
    }
}

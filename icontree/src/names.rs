// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

macro_rules! names {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $text:expr,)+ }) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Parses a name. Case-sensitive, as in SVG.
            pub fn from_str(text: &str) -> Option<Self> {
                match text {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Returns the name as it appears in markup.
            pub fn to_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_str())
            }
        }
    };
}

names!(
    /// An SVG element known to the measuring code.
    ElementId {
        A = "a",
        Circle = "circle",
        ClipPath = "clipPath",
        Defs = "defs",
        Desc = "desc",
        Ellipse = "ellipse",
        Filter = "filter",
        ForeignObject = "foreignObject",
        G = "g",
        Image = "image",
        Line = "line",
        LinearGradient = "linearGradient",
        Marker = "marker",
        Mask = "mask",
        Metadata = "metadata",
        Path = "path",
        Pattern = "pattern",
        Polygon = "polygon",
        Polyline = "polyline",
        RadialGradient = "radialGradient",
        Rect = "rect",
        Style = "style",
        Svg = "svg",
        Switch = "switch",
        Symbol = "symbol",
        Text = "text",
        Title = "title",
        Use = "use",
    }
);

names!(
    /// A presentation attribute that takes part in the style cascade.
    AttributeId {
        Color = "color",
        Display = "display",
        Fill = "fill",
        FontSize = "font-size",
        Stroke = "stroke",
        StrokeWidth = "stroke-width",
    }
);

impl ElementId {
    /// Checks if this element is never rendered directly,
    /// only referenced from elsewhere.
    pub fn is_never_rendered(&self) -> bool {
        matches!(
            self,
            ElementId::ClipPath
                | ElementId::Defs
                | ElementId::Filter
                | ElementId::LinearGradient
                | ElementId::Marker
                | ElementId::Mask
                | ElementId::Metadata
                | ElementId::Pattern
                | ElementId::RadialGradient
                | ElementId::Symbol
        )
    }
}

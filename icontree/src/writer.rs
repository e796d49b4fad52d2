// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Cow;

use xmlwriter::{Indent, XmlWriter};

use crate::{Document, Node, NodeKind};

/// XML writing options.
#[derive(Clone, Copy, Debug)]
pub struct WriteOptions {
    /// Use single quote marks instead of double quote.
    ///
    /// Default: disabled
    pub use_single_quote: bool,

    /// Set XML nodes indention.
    ///
    /// With `Indent::None` the original whitespace between elements is kept as is.
    /// Any other value drops whitespace-only text and reformats the markup.
    ///
    /// Default: `None`
    pub indent: Indent,

    /// Set XML attributes indention.
    ///
    /// Default: `None`
    pub attributes_indent: Indent,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            use_single_quote: false,
            indent: Indent::None,
            attributes_indent: Indent::None,
        }
    }
}

impl Document {
    /// Writes the document back to SVG.
    pub fn to_string(&self, opt: &WriteOptions) -> String {
        let mut xml = XmlWriter::new(xmlwriter::Options {
            use_single_quote: opt.use_single_quote,
            indent: opt.indent,
            attributes_indent: opt.attributes_indent,
        });

        let keep_whitespaces = matches!(opt.indent, Indent::None);
        xml.set_preserve_whitespaces(keep_whitespaces);

        let quote = if opt.use_single_quote { '\'' } else { '"' };
        write_element(self.root_element(), keep_whitespaces, quote, &mut xml);
        xml.end_document()
    }
}

// `xmlwriter` escapes only quotes in attributes and `<` in text,
// while parsed values have all entities and CDATA already decoded.
fn write_element(node: Node, keep_whitespaces: bool, quote: char, xml: &mut XmlWriter) {
    let e = match node.d.kind {
        NodeKind::Element(ref e) => e,
        _ => return,
    };

    match e.prefix {
        Some(ref prefix) => xml.start_element(&format!("{}:{}", prefix, e.name)),
        None => xml.start_element(&e.name),
    }

    for (prefix, uri) in &e.namespaces {
        match prefix {
            Some(prefix) => {
                xml.write_attribute(&format!("xmlns:{}", prefix), &escape_attribute(uri, quote))
            }
            None => xml.write_attribute("xmlns", &escape_attribute(uri, quote)),
        }
    }

    for attr in &e.attributes {
        xml.write_attribute(&attr.qualified_name(), &escape_attribute(&attr.value, quote));
    }

    for child in node.children() {
        match child.d.kind {
            NodeKind::Element(_) => write_element(child, keep_whitespaces, quote, xml),
            NodeKind::Text(ref text) => {
                if keep_whitespaces || !text.trim().is_empty() {
                    xml.write_text(&escape_text(text));
                }
            }
            NodeKind::Root => {}
        }
    }

    xml.end_element();
}

fn escape_text(text: &str) -> Cow<str> {
    if !text.contains(&['&', '<', '>'][..]) {
        return Cow::Borrowed(text);
    }

    let mut s = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            _ => s.push(c),
        }
    }

    Cow::Owned(s)
}

fn escape_attribute(value: &str, quote: char) -> Cow<str> {
    if !value.contains(&['&', '<', quote][..]) {
        return Cow::Borrowed(value);
    }

    let mut s = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '"' if quote == '"' => s.push_str("&quot;"),
            '\'' if quote == '\'' => s.push_str("&apos;"),
            _ => s.push(c),
        }
    }

    Cow::Owned(s)
}

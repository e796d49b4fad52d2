// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Represents an SVG icon as an editable tree.

`icontree` uses [`roxmltree`] for parsing, but unlike a plain XML tree it keeps
the cascaded presentation properties of every element next to its raw
attributes. Raw attributes are written back untouched, so a document can be
parsed, edited and serialized without losing markup it doesn't understand.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::str::FromStr;

mod error;
mod names;
mod parse;
mod writer;

pub use error::Error;
pub use names::{AttributeId, ElementId};
pub use writer::WriteOptions;

pub use roxmltree;
pub use svgtypes;

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub(crate) const XML_NAMESPACE_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// An SVG document.
///
/// Contains element and text nodes. Comments and processing instructions are dropped.
pub struct Document {
    nodes: Vec<NodeData>,
    links: HashMap<String, NodeId>,
}

impl Document {
    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> Node {
        self.get(NodeId::new(0))
    }

    /// Returns the root `svg` element.
    #[inline]
    pub fn root_element(&self) -> Node {
        // `unwrap` is safe, because a parsed `Document` always has an `svg` root element.
        self.root().first_element_child().unwrap()
    }

    /// Returns an iterator over document's descendant nodes.
    ///
    /// Shorthand for `doc.root().descendants()`.
    #[inline]
    pub fn descendants(&self) -> Descendants {
        self.root().descendants()
    }

    /// Returns a node by its ID.
    ///
    /// # Panics
    ///
    /// When `id` belongs to another document.
    #[inline]
    pub fn get(&self, id: NodeId) -> Node {
        Node {
            id,
            d: &self.nodes[id.get_usize()],
            doc: self,
        }
    }

    /// Returns an element by the value of its `id` attribute.
    #[inline]
    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        let node_id = self.links.get(id)?;
        Some(self.get(*node_id))
    }

    /// Returns the number of nodes, including the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks that the document has no nodes except the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Sets an attribute without a namespace, replacing an existing one.
    ///
    /// Does nothing for non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element(ref mut e) = self.nodes[id.get_usize()].kind {
            match e.attributes.iter_mut().find(|a| a.is_plain(name)) {
                Some(attr) => attr.value = value.to_string(),
                None => e.attributes.push(Attribute::new(name, value)),
            }
        }
    }

    /// Removes an attribute without a namespace and returns it.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<Attribute> {
        match self.nodes[id.get_usize()].kind {
            NodeKind::Element(ref mut e) => {
                let idx = e.attributes.iter().position(|a| a.is_plain(name))?;
                Some(e.attributes.remove(idx))
            }
            _ => None,
        }
    }

    /// Replaces all element's attributes and returns the previous ones.
    ///
    /// Cascaded properties are not recalculated.
    pub fn replace_attributes(&mut self, id: NodeId, attributes: Vec<Attribute>) -> Vec<Attribute> {
        match self.nodes[id.get_usize()].kind {
            NodeKind::Element(ref mut e) => std::mem::replace(&mut e.attributes, attributes),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        if !self.root().has_children() {
            return write!(f, "Document []");
        }

        macro_rules! writeln_indented {
            ($depth:expr, $f:expr, $fmt:expr) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt)?;
            };
            ($depth:expr, $f:expr, $fmt:expr, $($arg:tt)*) => {
                for _ in 0..$depth { write!($f, "    ")?; }
                writeln!($f, $fmt, $($arg)*)?;
            };
        }

        fn print_children(
            parent: Node,
            depth: usize,
            f: &mut std::fmt::Formatter,
        ) -> Result<(), std::fmt::Error> {
            for child in parent.children() {
                if child.is_element() {
                    writeln_indented!(depth, f, "Element {{");
                    writeln_indented!(depth, f, "    tag_name: {:?}", child.tag_name());

                    if !child.attributes().is_empty() {
                        writeln_indented!(depth + 1, f, "attributes: [");
                        for attr in child.attributes() {
                            writeln_indented!(depth + 2, f, "{:?}", attr);
                        }
                        writeln_indented!(depth + 1, f, "]");
                    }

                    if child.has_children() {
                        writeln_indented!(depth, f, "    children: [");
                        print_children(child, depth + 2, f)?;
                        writeln_indented!(depth, f, "    ]");
                    }

                    writeln_indented!(depth, f, "}}");
                } else {
                    writeln_indented!(depth, f, "{:?}", child);
                }
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(self.root(), 1, f)?;
        writeln!(f, "]")?;

        Ok(())
    }
}

/// A node handle.
///
/// Stays valid for the lifetime of the document it came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    #[inline]
    fn new(id: u32) -> Self {
        debug_assert!(id < core::u32::MAX);

        // We are using `NonZeroU32` to reduce overhead of `Option<NodeId>`.
        NodeId(NonZeroU32::new(id + 1).unwrap())
    }

    #[inline]
    fn get(self) -> u32 {
        self.0.get() - 1
    }

    #[inline]
    fn get_usize(self) -> usize {
        self.get() as usize
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(id: usize) -> Self {
        // We already checked that `id` is limited by u32::MAX.
        debug_assert!(id <= core::u32::MAX as usize);
        NodeId::new(id as u32)
    }
}

pub(crate) enum NodeKind {
    Root,
    Element(ElementData),
    Text(String),
}

pub(crate) struct ElementData {
    /// The name as reported by the DOM `tagName`.
    tag_name: String,
    tag: Option<ElementId>,
    /// Local name and namespace prefix, as written in the markup.
    name: String,
    prefix: Option<String>,
    /// Namespaces declared on this very element.
    namespaces: Vec<(Option<String>, String)>,
    attributes: Vec<Attribute>,
    properties: Vec<(AttributeId, String)>,
}

pub(crate) struct NodeData {
    parent: Option<NodeId>,
    next_sibling: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,
    kind: NodeKind,
}

/// An element attribute, as written in the markup.
#[derive(Clone, PartialEq)]
pub struct Attribute {
    /// Namespace prefix.
    pub prefix: Option<String>,
    /// Namespace URI.
    pub namespace: Option<String>,
    /// Local name.
    pub name: String,
    /// Raw value.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute without a namespace.
    pub fn new(name: &str, value: &str) -> Self {
        Attribute {
            prefix: None,
            namespace: None,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Returns `prefix:name` or just `name`.
    pub fn qualified_name(&self) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    #[inline]
    fn is_plain(&self, name: &str) -> bool {
        self.namespace.is_none() && self.name == name
    }

    /// Checks that the attribute belongs to SVG itself, not to an editor namespace.
    #[inline]
    fn is_svg(&self) -> bool {
        match self.namespace.as_deref() {
            None | Some(SVG_NS) | Some(XLINK_NS) | Some(XML_NAMESPACE_NS) => true,
            _ => false,
        }
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "Attribute {{ name: {}, value: {} }}",
            self.qualified_name(),
            self.value
        )
    }
}

/// An SVG node.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    id: NodeId,
    doc: &'a Document,
    d: &'a NodeData,
}

impl Eq for Node<'_> {}

impl PartialEq for Node<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.doc, other.doc)
    }
}

impl<'a> Node<'a> {
    /// Returns node's ID.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Checks if the current node is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.d.kind, NodeKind::Element(_))
    }

    /// Checks if the current node is a text.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.d.kind, NodeKind::Text(_))
    }

    #[inline]
    fn element(&self) -> Option<&'a ElementData> {
        match self.d.kind {
            NodeKind::Element(ref e) => Some(e),
            _ => None,
        }
    }

    /// Returns element's tag name, unless the current node is not an element.
    ///
    /// SVG elements are reported by their local name, like `rect` or `foreignObject`.
    /// Foreign elements keep their prefix, like `sodipodi:namedview`.
    #[inline]
    pub fn tag_name(&self) -> Option<&'a str> {
        self.element().map(|e| e.tag_name.as_str())
    }

    /// Returns element's tag as a known SVG element.
    #[inline]
    pub fn tag(&self) -> Option<ElementId> {
        self.element().and_then(|e| e.tag)
    }

    /// Checks that the current node is a specified SVG element.
    #[inline]
    pub fn has_tag(&self, tag: ElementId) -> bool {
        self.tag() == Some(tag)
    }

    /// Returns element's `id` attribute value.
    ///
    /// Returns an empty string otherwise.
    #[inline]
    pub fn element_id(&self) -> &'a str {
        self.attribute("id").unwrap_or("")
    }

    /// Returns a list of all element's attributes.
    #[inline]
    pub fn attributes(&self) -> &'a [Attribute] {
        match self.element() {
            Some(e) => &e.attributes,
            None => &[],
        }
    }

    /// Returns an SVG attribute value by its local name.
    ///
    /// Attributes from editor namespaces are ignored.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name == name && a.is_svg())
            .map(|a| a.value.as_str())
    }

    /// Checks if an SVG attribute is present.
    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Parses an attribute value.
    ///
    /// Logs a warning when the value is present but invalid.
    pub fn parse_attribute<T: FromValue<'a>>(&self, name: &str) -> Option<T> {
        let value = self.attribute(name)?;
        match T::parse(*self, name, value) {
            Some(v) => Some(v),
            None => {
                log::warn!("Failed to parse {} value: '{}'.", name, value);
                None
            }
        }
    }

    /// Returns a specified value of a presentation property after the CSS cascade.
    ///
    /// Only this element is checked, without inheritance.
    #[inline]
    pub fn property(&self, aid: AttributeId) -> Option<&'a str> {
        self.element()?
            .properties
            .iter()
            .find(|(id, _)| *id == aid)
            .map(|(_, v)| v.as_str())
    }

    /// Returns an element referenced via `href` or `xlink:href`.
    pub fn href(&self) -> Option<Node<'a>> {
        let value = self.attribute("href")?;
        let link = svgtypes::IRI::from_str(value).ok()?.0;
        self.doc.element_by_id(link)
    }

    /// Returns node's text data.
    ///
    /// For text nodes returns its content. For elements returns the first child node text.
    #[inline]
    pub fn text(&self) -> &'a str {
        match self.d.kind {
            NodeKind::Element(_) => match self.first_child() {
                Some(child) => match child.d.kind {
                    NodeKind::Text(ref text) => text,
                    _ => "",
                },
                None => "",
            },
            NodeKind::Text(ref text) => text,
            NodeKind::Root => "",
        }
    }

    /// Returns a parent node.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.d.parent.map(|id| self.doc.get(id))
    }

    /// Returns the parent element.
    #[inline]
    pub fn parent_element(&self) -> Option<Self> {
        self.ancestors().skip(1).find(|n| n.is_element())
    }

    /// Returns the next sibling.
    #[inline]
    pub fn next_sibling(&self) -> Option<Self> {
        self.d.next_sibling.map(|id| self.doc.get(id))
    }

    /// Returns the first child.
    #[inline]
    pub fn first_child(&self) -> Option<Self> {
        self.d.children.map(|(id, _)| self.doc.get(id))
    }

    /// Returns the first child element.
    #[inline]
    pub fn first_element_child(&self) -> Option<Self> {
        self.children().find(|n| n.is_element())
    }

    /// Returns the last child.
    #[inline]
    pub fn last_child(&self) -> Option<Self> {
        self.d.children.map(|(_, id)| self.doc.get(id))
    }

    /// Checks if the node has child nodes, text included.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.d.children.is_some()
    }

    /// Returns an iterator over ancestor nodes starting at this node.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors(Some(*self))
    }

    /// Returns an iterator over children nodes.
    #[inline]
    pub fn children(&self) -> Children<'a> {
        Children {
            front: self.first_child(),
            back: self.last_child(),
        }
    }

    /// Returns an iterator which traverses the subtree starting at this node.
    #[inline]
    fn traverse(&self) -> Traverse<'a> {
        Traverse {
            root: *self,
            edge: None,
        }
    }

    /// Returns an iterator over this node and its descendants, in document order.
    #[inline]
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants(self.traverse())
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.d.kind {
            NodeKind::Root => write!(f, "Root"),
            NodeKind::Element(ref e) => {
                write!(
                    f,
                    "Element {{ tag_name: {:?}, attributes: {:?} }}",
                    e.tag_name, e.attributes
                )
            }
            NodeKind::Text(ref text) => write!(f, "Text({:?})", text),
        }
    }
}

/// An iterator over ancestor nodes.
#[derive(Clone, Debug)]
pub struct Ancestors<'a>(Option<Node<'a>>);

impl<'a> Iterator for Ancestors<'a> {
    type Item = Node<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.take();
        self.0 = node.as_ref().and_then(Node::parent);
        node
    }
}

/// An iterator over children nodes.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    front: Option<Node<'a>>,
    back: Option<Node<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.front.take();
        if self.front == self.back {
            self.back = None;
        } else {
            self.front = node.as_ref().and_then(Node::next_sibling);
        }
        node
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Edge<'a> {
    Open(Node<'a>),
    Close(Node<'a>),
}

#[derive(Clone, Debug)]
struct Traverse<'a> {
    root: Node<'a>,
    edge: Option<Edge<'a>>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Edge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.edge {
            Some(Edge::Open(node)) => {
                self.edge = Some(match node.first_child() {
                    Some(first_child) => Edge::Open(first_child),
                    None => Edge::Close(node),
                });
            }
            Some(Edge::Close(node)) => {
                if node == self.root {
                    self.edge = None;
                } else if let Some(next_sibling) = node.next_sibling() {
                    self.edge = Some(Edge::Open(next_sibling));
                } else {
                    self.edge = node.parent().map(Edge::Close);
                }
            }
            None => {
                self.edge = Some(Edge::Open(self.root));
            }
        }

        self.edge
    }
}

/// A descendants iterator.
#[derive(Clone, Debug)]
pub struct Descendants<'a>(Traverse<'a>);

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for edge in &mut self.0 {
            if let Edge::Open(node) = edge {
                return Some(node);
            }
        }

        None
    }
}

/// A trait for parsing attribute values.
pub trait FromValue<'a>: Sized {
    /// Parses an attribute value.
    ///
    /// When `None` is returned, the attribute value will be logged as a parsing failure.
    fn parse(node: Node<'a>, name: &str, value: &'a str) -> Option<Self>;
}

impl<'a> FromValue<'a> for &'a str {
    #[inline]
    fn parse(_: Node, _: &str, value: &'a str) -> Option<Self> {
        Some(value)
    }
}

impl<'a> FromValue<'a> for f64 {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        svgtypes::Number::from_str(value).ok().map(|v| v.0)
    }
}

impl<'a> FromValue<'a> for svgtypes::Length {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        svgtypes::Length::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::AspectRatio {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        Self::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::ViewBox {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        Self::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for svgtypes::Transform {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        Self::from_str(value).ok()
    }
}

impl<'a> FromValue<'a> for Vec<(f64, f64)> {
    fn parse(_: Node, _: &str, value: &str) -> Option<Self> {
        Some(svgtypes::PointsParser::from(value).collect())
    }
}

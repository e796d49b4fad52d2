// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::{
    Attribute, AttributeId, Document, ElementData, ElementId, Error, NodeData, NodeId, NodeKind,
    SVG_NS, XML_NAMESPACE_NS,
};

impl Document {
    /// Parses a [`Document`] from a string.
    ///
    /// DTDs are allowed, since editors like to emit them.
    pub fn parse_str(text: &str) -> Result<Document, Error> {
        let opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, opt)?;
        parse(&xml)
    }

    pub(crate) fn append(&mut self, parent_id: NodeId, kind: NodeKind) -> NodeId {
        let new_child_id = NodeId::from(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent_id),
            next_sibling: None,
            children: None,
            kind,
        });

        let last_child_id = self.nodes[parent_id.get_usize()].children.map(|(_, id)| id);

        if let Some(id) = last_child_id {
            self.nodes[id.get_usize()].next_sibling = Some(new_child_id);
        }

        self.nodes[parent_id.get_usize()].children = Some(
            if let Some((first_child_id, _)) = self.nodes[parent_id.get_usize()].children {
                (first_child_id, new_child_id)
            } else {
                (new_child_id, new_child_id)
            },
        );

        new_child_id
    }
}

fn parse(xml: &roxmltree::Document) -> Result<Document, Error> {
    let mut doc = Document {
        nodes: Vec::new(),
        links: HashMap::new(),
    };

    // Add a root node.
    doc.nodes.push(NodeData {
        parent: None,
        next_sibling: None,
        children: None,
        kind: NodeKind::Root,
    });

    let root_element = xml.root_element();
    if parse_tag(root_element) != Some(ElementId::Svg) {
        return Err(Error::NoRootElement);
    }

    let style_sheet = resolve_css(xml);
    parse_xml_node(root_element, NodeId::new(0), &style_sheet, 0, &mut doc)?;

    // Collect all elements with `id` attribute.
    let mut links = HashMap::new();
    for node in doc.descendants() {
        let id = node.element_id();
        if !id.is_empty() {
            // The first element wins, like in `getElementById`.
            links.entry(id.to_string()).or_insert(node.id());
        }
    }
    doc.links = links;

    Ok(doc)
}

/// Checks that an element belongs to SVG.
///
/// Elements without a namespace are treated as SVG as well,
/// because icons embedded into HTML often lack `xmlns`.
fn is_svg_element(node: roxmltree::Node) -> bool {
    matches!(node.tag_name().namespace(), None | Some(SVG_NS))
}

fn parse_tag(node: roxmltree::Node) -> Option<ElementId> {
    if !node.is_element() || !is_svg_element(node) {
        return None;
    }

    ElementId::from_str(node.tag_name().name())
}

fn parse_xml_node(
    node: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    depth: u32,
    doc: &mut Document,
) -> Result<(), Error> {
    if depth > 1024 || doc.nodes.len() > 1_000_000 {
        return Err(Error::ElementsLimitReached);
    }

    match node.node_type() {
        roxmltree::NodeType::Element => {
            let node_id = parse_svg_element(node, parent_id, style_sheet, doc);
            for child in node.children() {
                parse_xml_node(child, node_id, style_sheet, depth + 1, doc)?;
            }
        }
        roxmltree::NodeType::Text => {
            if let Some(text) = node.text() {
                doc.append(parent_id, NodeKind::Text(text.to_string()));
            }
        }
        _ => {}
    }

    Ok(())
}

fn parse_svg_element(
    xml_node: roxmltree::Node,
    parent_id: NodeId,
    style_sheet: &simplecss::StyleSheet,
    doc: &mut Document,
) -> NodeId {
    let name = xml_node.tag_name();
    let prefix = name.namespace().and_then(|uri| lookup_prefix(xml_node, uri));

    let tag_name = if is_svg_element(xml_node) {
        name.name().to_string()
    } else {
        match prefix {
            Some(ref prefix) => format!("{}:{}", prefix, name.name()),
            None => name.name().to_string(),
        }
    };

    // roxmltree reports all namespaces in scope, so keep only the new ones.
    let mut namespaces = Vec::new();
    let parent_namespaces: Vec<_> = xml_node
        .parent_element()
        .map(|p| p.namespaces().collect())
        .unwrap_or_default();
    for ns in xml_node.namespaces() {
        if ns.name() == Some("xml") {
            continue;
        }

        let inherited = parent_namespaces
            .iter()
            .any(|p| p.name() == ns.name() && p.uri() == ns.uri());
        if !inherited {
            namespaces.push((ns.name().map(str::to_string), ns.uri().to_string()));
        }
    }

    let mut attributes = Vec::new();
    for attr in xml_node.attributes() {
        attributes.push(Attribute {
            prefix: attr.namespace().and_then(|uri| lookup_prefix(xml_node, uri)),
            namespace: attr.namespace().map(str::to_string),
            name: attr.name().to_string(),
            value: attr.value().to_string(),
        });
    }

    let properties = if is_svg_element(xml_node) {
        cascade(xml_node, &attributes, style_sheet)
    } else {
        Vec::new()
    };

    doc.append(
        parent_id,
        NodeKind::Element(ElementData {
            tag: parse_tag(xml_node),
            tag_name,
            name: name.name().to_string(),
            prefix,
            namespaces,
            attributes,
            properties,
        }),
    )
}

fn lookup_prefix(node: roxmltree::Node, uri: &str) -> Option<String> {
    if uri == XML_NAMESPACE_NS {
        return Some("xml".to_string());
    }

    node.lookup_prefix(uri)
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
}

/// Resolves specified values of presentation properties.
///
/// Presentation attributes go first, then style sheets, then the `style` attribute.
fn cascade(
    xml_node: roxmltree::Node,
    attributes: &[Attribute],
    style_sheet: &simplecss::StyleSheet,
) -> Vec<(AttributeId, String)> {
    let mut properties: Vec<(AttributeId, String)> = Vec::new();

    let mut insert_property = |aid, value: &str| {
        let value = value.trim().to_string();
        match properties.iter_mut().find(|(id, _)| *id == aid) {
            Some(prop) => prop.1 = value,
            None => properties.push((aid, value)),
        }
    };

    for attr in attributes.iter().filter(|a| a.is_svg()) {
        if let Some(aid) = AttributeId::from_str(&attr.name) {
            insert_property(aid, &attr.value);
        }
    }

    // Apply CSS.
    for rule in &style_sheet.rules {
        if rule.selector.matches(&XmlNode(xml_node)) {
            for declaration in &rule.declarations {
                if let Some(aid) = AttributeId::from_str(declaration.name) {
                    insert_property(aid, declaration.value);
                }
            }
        }
    }

    // Split a `style` attribute.
    if let Some(value) = xml_node.attribute("style") {
        for declaration in simplecss::DeclarationTokenizer::from(value) {
            if let Some(aid) = AttributeId::from_str(declaration.name) {
                insert_property(aid, declaration.value);
            }
        }
    }

    properties
}

fn resolve_css<'a>(xml: &'a roxmltree::Document<'a>) -> simplecss::StyleSheet<'a> {
    let mut sheet = simplecss::StyleSheet::new();

    for node in xml.descendants().filter(|n| n.has_tag_name("style")) {
        match node.attribute("type") {
            Some("text/css") => {}
            Some(_) => continue,
            None => {}
        }

        let text = match node.text() {
            Some(v) => v,
            None => continue,
        };

        sheet.parse_more(text);
    }

    sheet
}

struct XmlNode<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl simplecss::Element for XmlNode<'_, '_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(XmlNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.0.prev_sibling_element().map(XmlNode)
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name().name() == local_name
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element().is_none(),
            // Icons are static, so other pseudo-classes never match.
            _ => false,
        }
    }
}

// crates/optolink-rs-xcfg/src/dom.rs

//! A lightweight element/attribute/text document tree.
//!
//! This is the document-provider boundary: section builders only ever see
//! ordered element and text nodes with parent/sibling links. The tree is
//! assembled from `quick-xml` pull events into a single arena; comments and
//! processing instructions are dropped while building, and whitespace-only
//! text nodes are kept because the node cursor's traversal rule depends on
//! seeing them.

use crate::error::XcfgError;
use log::trace;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::borrow::Cow;

/// Index of a node within a [`Document`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// One attribute of an element node.
#[derive(Debug)]
struct Attribute {
    name: String,
    value: String,
}

#[derive(Debug)]
enum NodeKind {
    Element { name: String, attrs: Vec<Attribute> },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
}

/// A parsed document: an arena of nodes plus the root element.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Parses an XML string into a document tree.
    ///
    /// # Errors
    /// Returns [`XcfgError::XmlParsing`] on ill-formed input and
    /// [`XcfgError::MissingElement`] if the document has no root element.
    pub fn parse_str(xml: &str) -> Result<Document, XcfgError> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut root: Option<NodeId> = None;

        // Stack of open elements, each with the id of its last linked child.
        let mut open: Vec<(NodeId, Option<NodeId>)> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let id = push_element(&mut nodes, &mut open, &mut root, &e)?;
                    open.push((id, None));
                }
                Event::Empty(e) => {
                    push_element(&mut nodes, &mut open, &mut root, &e)?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(t) => {
                    // Text outside the root (prolog whitespace) is dropped.
                    if !open.is_empty() {
                        let content = unescape_lossy(&String::from_utf8_lossy(t.as_ref()));
                        push_text(&mut nodes, &mut open, &content);
                    }
                }
                Event::CData(c) => {
                    if !open.is_empty() {
                        let content = String::from_utf8_lossy(c.as_ref()).into_owned();
                        push_text(&mut nodes, &mut open, &content);
                    }
                }
                Event::GeneralRef(r) => {
                    // References arrive as their own events and would otherwise
                    // split the surrounding text run.
                    if !open.is_empty() {
                        let content = resolve_reference(&r);
                        push_text(&mut nodes, &mut open, &content);
                    }
                }
                Event::Eof => break,
                // Comments, PIs, doctype and the XML declaration are not
                // part of the provider contract.
                _ => {}
            }
        }

        let root = root.ok_or(XcfgError::MissingElement {
            element: "document root",
        })?;
        trace!("parsed document with {} nodes", nodes.len());
        Ok(Document { nodes, root })
    }

    /// The document's root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The element's name, or `None` for text nodes.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    /// The value of the element's `name`d attribute.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// The element's text content: the content of its first child, if that
    /// child is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        let first = self.first_child(id)?;
        match &self.nodes[first.0].kind {
            NodeKind::Text(content) => Some(content),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    /// True for text nodes (blank or not).
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    /// True for whitespace-only text nodes.
    pub fn is_blank(&self, id: NodeId) -> bool {
        match &self.nodes[id.0].kind {
            NodeKind::Text(content) => content.chars().all(char::is_whitespace),
            NodeKind::Element { .. } => false,
        }
    }
}

/// Appends a node to the arena and links it to the innermost open element.
fn push_node(
    nodes: &mut Vec<NodeData>,
    open: &mut [(NodeId, Option<NodeId>)],
    kind: NodeKind,
) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(NodeData {
        kind,
        next_sibling: None,
        first_child: None,
    });
    if let Some((parent, last_child)) = open.last_mut() {
        match last_child {
            Some(prev) => nodes[prev.0].next_sibling = Some(id),
            None => nodes[parent.0].first_child = Some(id),
        }
        *last_child = Some(id);
    }
    id
}

/// Appends text, merging into the parent's trailing text node if there is
/// one. Character and entity references produce separate reader events, so
/// without merging a value like `x &lt; y` would become three sibling text
/// nodes and [`Document::text`] would only see the first.
fn push_text(nodes: &mut Vec<NodeData>, open: &mut [(NodeId, Option<NodeId>)], content: &str) {
    if let Some(&(_, Some(last))) = open.last() {
        if let NodeKind::Text(existing) = &mut nodes[last.0].kind {
            existing.push_str(content);
            return;
        }
    }
    push_node(nodes, open, NodeKind::Text(content.to_string()));
}

fn push_element(
    nodes: &mut Vec<NodeData>,
    open: &mut Vec<(NodeId, Option<NodeId>)>,
    root: &mut Option<NodeId>,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<NodeId, XcfgError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        attrs.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: unescape_lossy(&String::from_utf8_lossy(&attr.value)),
        });
    }
    let id = push_node(nodes, open, NodeKind::Element { name, attrs });
    if root.is_none() && open.is_empty() {
        *root = Some(id);
    }
    Ok(id)
}

/// Resolves a general reference event to its text. The predefined entities
/// and numeric character references are resolved; an unknown entity falls
/// back to its raw `&name;` spelling.
fn resolve_reference(r: &quick_xml::events::BytesRef<'_>) -> String {
    if let Ok(Some(ch)) = r.resolve_char_ref() {
        return ch.to_string();
    }
    let name = String::from_utf8_lossy(r.as_ref());
    match name.as_ref() {
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "amp" => "&".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        other => format!("&{other};"),
    }
}

/// Resolves XML entities, falling back to the raw text for unknown ones.
fn unescape_lossy(raw: &str) -> String {
    match quick_xml::escape::unescape(raw) {
        Ok(Cow::Borrowed(_)) => raw.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}

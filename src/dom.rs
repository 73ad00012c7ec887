//! The owned element tree which the rewriter walks.
//!
//! HTML is parsed with `html5ever` into an `RcDom`, which is then converted
//! once into an immutable tree of [`Element`]s.  Only elements and text
//! survive the conversion; comments, doctypes and processing instructions
//! are dropped.

use std::collections::BTreeMap;
use std::io;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::Result;

/// An attribute mapping with case-insensitive keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Create an empty attribute mapping.
    pub fn new() -> Attributes {
        Default::default()
    }

    /// Look up an attribute by name (ignoring case).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Look up an attribute, returning its trimmed value if it is present
    /// and not blank.
    pub fn get_nonblank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Set an attribute, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Returns true if the attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k.as_ref(), v);
        }
        attrs
    }
}

/// A child of an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A run of text.
    Text(String),
    /// A nested element.
    Element(Element),
}

impl Node {
    /// Return the element, if this is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                for child in &e.children {
                    child.push_text(out);
                }
            }
        }
    }
}

/// An HTML element: a tag name, attributes and ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Attributes,
    children: Vec<Node>,
}

impl Element {
    /// Build an element from its parts.  The tag name is lowercased.
    pub fn new(tag: &str, attrs: Attributes, children: Vec<Node>) -> Element {
        Element {
            tag: tag.to_ascii_lowercase(),
            attrs,
            children,
        }
    }

    /// The (lowercase) tag name.  The document root has an empty tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute by name (ignoring case).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// All of this element's attributes.
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// The concatenation of all descendant text, with no rules applied.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out);
        }
        out
    }

    /// The direct children, in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The direct children which are elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// The direct children whose tag is one of `tags`.
    pub fn child_elements_named<'a>(
        &'a self,
        tags: &'a [&'a str],
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements()
            .filter(move |e| tags.contains(&e.tag.as_str()))
    }
}

/// Convert an `RcDom` node into an owned node.  Returns `None` for nodes
/// which carry no content (comments, doctypes etc.).
fn dom_to_node(handle: &Handle) -> Option<Node> {
    match handle.data {
        NodeData::Document => Some(Node::Element(Element::new(
            "",
            Attributes::new(),
            dom_children(handle),
        ))),
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (&*attr.name.local, attr.value.to_string()))
                .collect();
            Some(Node::Element(Element::new(
                &name.local,
                attrs,
                dom_children(handle),
            )))
        }
        NodeData::Text { ref contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { .. }
        | NodeData::Doctype { .. }
        | NodeData::ProcessingInstruction { .. } => {
            html_trace_quiet!("Dropping node: {:?}", handle.data);
            None
        }
    }
}

fn dom_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(dom_to_node)
        .collect()
}

/// Reads and parses HTML from `input`, returning the document root.
pub fn parse(mut input: impl io::Read) -> Result<Element> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut input)?;
    Ok(document_root(&dom))
}

/// Parse HTML held in a string.
pub fn parse_str(html: &str) -> Element {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts).one(html);
    document_root(&dom)
}

fn document_root(dom: &RcDom) -> Element {
    match dom_to_node(&dom.document) {
        Some(Node::Element(root)) => root,
        _ => Element::new("", Attributes::new(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_str, Attributes, Element, Node};

    #[test]
    fn test_attributes_ignore_case() {
        let attrs: Attributes = [("HREF", "http://x.com")].into_iter().collect();
        assert_eq!(attrs.get("href"), Some("http://x.com"));
        assert_eq!(attrs.get("Href"), Some("http://x.com"));
        assert!(attrs.contains("hReF"));
        assert_eq!(attrs.get("title"), None);
    }

    #[test]
    fn test_nonblank() {
        let attrs: Attributes = [("title", "  "), ("alt", " x ")].into_iter().collect();
        assert_eq!(attrs.get_nonblank("title"), None);
        assert_eq!(attrs.get_nonblank("alt"), Some("x"));
    }

    #[test]
    fn test_parse_tree() {
        let root = parse_str("<p>Hello <b>there</b><!-- gone --></p>");
        assert_eq!(root.tag(), "");
        assert_eq!(root.text(), "Hello there");
        let html = root.child_elements().next().unwrap();
        assert_eq!(html.tag(), "html");
        let body = html.child_elements_named(&["body"]).next().unwrap();
        let p = body.child_elements().next().unwrap();
        assert_eq!(p.tag(), "p");
        assert_eq!(p.children().len(), 2);
        assert_eq!(p.children()[0], Node::Text("Hello ".into()));
    }

    #[test]
    fn test_element_lowercases_tag() {
        let e = Element::new("TD", Attributes::new(), vec![]);
        assert_eq!(e.tag(), "td");
    }
}

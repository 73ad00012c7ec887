//! Module containing the `Rewriter`, which walks an element tree and
//! replaces each element matched by a [`Rule`] with its text rendering.

pub mod formatters;
pub mod table;

use crate::dom::{Element, Node};
use crate::rules::{Rule, RuleInput, Rules};
use crate::Result;

/// Options which tune the built-in formatters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Absorb empty (or `&nbsp;`-only) table cells into the span of the
    /// cell before them.
    pub merge_empty_cells: bool,
    /// The number of the first item of an ordered list without a `start`
    /// attribute.
    pub ordered_list_start: i64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            merge_empty_cells: false,
            ordered_list_start: 1,
        }
    }
}

/// Renders element trees to plain text using a set of [`Rules`].
///
/// The walk is post-order: a formatter always sees the rendered text of
/// its children, and nested structures (lists in lists, tables in table
/// cells) are resolved inside-out.  The input tree is never modified.
#[derive(Clone, Debug, Default)]
pub struct Rewriter {
    rules: Rules,
    options: RenderOptions,
}

impl Rewriter {
    /// Create a rewriter with the given rules and options.
    pub fn new(rules: Rules, options: RenderOptions) -> Rewriter {
        Rewriter { rules, options }
    }

    /// The rules in use.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The formatter options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a whole document (or any subtree) to plain text.
    pub fn render_document(&self, root: &Element) -> Result<String> {
        self.render_element(root)
    }

    /// Render a single node.
    pub fn render_node(&self, node: &Node) -> Result<String> {
        match node {
            Node::Text(t) => Ok(t.clone()),
            Node::Element(e) => self.render_element(e),
        }
    }

    /// Render an element: apply its rule if there is one, otherwise drop
    /// the tag and keep the rendered children.
    pub fn render_element(&self, element: &Element) -> Result<String> {
        match self.rules.get(element.tag()) {
            None => self.render_children(element),
            Some(Rule::Replace(s)) => {
                html_trace!("Replacing <{}> with {:?}", element.tag(), s);
                Ok(s.clone())
            }
            Some(Rule::Format(format)) => {
                html_trace!("Formatting <{}>", element.tag());
                format(&RuleInput::new(element, self))
            }
        }
    }

    /// Render the children of an element, concatenated.
    pub fn render_children(&self, element: &Element) -> Result<String> {
        let mut out = String::new();
        for child in element.children() {
            out.push_str(&self.render_node(child)?);
        }
        Ok(out)
    }
}

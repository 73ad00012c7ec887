//! The selector to formatter mapping which drives rendering.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;

use crate::dom::{Attributes, Element};
use crate::render::formatters::{
    anchor_to_text, h1_to_text, h2_to_text, h3_to_text, h4_to_text, image_to_text, ol_to_text,
    ul_to_text,
};
use crate::render::table::table_to_text;
use crate::render::Rewriter;
use crate::Result;

/// A formatting function.  It is given the matched element (with its
/// merged attribute record) and returns the text which replaces it.
pub type FormatFn = fn(&RuleInput<'_>) -> Result<String>;

/// What to do with an element matched by a selector.
#[derive(Clone)]
pub enum Rule {
    /// Replace the element with the output of a function.
    Format(FormatFn),
    /// Replace the element with a fixed string.  An empty string deletes
    /// the element and everything inside it.
    Replace(String),
}

impl Rule {
    /// A rule which deletes matching elements.
    pub fn delete() -> Rule {
        Rule::Replace(String::new())
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Format(_) => f.write_str("Format(..)"),
            Rule::Replace(s) => f.debug_tuple("Replace").field(s).finish(),
        }
    }
}

/// A mapping from tag name to [`Rule`].
///
/// Lookup is by exact (lowercase) tag name.  Tags with no rule are
/// stripped at the end of rendering, leaving their text behind.
#[derive(Clone, Debug)]
pub struct Rules(BTreeMap<String, Rule>);

impl Rules {
    /// A mapping with no rules at all; rendering just strips tags.
    pub fn empty() -> Rules {
        Rules(BTreeMap::new())
    }

    /// Add or replace the rule for `selector`.
    pub fn with_rule(mut self, selector: &str, rule: Rule) -> Rules {
        self.insert(selector, rule);
        self
    }

    /// Remove the rule for `selector`, if any.
    pub fn without_rule(mut self, selector: &str) -> Rules {
        self.remove(selector);
        self
    }

    /// Add or replace the rule for `selector`, returning the old one.
    pub fn insert(&mut self, selector: &str, rule: Rule) -> Option<Rule> {
        self.0.insert(selector.to_ascii_lowercase(), rule)
    }

    /// Remove the rule for `selector`.
    pub fn remove(&mut self, selector: &str) -> Option<Rule> {
        self.0.remove(&selector.to_ascii_lowercase())
    }

    /// Find the rule for a tag.
    pub fn get(&self, tag: &str) -> Option<&Rule> {
        self.0.get(tag)
    }

    /// The configured selectors, in sorted order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for Rules {
    /// The built-in rules: anchors, images, tables, lists, `h1` to `h4`,
    /// and deletion of `style` blocks.
    fn default() -> Rules {
        Rules::empty()
            .with_rule("a", Rule::Format(anchor_to_text))
            .with_rule("img", Rule::Format(image_to_text))
            .with_rule("table", Rule::Format(table_to_text))
            .with_rule("ul", Rule::Format(ul_to_text))
            .with_rule("ol", Rule::Format(ol_to_text))
            .with_rule("h1", Rule::Format(h1_to_text))
            .with_rule("h2", Rule::Format(h2_to_text))
            .with_rule("h3", Rule::Format(h3_to_text))
            .with_rule("h4", Rule::Format(h4_to_text))
            .with_rule("style", Rule::delete())
    }
}

/// Everything a [`FormatFn`] gets to see.
pub struct RuleInput<'a> {
    element: &'a Element,
    rewriter: &'a Rewriter,
    attrs: OnceCell<Attributes>,
}

impl<'a> RuleInput<'a> {
    pub(crate) fn new(element: &'a Element, rewriter: &'a Rewriter) -> RuleInput<'a> {
        RuleInput {
            element,
            rewriter,
            attrs: OnceCell::new(),
        }
    }

    /// The matched element.
    pub fn element(&self) -> &'a Element {
        self.element
    }

    /// The renderer, for formatters which render sub-content themselves.
    pub fn rewriter(&self) -> &'a Rewriter {
        self.rewriter
    }

    /// The element's attributes, plus a `text` entry holding the rendered
    /// content of its children.
    ///
    /// The children are rendered on first use only, so formatters which
    /// walk the children themselves (lists, tables) don't pay for it.
    pub fn attrs(&self) -> Result<&Attributes> {
        if let Some(attrs) = self.attrs.get() {
            return Ok(attrs);
        }
        let text = self.rewriter.render_children(self.element)?;
        let mut attrs = self.element.attrs().clone();
        attrs.insert("text", text);
        Ok(self.attrs.get_or_init(|| attrs))
    }

    /// The rendered content of the element's children.
    pub fn text(&self) -> Result<&str> {
        Ok(self.attrs()?.get("text").unwrap_or_default())
    }
}

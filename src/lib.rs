//! Convert HTML email bodies to plain text.
//!
//! This crate renders an HTML document as readable fixed-width text,
//! suitable for the `text/plain` alternative of an email.  Headings are
//! underlined, lists are bulleted or numbered, links and images become
//! their URLs, and tables are drawn as ASCII art.  Any other markup is
//! stripped, leaving its text behind.
//!
//! # Examples
//!
//! ```rust
//! # use html2mailtext::from_read;
//! let html = b"<ul><li>Item one</li><li>Item two</li></ul>";
//! assert_eq!(from_read(&html[..]).unwrap(),
//!            "\t* Item one\n\t* Item two");
//! ```
//!
//! The formatting of each tag is controlled by a set of [`Rules`], which
//! can be changed through the [`config`] module:
//!
//! ```rust
//! # use html2mailtext::{config, Rule};
//! let text = config::plain()
//!     .rule("b", Rule::Replace("[removed]".into()))
//!     .string_from_str("<p>Some <b>bold</b> text</p>")
//!     .unwrap();
//! assert_eq!(text, "Some [removed] text");
//! ```
//!
//! To convert an outgoing message in place, keeping its HTML as an
//! alternative, use a [`PlainTextMiddleware`].
//!
//! A simple demonstration program is included as an example:
//!
//! ```sh
//! $ cargo run --example html2mailtext < foo.html
//! [...]
//! ```

#![deny(missing_docs)]

#[macro_use]
mod macros;

pub mod dom;
pub mod message;
pub mod render;
pub mod rules;

use std::io;

pub use dom::{parse, parse_str, Attributes, Element, Node};
pub use message::{html_to_text, normalize_html, EmailMessage, Message, PlainTextMiddleware};
pub use render::{RenderOptions, Rewriter};
pub use rules::{FormatFn, Rule, RuleInput, Rules};

/// Errors from reading or rendering HTML
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An element is missing an attribute its formatter can't do without.
    #[error("<{tag}> element has no {attribute} attribute")]
    MalformedInput {
        /// The element's tag name.
        tag: String,
        /// The missing attribute.
        attribute: String,
    },
    /// A table with no rows.
    #[error("Table has no rows")]
    EmptyTable,
    /// An I/O error
    #[error("I/O error")]
    IoError(#[from] io::Error),
}

impl Error {
    pub(crate) fn missing_attribute(element: &Element, attribute: &str) -> Error {
        Error::MalformedInput {
            tag: element.tag().to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        use Error::*;
        match (self, other) {
            (
                MalformedInput {
                    tag: t1,
                    attribute: a1,
                },
                MalformedInput {
                    tag: t2,
                    attribute: a2,
                },
            ) => t1 == t2 && a1 == a2,
            (EmptyTable, EmptyTable) => true,
            _ => false,
        }
    }
}

impl Eq for Error {}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

pub mod config {
    //! Configure the HTML to text translation using the `Config` type, which can be
    //! constructed using one of the functions in this module.

    use crate::dom::{parse, parse_str};
    use crate::render::{RenderOptions, Rewriter};
    use crate::rules::{Rule, Rules};
    use crate::Result;

    /// Configure the HTML processing.
    #[derive(Clone, Debug, Default)]
    pub struct Config {
        rules: Rules,
        options: RenderOptions,
    }

    impl Config {
        /// Replace the whole rule set.
        pub fn rules(mut self, rules: Rules) -> Self {
            self.rules = rules;
            self
        }

        /// Add or override the rule for one selector.
        pub fn rule(mut self, selector: &str, rule: Rule) -> Self {
            self.rules.insert(selector, rule);
            self
        }

        /// Remove the rule for one selector, so that matching tags are just
        /// stripped.
        pub fn without_rule(mut self, selector: &str) -> Self {
            self.rules.remove(selector);
            self
        }

        /// Merge blank table cells into the cell before them.
        pub fn merge_empty_cells(mut self, merge: bool) -> Self {
            self.options.merge_empty_cells = merge;
            self
        }

        /// Set the first number of ordered lists with no `start` attribute.
        pub fn ordered_list_start(mut self, start: i64) -> Self {
            self.options.ordered_list_start = start;
            self
        }

        /// Build a [`Rewriter`] from this configuration.
        pub fn renderer(self) -> Rewriter {
            Rewriter::new(self.rules, self.options)
        }

        /// Reads HTML from `input`, and returns its plain text rendering.
        pub fn string_from_read<R: std::io::Read>(self, input: R) -> Result<String> {
            let doc = parse(input)?;
            self.renderer().render_document(&doc)
        }

        /// Renders the HTML in `html` as plain text.
        pub fn string_from_str(self, html: &str) -> Result<String> {
            self.renderer().render_document(&parse_str(html))
        }
    }

    /// Return a Config with the built-in rules.
    pub fn plain() -> Config {
        Config::default()
    }

    /// Return a Config with the given rules in place of the built-in ones.
    pub fn with_rules(rules: Rules) -> Config {
        Config {
            rules,
            options: RenderOptions::default(),
        }
    }
}

/// Reads HTML from `input`, and returns it rendered as plain text using the
/// built-in rules.
pub fn from_read<R>(input: R) -> Result<String>
where
    R: io::Read,
{
    config::plain().string_from_read(input)
}

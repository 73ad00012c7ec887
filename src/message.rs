//! Converting the body of an outgoing message to plain text.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::parse_str;
use crate::render::Rewriter;
use crate::Result;

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("valid regex"));

/// The content type the original body is attached under.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// A message whose body can be rewritten.
pub trait Message {
    /// The primary body.
    fn body(&self) -> &str;

    /// Replace the primary body.
    fn set_body(&mut self, body: String);

    /// Whether the message can carry alternative representations of its
    /// body.
    fn supports_alternatives(&self) -> bool {
        false
    }

    /// Add an alternative representation of the body.  Only called when
    /// [`supports_alternatives`](Message::supports_alternatives) is true.
    fn attach_alternative(&mut self, _content: String, _mimetype: &str) {}
}

/// An alternative representation of a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alternative {
    /// The body content.
    pub content: String,
    /// Its MIME type.
    pub mimetype: String,
}

/// A simple email message with multipart alternative support.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailMessage {
    /// The subject line.
    pub subject: String,
    /// The primary body.
    pub body: String,
    /// Alternative bodies, in the order they were attached.
    pub alternatives: Vec<Alternative>,
}

impl EmailMessage {
    /// Create a message with no alternatives.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> EmailMessage {
        EmailMessage {
            subject: subject.into(),
            body: body.into(),
            alternatives: Vec::new(),
        }
    }
}

impl Message for EmailMessage {
    fn body(&self) -> &str {
        &self.body
    }

    fn set_body(&mut self, body: String) {
        self.body = body;
    }

    fn supports_alternatives(&self) -> bool {
        true
    }

    fn attach_alternative(&mut self, content: String, mimetype: &str) {
        self.alternatives.push(Alternative {
            content,
            mimetype: mimetype.to_string(),
        });
    }
}

/// Trim `html` and collapse runs of blank lines to a single one.
pub fn normalize_html(html: &str) -> String {
    BLANK_LINES.replace_all(html.trim(), "\n\n").into_owned()
}

/// Replaces HTML message bodies with their plain text rendering.
#[derive(Clone, Debug, Default)]
pub struct PlainTextMiddleware {
    rewriter: Rewriter,
}

impl PlainTextMiddleware {
    /// Create a middleware using `rewriter` to render bodies.
    pub fn new(rewriter: Rewriter) -> PlainTextMiddleware {
        PlainTextMiddleware { rewriter }
    }

    /// Render `html` to plain text.
    pub fn html_to_text(&self, html: &str) -> Result<String> {
        let doc = parse_str(&normalize_html(html));
        self.rewriter.render_document(&doc)
    }

    /// Replace the message's HTML body with plain text, first attaching
    /// the HTML as an alternative if the message supports it.
    ///
    /// If rendering fails the message is left untouched.
    pub fn process_message<'m, M: Message>(&self, message: &'m mut M) -> Result<&'m mut M> {
        let text = self.html_to_text(message.body())?;
        if message.supports_alternatives() {
            let html = message.body().to_string();
            message.attach_alternative(html, HTML_CONTENT_TYPE);
        }
        message.set_body(text);
        Ok(message)
    }
}

/// Render `html` to plain text with the built-in rules.
pub fn html_to_text(html: &str) -> Result<String> {
    PlainTextMiddleware::default().html_to_text(html)
}

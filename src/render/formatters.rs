//! The built-in formatters for anchors, images, lists and headings.

use unicode_width::UnicodeWidthStr;

use crate::dom::Element;
use crate::render::Rewriter;
use crate::rules::RuleInput;
use crate::{Error, Result};

/// Render an anchor as its target URL, prefixed with `(label) ` when the
/// label (the `title` attribute, else the link text) says something the
/// URL doesn't.
pub fn anchor_to_text(input: &RuleInput<'_>) -> Result<String> {
    let attrs = input.attrs()?;
    let href = attrs
        .get("href")
        .ok_or_else(|| Error::missing_attribute(input.element(), "href"))?
        .trim();
    let label = attrs
        .get_nonblank("title")
        .or_else(|| attrs.get_nonblank("text"))
        .unwrap_or_default();

    if label.is_empty() || label == href {
        Ok(href.to_string())
    } else {
        Ok(format!("({}) {}", label, href))
    }
}

/// Render an image as `title: src`.  Images with neither a title nor alt
/// text are dropped.
pub fn image_to_text(input: &RuleInput<'_>) -> Result<String> {
    let attrs = input.attrs()?;
    let title = match attrs
        .get_nonblank("title")
        .or_else(|| attrs.get_nonblank("alt"))
    {
        Some(title) => title,
        None => return Ok(String::new()),
    };
    let src = attrs
        .get("src")
        .ok_or_else(|| Error::missing_attribute(input.element(), "src"))?
        .trim();
    Ok(format!("{}: {}", title, src))
}

/// Render a `<ul>` as tab-indented `*` bullets, one item per line.
pub fn ul_to_text(input: &RuleInput<'_>) -> Result<String> {
    let items = list_items(input.element(), input.rewriter())?;
    Ok(items
        .iter()
        .map(|item| format!("\t* {}", item))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Render an `<ol>` as tab-indented numbered items, counting from the
/// `start` attribute if it has one.
pub fn ol_to_text(input: &RuleInput<'_>) -> Result<String> {
    let element = input.element();
    let rewriter = input.rewriter();
    let start = element
        .attr("start")
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(rewriter.options().ordered_list_start);
    let items = list_items(element, rewriter)?;
    Ok(items
        .iter()
        .zip(start..)
        .map(|(item, i)| format!("\t{}. {}", i, item))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Render the direct `<li>` children of a list.
fn list_items(list: &Element, rewriter: &Rewriter) -> Result<Vec<String>> {
    list.child_elements_named(&["li"])
        .map(|li| list_item_to_text(li, rewriter))
        .collect()
}

fn list_item_to_text(li: &Element, rewriter: &Rewriter) -> Result<String> {
    let mut out = String::new();
    for child in li.children() {
        let piece = rewriter.render_node(child)?;
        let is_list = child
            .as_element()
            .is_some_and(|e| matches!(e.tag(), "ul" | "ol"));
        // Nested lists start on their own line.
        if is_list && !piece.trim().is_empty() {
            out.truncate(out.trim_end().len());
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(piece.trim_start_matches(&['\n', '\r'][..]));
        } else {
            out.push_str(&piece);
        }
    }
    // Continuation lines sit one level deeper than the bullet.
    Ok(out.trim().split('\n').collect::<Vec<_>>().join("\n\t"))
}

enum Decoration {
    Underline(char),
    Banner(&'static str),
}

fn heading_to_text(input: &RuleInput<'_>, upper: bool, decoration: Decoration) -> Result<String> {
    let text = input.text()?.trim();
    let text = if upper {
        text.to_uppercase()
    } else {
        text.to_string()
    };
    Ok(match decoration {
        Decoration::Underline(c) => {
            let width = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
            format!("\n{}\n{}", text, c.to_string().repeat(width))
        }
        Decoration::Banner(b) => format!("\n{} {} {}", b, text, b),
    })
}

/// `<h1>`: uppercase, underlined with `=`.
pub fn h1_to_text(input: &RuleInput<'_>) -> Result<String> {
    heading_to_text(input, true, Decoration::Underline('='))
}

/// `<h2>`: underlined with `=`.
pub fn h2_to_text(input: &RuleInput<'_>) -> Result<String> {
    heading_to_text(input, false, Decoration::Underline('='))
}

/// `<h3>`: uppercase, underlined with `-`.
pub fn h3_to_text(input: &RuleInput<'_>) -> Result<String> {
    heading_to_text(input, true, Decoration::Underline('-'))
}

/// `<h4>`: underlined with `-`.
pub fn h4_to_text(input: &RuleInput<'_>) -> Result<String> {
    heading_to_text(input, false, Decoration::Underline('-'))
}

/// `<h5>`: wrapped in `===` banners.
pub fn h5_to_text(input: &RuleInput<'_>) -> Result<String> {
    heading_to_text(input, false, Decoration::Banner("==="))
}

/// `<h6>`: wrapped in `---` banners.
pub fn h6_to_text(input: &RuleInput<'_>) -> Result<String> {
    heading_to_text(input, false, Decoration::Banner("---"))
}

//! Inline span tokenizer.
//!
//! Turns the text of a single block into an ordered list of [`TextSpan`]s.
//! Passes run in a fixed order: images, links, then the `**`, `*` and `` ` ``
//! delimiters. Each pass only looks at spans that are still plain text, so
//! `**` must be handled before the single `*` italic pass.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{MarkdownError, Result, UrlKind};
use crate::node::HtmlNode;

/// A typed inline fragment of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpan {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: Option<String> },
    Image { alt: String, url: Option<String> },
}

impl TextSpan {
    /// Convert this span into the HTML node that renders it.
    pub fn to_node(&self) -> Result<HtmlNode> {
        match self {
            TextSpan::Plain(text) => Ok(HtmlNode::text(text.as_str())),
            TextSpan::Bold(text) => Ok(HtmlNode::leaf("b", text.as_str())),
            TextSpan::Italic(text) => Ok(HtmlNode::leaf("i", text.as_str())),
            TextSpan::Code(text) => Ok(HtmlNode::leaf("code", text.as_str())),
            TextSpan::Link { text, url } => {
                let url = url
                    .as_deref()
                    .ok_or(MarkdownError::MissingUrl { kind: UrlKind::Link })?;
                Ok(HtmlNode::leaf("a", text.as_str()).with_attr("href", url))
            }
            TextSpan::Image { alt, url } => {
                let url = url
                    .as_deref()
                    .ok_or(MarkdownError::MissingUrl { kind: UrlKind::Image })?;
                Ok(HtmlNode::leaf("img", "")
                    .with_attr("src", url)
                    .with_attr("alt", alt.as_str()))
            }
        }
    }
}

fn image_regex() -> &'static Regex {
    static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
    IMAGE_REGEX.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Invalid image regex"))
}

fn link_regex() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid link regex"))
}

/// Tokenize `text` into inline spans.
///
/// Fails with [`MarkdownError::UnclosedDelimiter`] when a `**`, `*` or `` ` ``
/// delimiter is opened and never closed.
pub fn tokenize(text: &str) -> Result<Vec<TextSpan>> {
    let spans = vec![TextSpan::Plain(text.to_string())];
    let spans = split_images(spans);
    let spans = split_links(spans);
    let spans = split_delimiter(spans, "**", TextSpan::Bold)?;
    let spans = split_delimiter(spans, "*", TextSpan::Italic)?;
    split_delimiter(spans, "`", TextSpan::Code)
}

/// Tokenize `text` and convert every span into an HTML node.
pub fn text_to_nodes(text: &str) -> Result<Vec<HtmlNode>> {
    tokenize(text)?.iter().map(TextSpan::to_node).collect()
}

/// Pull `![alt](url)` images out of plain spans.
pub fn split_images(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_pattern(spans, image_regex(), |alt, url| TextSpan::Image {
        alt,
        url: Some(url),
    })
}

/// Pull `[text](url)` links out of plain spans.
pub fn split_links(spans: Vec<TextSpan>) -> Vec<TextSpan> {
    split_pattern(spans, link_regex(), |text, url| TextSpan::Link {
        text,
        url: Some(url),
    })
}

fn split_pattern(
    spans: Vec<TextSpan>,
    pattern: &Regex,
    make: impl Fn(String, String) -> TextSpan,
) -> Vec<TextSpan> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let TextSpan::Plain(text) = span else {
            out.push(span);
            continue;
        };

        let mut rest_start = 0;
        for caps in pattern.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let before = &text[rest_start..whole.start()];
            if !before.is_empty() {
                out.push(TextSpan::Plain(before.to_string()));
            }
            out.push(make(caps[1].to_string(), caps[2].to_string()));
            rest_start = whole.end();
        }

        if rest_start == 0 {
            // No match: keep the span untouched.
            out.push(TextSpan::Plain(text));
        } else if rest_start < text.len() {
            out.push(TextSpan::Plain(text[rest_start..].to_string()));
        }
    }

    out
}

/// Split plain spans on `delimiter`, alternating plain and `styled` parts.
///
/// An even number of parts means a delimiter was left open. Empty parts are
/// dropped.
pub fn split_delimiter(
    spans: Vec<TextSpan>,
    delimiter: &str,
    styled: fn(String) -> TextSpan,
) -> Result<Vec<TextSpan>> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let TextSpan::Plain(text) = span else {
            out.push(span);
            continue;
        };

        let parts: Vec<&str> = text.split(delimiter).collect();
        if parts.len() % 2 == 0 {
            return Err(MarkdownError::UnclosedDelimiter {
                delimiter: delimiter.to_string(),
                text,
            });
        }

        for (i, part) in parts.into_iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if i % 2 == 0 {
                out.push(TextSpan::Plain(part.to_string()));
            } else {
                out.push(styled(part.to_string()));
            }
        }
    }

    Ok(out)
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

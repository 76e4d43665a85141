//! `mdsite-parse`: markdown to HTML node tree conversion.
//!
//! The pipeline is one-way: raw text is cut into blocks, each block is
//! classified, text-bearing blocks are tokenized into inline spans, and the
//! spans become [`HtmlNode`]s under a root `div`.
//!
//! # Quick start
//!
//! ```
//! let html = mdsite_parse::markdown_to_html("# Hello\n\nSome **bold** text.").unwrap();
//! assert_eq!(html, "<div><h1>Hello</h1><p>Some <b>bold</b> text.</p></div>");
//! ```

pub mod blocks;
pub mod error;
pub mod inline;
pub mod node;
pub mod parse;

pub use blocks::{BlockType, classify, segment_blocks};
pub use error::*;
pub use inline::{TextSpan, tokenize};
pub use node::{AttrValue, Attrs, HtmlNode};
pub use parse::markdown_to_html_node;

/// Convert a markdown document straight to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    markdown_to_html_node(markdown)?.to_html()
}

/// Return the text of the first `# ` heading line.
///
/// Only level 1 headings count; fails with [`MarkdownError::MissingTitle`] if
/// the document has none.
pub fn extract_title(markdown: &str) -> Result<String> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::to_string)
        .ok_or(MarkdownError::MissingTitle)
}

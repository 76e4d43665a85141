//! Block segmentation and classification.
//!
//! `segment_blocks` cuts a markdown document into blank-line separated blocks
//! and `classify` assigns each block its [`BlockType`].

use std::sync::OnceLock;

use regex::Regex;

const FENCE: &str = "```";

/// Block-level markdown constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    Heading,
    Code,
    Quote,
    UnorderedList,
    OrderedList,
}

fn blank_line_regex() -> &'static Regex {
    static BLANK_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    BLANK_LINE_REGEX.get_or_init(|| Regex::new(r"\n\s*\n+").expect("Invalid blank line regex"))
}

fn heading_regex() -> &'static Regex {
    static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADING_REGEX.get_or_init(|| Regex::new(r"^#{1,6} ").expect("Invalid heading regex"))
}

fn ordered_item_regex() -> &'static Regex {
    static ORDERED_ITEM_REGEX: OnceLock<Regex> = OnceLock::new();
    ORDERED_ITEM_REGEX.get_or_init(|| Regex::new(r"^\d\. ").expect("Invalid ordered item regex"))
}

/// Split a markdown document into trimmed, non-empty blocks.
///
/// Blocks are separated by one or more blank (whitespace-only) lines. A
/// segment that ends with a closing fence but does not open one is glued back
/// onto the previous block, so fenced code containing blank lines survives as
/// a single block.
pub fn segment_blocks(markdown: &str) -> Vec<String> {
    let normalised = markdown.replace("\r\n", "\n");
    let mut blocks: Vec<String> = Vec::new();

    for segment in blank_line_regex().split(&normalised) {
        let block = segment.trim_matches([' ', '\n']);
        if block.is_empty() {
            continue;
        }

        if block.ends_with(FENCE)
            && !block.starts_with(FENCE)
            && let Some(last) = blocks.last_mut()
        {
            tracing::trace!("merging fenced continuation into previous block");
            last.push('\n');
            last.push_str(block);
            continue;
        }

        blocks.push(block.to_string());
    }

    blocks
}

/// Classify a single block. The first matching rule wins.
pub fn classify(block: &str) -> BlockType {
    if heading_regex().is_match(block) {
        return BlockType::Heading;
    }
    if block.starts_with(FENCE) && block.ends_with(FENCE) {
        return BlockType::Code;
    }
    if every_line(block, |line| line.starts_with("> ")) {
        return BlockType::Quote;
    }
    if every_line(block, |line| line.starts_with("* ") || line.starts_with("- ")) {
        return BlockType::UnorderedList;
    }
    // Single digit markers only: "10. " and up fall through to Paragraph.
    if every_line(block, |line| ordered_item_regex().is_match(line)) {
        return BlockType::OrderedList;
    }
    BlockType::Paragraph
}

fn every_line(block: &str, predicate: impl Fn(&str) -> bool) -> bool {
    block.split('\n').all(predicate)
}

/// Strip the list marker from a list line.
///
/// Markers are counted in characters, not bytes: two for `* `/`- `, three for
/// `N. `.
pub(crate) fn strip_list_marker(line: &str, ordered: bool) -> &str {
    let marker_len = if ordered { 3 } else { 2 };
    match line.char_indices().nth(marker_len) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

use crate::blocks::{BlockType, classify, segment_blocks, strip_list_marker};
use crate::error::Result;
use crate::inline::text_to_nodes;
use crate::node::HtmlNode;

/// Convert a markdown document into an HTML node tree rooted at a `div`.
///
/// Blocks are converted in source order. The first failing block aborts the
/// whole document.
pub fn markdown_to_html_node(markdown: &str) -> Result<HtmlNode> {
    let blocks = segment_blocks(markdown);
    let mut root = HtmlNode::parent("div", Vec::with_capacity(blocks.len()));

    for block in &blocks {
        let block_type = classify(block);
        tracing::debug!(?block_type, len = block.len(), "converting block");
        let node = block_to_node(block, block_type)?;
        root.append_children([node])?;
    }

    Ok(root)
}

fn block_to_node(block: &str, block_type: BlockType) -> Result<HtmlNode> {
    match block_type {
        BlockType::Paragraph => paragraph_to_node(block),
        BlockType::Heading => Ok(heading_to_node(block)),
        BlockType::Code => Ok(code_to_node(block)),
        BlockType::Quote => quote_to_node(block),
        BlockType::UnorderedList => list_to_node(block, false),
        BlockType::OrderedList => list_to_node(block, true),
    }
}

fn paragraph_to_node(block: &str) -> Result<HtmlNode> {
    let text = block.split('\n').collect::<Vec<_>>().join(" ");
    Ok(HtmlNode::parent("p", text_to_nodes(&text)?))
}

fn quote_to_node(block: &str) -> Result<HtmlNode> {
    let text = block
        .split('\n')
        .map(|line| line.trim_start_matches(['>', ' ']))
        .collect::<Vec<_>>()
        .join(" ");
    let paragraph = HtmlNode::parent("p", text_to_nodes(&text)?);
    Ok(HtmlNode::parent("blockquote", vec![paragraph]))
}

/// Fence lines are dropped; the body is emitted verbatim, without inline
/// formatting.
fn code_to_node(block: &str) -> HtmlNode {
    let lines: Vec<&str> = block.lines().collect();
    let body = match lines.len() {
        0..=2 => String::new(),
        n => lines[1..n - 1].join("\n"),
    };
    HtmlNode::parent("pre", vec![HtmlNode::leaf("code", body)])
}

/// Heading text is emitted verbatim, without inline formatting.
fn heading_to_node(block: &str) -> HtmlNode {
    let text = block.trim_start_matches('#');
    let level = block.len() - text.len();
    HtmlNode::leaf(format!("h{level}"), text.trim_start())
}

fn list_to_node(block: &str, ordered: bool) -> Result<HtmlNode> {
    let items = block
        .split('\n')
        .map(|line| {
            let text = strip_list_marker(line, ordered);
            Ok(HtmlNode::parent("li", text_to_nodes(text)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let tag = if ordered { "ol" } else { "ul" };
    Ok(HtmlNode::parent(tag, items))
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

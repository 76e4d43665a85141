//! HTML node tree.
//!
//! A document is rendered as a tree of [`HtmlNode`]s: leaves hold literal
//! content, parents own an ordered list of children. Serialization is a plain
//! recursive walk; text is emitted as-is without escaping.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{MarkdownError, Result};

/// Attribute map. Iteration (and therefore rendering) follows insertion order.
pub type Attrs = IndexMap<String, AttrValue>;

/// A single HTML attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => f.write_str(s),
            AttrValue::Int(n) => write!(f, "{n}"),
            // `false` renders as `name="False"`.
            AttrValue::Bool(true) => f.write_str("True"),
            AttrValue::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// A node in the rendered HTML tree.
///
/// Fields are optional so that half-built nodes can exist; the missing pieces
/// are reported as [`MarkdownError::Structural`] when the node is serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HtmlNode {
    /// Terminal node. Without a tag the value is emitted as raw text.
    Leaf {
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        value: Option<String>,
        #[serde(skip_serializing_if = "IndexMap::is_empty")]
        attrs: Attrs,
    },
    /// Element owning an ordered sequence of child nodes.
    Parent {
        tag: Option<String>,
        children: Option<Vec<HtmlNode>>,
        #[serde(skip_serializing_if = "IndexMap::is_empty")]
        attrs: Attrs,
    },
}

impl HtmlNode {
    /// Raw text node (leaf without a tag).
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: None,
            value: Some(value.into()),
            attrs: Attrs::new(),
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: Some(tag.into()),
            value: Some(value.into()),
            attrs: Attrs::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Parent {
            tag: Some(tag.into()),
            children: Some(children),
            attrs: Attrs::new(),
        }
    }

    /// Add (or replace) an attribute, keeping its original position if it
    /// already existed.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs_mut().insert(name.into(), value.into());
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf { tag, .. } | HtmlNode::Parent { tag, .. } => tag.as_deref(),
        }
    }

    pub fn attrs(&self) -> &Attrs {
        match self {
            HtmlNode::Leaf { attrs, .. } | HtmlNode::Parent { attrs, .. } => attrs,
        }
    }

    fn attrs_mut(&mut self) -> &mut Attrs {
        match self {
            HtmlNode::Leaf { attrs, .. } | HtmlNode::Parent { attrs, .. } => attrs,
        }
    }

    /// Leaf value, `None` for parents.
    pub fn value(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf { value, .. } => value.as_deref(),
            HtmlNode::Parent { .. } => None,
        }
    }

    /// Child nodes, empty for leaves and for parents without a child list.
    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Parent {
                children: Some(children),
                ..
            } => children,
            _ => &[],
        }
    }

    /// Render attributes as they appear inside an opening tag.
    ///
    /// `true` renders as a bare attribute name; every other value (including
    /// `false`) renders as `name="value"`. Each attribute is prefixed with a
    /// single space, so an empty map yields an empty string.
    pub fn render_attrs(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.attrs() {
            match value {
                AttrValue::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                other => out.push_str(&format!(" {name}=\"{other}\"")),
            }
        }
        out
    }

    /// Serialize this node and its subtree to an HTML string.
    pub fn to_html(&self) -> Result<String> {
        match self {
            HtmlNode::Leaf { tag, value, .. } => {
                let value = value
                    .as_deref()
                    .ok_or_else(|| MarkdownError::structural("leaf node has no value"))?;
                match tag {
                    None => Ok(value.to_string()),
                    Some(tag) => Ok(format!("<{tag}{}>{value}</{tag}>", self.render_attrs())),
                }
            }
            HtmlNode::Parent { tag, children, .. } => {
                let children = children
                    .as_ref()
                    .ok_or_else(|| MarkdownError::structural("parent node has no children"))?;
                let tag = tag
                    .as_deref()
                    .ok_or_else(|| MarkdownError::structural("parent node has no tag"))?;

                let mut inner = String::new();
                for child in children {
                    inner.push_str(&child.to_html()?);
                }
                Ok(format!("<{tag}{}>{inner}</{tag}>", self.render_attrs()))
            }
        }
    }

    /// Append children to a parent node in place.
    pub fn append_children(&mut self, new_children: impl IntoIterator<Item = HtmlNode>) -> Result<()> {
        match self {
            HtmlNode::Parent {
                children: Some(children),
                ..
            } => {
                children.extend(new_children);
                Ok(())
            }
            HtmlNode::Parent { children: None, .. } => Err(MarkdownError::structural(
                "cannot append children to a node without a child list",
            )),
            HtmlNode::Leaf { .. } => Err(MarkdownError::structural(
                "cannot append children to a leaf node",
            )),
        }
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

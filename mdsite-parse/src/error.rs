use std::fmt;

/// Errors that can occur while converting markdown to HTML.
///
/// All of them are fatal for the document being converted: no partial tree is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkdownError {
    #[error("Invalid markdown: unclosed inline delimiter '{delimiter}' in \"{text}\"")]
    UnclosedDelimiter { delimiter: String, text: String },

    #[error("A url is required for {kind} spans")]
    MissingUrl { kind: UrlKind },

    #[error("Cannot render node: {message}")]
    Structural { message: String },

    #[error("Invalid markdown: a level 1 heading (\"# \") is required for the page title")]
    MissingTitle,
}

impl MarkdownError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        MarkdownError::Structural {
            message: message.into(),
        }
    }
}

/// The span kinds that carry a target url.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Link,
    Image,
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlKind::Link => f.write_str("link"),
            UrlKind::Image => f.write_str("image"),
        }
    }
}

pub type Result<T, E = MarkdownError> = std::result::Result<T, E>;

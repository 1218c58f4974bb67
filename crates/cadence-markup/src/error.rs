//! Error types for markup scanning.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::Anchor;

/// Result type for markup operations.
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Errors that can occur while scanning a page.
#[derive(Error, Debug)]
pub enum MarkupError {
    /// The page file could not be read.
    #[error("failed to read page '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured selector is not valid CSS.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// A required anchor element is absent from the page.
    #[error("page has no {anchor} element (selector `{selector}`)")]
    MissingAnchor { anchor: Anchor, selector: String },
}

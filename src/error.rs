//! Error types for md2puki operations.

use crate::ast::NodeId;
use thiserror::Error;

/// Errors that abort a parse or render.
///
/// The writer's control outcomes (fallback to children, skip a subtree) are
/// not errors and never show up here; see [`crate::ast::writer::Rendered`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("text span {start}..{end} lies outside the {len}-byte source")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("text span {start}..{end} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        start: usize,
        end: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("node {0} does not exist in the document")]
    MissingNode(NodeId),

    #[error("list item {0} is not a child of a list")]
    OrphanListItem(NodeId),

    #[error("unsupported markdown construct: {0}")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod node;
pub mod parse;
pub mod tree;
pub mod writer;

pub use node::{Node, NodeId, NodeKind, Span, TextNode};
pub use parse::parse_document;
pub use pulldown_cmark::Alignment;
pub use tree::{Children, Document};
pub use writer::{Renderer, Rendered, render};

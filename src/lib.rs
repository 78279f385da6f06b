//! Convert Markdown to PukiWiki markup.
//!
//! Markdown is parsed with `pulldown-cmark` into a [`ast::Document`], an
//! arena of nodes whose text points back into the source, and then written
//! out by the [`ast::Renderer`].
//!
//! ```
//! let out = md2puki::convert("## Title\n\n**bold** and `code`\n", &Default::default()).unwrap();
//! assert_eq!(out, "** Title\n\n'''bold''' and ''code''\n");
//! ```

pub mod ast;
pub mod error;
pub mod options;
pub mod text;

pub use ast::{Document, Renderer, parse_document, render};
pub use error::{Error, Result};
pub use options::ParseOptions;

/// Parse `markdown` and render it as PukiWiki markup.
pub fn convert(markdown: &str, options: &ParseOptions) -> Result<String> {
    let doc = parse_document(markdown, options)?;
    render(markdown.as_bytes(), &doc)
}

//! PukiWiki writer.
//!
//! Every node goes through [`Renderer::dispatch`], which either produces a
//! fragment, asks for the generic fallback (render the children in order and
//! concatenate them), or drops the node together with its subtree. Fragments
//! bubble up through plain string concatenation; nested contexts such as
//! quotes and list depth are applied afterwards, line by line, on the
//! rendered text of a subtree.

mod blocks;
mod inline;
mod table;
pub mod utils;

use crate::ast::{Document, NodeId, NodeKind};
use crate::error::Result;
use std::io::Write;
use tracing::{debug, trace};

/// What a node-specific rule produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Finished output for the node.
    Fragment(String),
    /// No bespoke rule: render the children and concatenate them.
    Unhandled,
    /// The node and its whole subtree produce nothing.
    Skip,
}

/// Renders a [`Document`] as PukiWiki markup. Holds no state besides the
/// borrowed source and tree, so one renderer can be reused for any number of
/// subtrees.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    source: &'a [u8],
    doc: &'a Document,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a [u8], doc: &'a Document) -> Self {
        Renderer { source, doc }
    }

    /// Render the subtree at `root`. Non-empty output always ends with
    /// exactly one newline; empty output stays empty.
    pub fn render(&self, root: NodeId) -> Result<String> {
        let mut out = self.render_node(root)?.unwrap_or_default();
        if !out.is_empty() {
            out.truncate(out.trim_end_matches('\n').len());
            out.push('\n');
        }
        debug!(root = %root, bytes = out.len(), "rendered pukiwiki");
        Ok(out)
    }

    /// Render `root` and write the result to `w` in one go.
    pub fn render_to<W: Write>(&self, w: &mut W, root: NodeId) -> Result<()> {
        let out = self.render(root)?;
        w.write_all(out.as_bytes())?;
        Ok(())
    }

    /// Render one node, resolving the fallback. `None` means the node was
    /// skipped.
    pub(crate) fn render_node(&self, id: NodeId) -> Result<Option<String>> {
        match self.dispatch(id)? {
            Rendered::Fragment(s) => Ok(Some(s)),
            Rendered::Unhandled => {
                trace!(node = %id, "no bespoke rule, rendering children");
                self.render_children(id, |child| self.render_node(child))
                    .map(Some)
            }
            Rendered::Skip => Ok(None),
        }
    }

    fn dispatch(&self, id: NodeId) -> Result<Rendered> {
        let node = self.doc.get(id)?;
        match &node.kind {
            NodeKind::Heading { level } => self.heading(id, *level),
            NodeKind::Emphasis { level } => self.emphasis(id, *level),
            NodeKind::CodeSpan => self.code_span(id),
            NodeKind::CodeBlock { lines } | NodeKind::FencedCodeBlock { lines, .. } => {
                self.code_block(lines)
            }
            NodeKind::Image { destination, .. } => Ok(self.image(destination)),
            NodeKind::Link { destination, .. } => self.link(id, destination),
            NodeKind::Blockquote => self.blockquote(id),
            NodeKind::ListItem => self.list_item(id),
            NodeKind::Table { alignments } => self.table(id, alignments),
            NodeKind::ThematicBreak => Ok(Rendered::Skip),
            NodeKind::Text(text) => self.text(text),

            NodeKind::Document
            | NodeKind::Paragraph
            | NodeKind::TextBlock
            | NodeKind::List { .. }
            | NodeKind::HtmlBlock { .. }
            | NodeKind::RawHtml { .. }
            | NodeKind::AutoLink { .. }
            | NodeKind::String { .. }
            | NodeKind::DefinitionList
            | NodeKind::DefinitionTerm
            | NodeKind::DefinitionDescription
            | NodeKind::Footnote { .. }
            | NodeKind::FootnoteList
            | NodeKind::FootnoteLink { .. }
            | NodeKind::FootnoteBacklink { .. }
            | NodeKind::Strikethrough
            | NodeKind::TableHeader
            | NodeKind::TableRow
            | NodeKind::TableCell { .. }
            | NodeKind::TaskCheckBox { .. } => Ok(Rendered::Unhandled),
        }
    }

    /// Render the children of `parent` with `render_child` and join them.
    /// Inline children are concatenated as is. A block child gets a leading
    /// newline unless it is the first child, plus one more when a blank line
    /// preceded it in the source. Skipped children contribute nothing.
    pub(crate) fn render_children<F>(&self, parent: NodeId, mut render_child: F) -> Result<String>
    where
        F: FnMut(NodeId) -> Result<Option<String>>,
    {
        let first = self.doc.first_child(parent);
        let mut out = String::new();
        for child in self.doc.children(parent) {
            let Some(fragment) = render_child(child)? else {
                continue;
            };
            let node = self.doc.get(child)?;
            if !node.kind.is_inline() {
                if Some(child) != first {
                    out.push('\n');
                }
                if node.blank_before {
                    out.push('\n');
                }
            }
            out.push_str(&fragment);
        }
        Ok(out)
    }
}

/// Render the whole document.
pub fn render(source: &[u8], doc: &Document) -> Result<String> {
    Renderer::new(source, doc).render(doc.root())
}


#[cfg(test)]
mod tests {
    use super::testutil::Fixture;
    use super::*;
    use crate::Error;
    use crate::ast::Span;

    #[test]
    fn empty_document_renders_nothing() {
        let f = Fixture::new();
        assert_eq!(f.render().unwrap(), "");
    }

    #[test]
    fn output_ends_with_exactly_one_newline() {
        let mut f = Fixture::new();
        let root = f.root();
        f.paragraph(root, "text");
        assert_eq!(f.render().unwrap(), "text\n");

        // "a\n" from the soft break, then "\n" from the trailing hard break
        let mut f = Fixture::new();
        let root = f.root();
        let p = f.node(root, NodeKind::Paragraph);
        f.line(p, "a");
        let span = f.span("");
        f.node(
            p,
            NodeKind::Text(crate::ast::TextNode {
                span,
                soft_break: false,
                hard_break: true,
            }),
        );
        assert_eq!(f.render().unwrap(), "a\n");
    }

    #[test]
    fn block_siblings_are_separated_by_newlines() {
        let mut f = Fixture::new();
        let root = f.root();
        f.paragraph(root, "a");
        f.paragraph(root, "b");
        f.spaced(root, NodeKind::Paragraph);
        let last = f.doc.last_child(root).unwrap();
        f.text(last, "c");
        assert_eq!(f.render().unwrap(), "a\nb\n\nc\n");
    }

    #[test]
    fn inline_siblings_are_concatenated() {
        let mut f = Fixture::new();
        let root = f.root();
        let p = f.node(root, NodeKind::Paragraph);
        f.text(p, "a");
        let em = f.node(p, NodeKind::Emphasis { level: 1 });
        f.text(em, "b");
        f.text(p, "c");
        assert_eq!(f.render().unwrap(), "a''b''c\n");
    }

    #[test]
    fn thematic_break_leaves_spacing_alone() {
        let mut f = Fixture::new();
        let root = f.root();
        f.paragraph(root, "a");
        f.spaced(root, NodeKind::ThematicBreak);
        let b = f.spaced(root, NodeKind::Paragraph);
        f.text(b, "b");
        assert_eq!(f.render().unwrap(), "a\n\nb\n");
    }

    #[test]
    fn leading_thematic_break_still_counts_as_first_child() {
        let mut f = Fixture::new();
        let root = f.root();
        f.node(root, NodeKind::ThematicBreak);
        f.paragraph(root, "a");
        assert_eq!(f.render().unwrap(), "\na\n");
    }

    #[test]
    fn unhandled_nodes_fall_back_to_children() {
        let mut f = Fixture::new();
        let root = f.root();
        let p = f.node(root, NodeKind::Paragraph);
        let strike = f.node(p, NodeKind::Strikethrough);
        f.text(strike, "gone");
        f.node(p, NodeKind::TaskCheckBox { checked: true });
        f.node(
            p,
            NodeKind::FootnoteLink {
                label: "1".to_string(),
            },
        );
        assert_eq!(f.render().unwrap(), "gone\n");
    }

    #[test]
    fn fatal_error_discards_everything() {
        let mut f = Fixture::new();
        let root = f.root();
        f.paragraph(root, "fine");
        let quote = f.node(root, NodeKind::Blockquote);
        let p = f.node(quote, NodeKind::Paragraph);
        f.node(
            p,
            NodeKind::Text(crate::ast::TextNode {
                span: Span::new(100, 200),
                ..Default::default()
            }),
        );
        f.paragraph(root, "never reached");
        let err = f.render().unwrap_err();
        assert!(matches!(err, Error::SpanOutOfBounds { start: 100, .. }));
    }

    #[test]
    fn render_to_writes_output() {
        let mut f = Fixture::new();
        let root = f.root();
        f.paragraph(root, "hello");
        let mut buf = Vec::new();
        Renderer::new(f.source.as_bytes(), &f.doc)
            .render_to(&mut buf, root)
            .unwrap();
        assert_eq!(buf, b"hello\n");
    }

    #[test]
    fn subtree_can_be_rendered_alone() {
        let mut f = Fixture::new();
        let root = f.root();
        f.paragraph(root, "a");
        let p = f.paragraph(root, "b");
        let out = Renderer::new(f.source.as_bytes(), &f.doc).render(p).unwrap();
        assert_eq!(out, "b\n");
    }
}

use super::node::{Node, NodeId, NodeKind, Span, TextNode};
use super::tree::Document;
use crate::error::{Error, Result};
use crate::options::ParseOptions;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Parser, Tag};
use std::ops::Range;
use tracing::debug;

/// Parse markdown into a [`Document`] whose text nodes point back into
/// `source`.
pub fn parse_document(source: &str, options: &ParseOptions) -> Result<Document> {
    let mut builder = TreeBuilder::new(source);
    for (event, range) in Parser::new_ext(source, options.to_pulldown()).into_offset_iter() {
        builder.push(event, range)?;
    }
    let doc = builder.finish();
    debug!(nodes = doc.node_count(), bytes = source.len(), "parsed markdown document");
    Ok(doc)
}

/// A simple stack frame used while turning Start/End pairs into nodes.
struct Frame {
    node: NodeId,
    start: usize,
    // inline events go straight into this node instead of a TextBlock
    collects_inlines: bool,
    // TextBlock currently receiving stray inlines of a block container
    text_block: Option<NodeId>,
}

struct TreeBuilder<'s> {
    source: &'s str,
    doc: Document,
    stack: Vec<Frame>,
    footnotes: Vec<NodeId>,
    // end of the last inline text span, so an escape backslash is claimed once
    text_end: usize,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        TreeBuilder {
            source,
            doc: Document::new(),
            stack: vec![Frame {
                node: NodeId::ROOT,
                start: 0,
                collects_inlines: false,
                text_block: None,
            }],
            footnotes: Vec::new(),
            text_end: 0,
        }
    }

    fn push(&mut self, event: Event<'_>, range: Range<usize>) -> Result<()> {
        let span = Span::new(range.start, range.end);
        match event {
            Event::Start(tag) => self.start(tag, span)?,
            Event::End(_) => {
                // the document frame stays until finish()
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            Event::Text(_) => match self.verbatim_block() {
                Some(block) => self.push_lines(block, span),
                None => {
                    let span = self.with_escape(span);
                    self.text_end = span.end;
                    self.inline(Node::text(span), span.start);
                }
            },
            Event::Code(_) => {
                let code = self.inline(Node::new(NodeKind::CodeSpan), span.start);
                for text in code_span_lines(self.source, span) {
                    let id = self.doc.alloc(Node::new(NodeKind::Text(text)));
                    self.doc.append_child(code, id);
                }
            }
            Event::Html(_) => match self.verbatim_block() {
                Some(block) => self.push_lines(block, span),
                None => {
                    self.inline(Node::new(NodeKind::RawHtml { span }), span.start);
                }
            },
            Event::InlineHtml(_) => {
                self.inline(Node::new(NodeKind::RawHtml { span }), span.start);
            }
            Event::SoftBreak => self.line_break(false, span),
            Event::HardBreak => self.line_break(true, span),
            Event::Rule => {
                self.block(Node::new(NodeKind::ThematicBreak), span.start);
            }
            Event::TaskListMarker(checked) => {
                self.inline(Node::new(NodeKind::TaskCheckBox { checked }), span.start);
            }
            Event::FootnoteReference(label) => {
                let kind = NodeKind::FootnoteLink {
                    label: label.to_string(),
                };
                self.inline(Node::new(kind), span.start);
            }
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                return Err(Error::Unsupported("math"));
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>, span: Span) -> Result<()> {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading {
                level: heading_level(level),
            },
            Tag::BlockQuote(_) => NodeKind::Blockquote,
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock { lines: Vec::new() },
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::FencedCodeBlock {
                info: info.to_string(),
                lines: Vec::new(),
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock { lines: Vec::new() },
            Tag::List(start) => NodeKind::List { start },
            Tag::Item => NodeKind::ListItem,
            Tag::FootnoteDefinition(label) => {
                // definitions are gathered into a trailing FootnoteList
                let node = self.doc.alloc(Node::new(NodeKind::Footnote {
                    label: label.to_string(),
                }));
                self.footnotes.push(node);
                self.stack.push(Frame {
                    node,
                    start: span.start,
                    collects_inlines: false,
                    text_block: None,
                });
                return Ok(());
            }
            Tag::DefinitionList => NodeKind::DefinitionList,
            Tag::DefinitionListTitle => NodeKind::DefinitionTerm,
            Tag::DefinitionListDefinition => NodeKind::DefinitionDescription,
            Tag::Table(alignments) => NodeKind::Table { alignments },
            Tag::TableHead => NodeKind::TableHeader,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell {
                alignment: Alignment::None,
            },
            Tag::Emphasis => NodeKind::Emphasis { level: 1 },
            Tag::Strong => NodeKind::Emphasis { level: 2 },
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link {
                link_type: LinkType::Autolink | LinkType::Email,
                dest_url,
                ..
            } => NodeKind::AutoLink {
                destination: dest_url.to_string(),
            },
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                destination: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                destination: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Superscript | Tag::Subscript => {
                return Err(Error::Unsupported("superscript/subscript"));
            }
            Tag::MetadataBlock(_) => return Err(Error::Unsupported("metadata block")),
        };

        let collects_inlines = kind.is_inline()
            || matches!(
                kind,
                NodeKind::Paragraph
                    | NodeKind::Heading { .. }
                    | NodeKind::TableCell { .. }
                    | NodeKind::DefinitionTerm
            );
        let node = if kind.is_inline() {
            self.inline(Node::new(kind), span.start)
        } else {
            self.block(Node::new(kind), span.start)
        };
        self.stack.push(Frame {
            node,
            start: span.start,
            collects_inlines,
            text_block: None,
        });
        Ok(())
    }

    fn top(&self) -> (NodeId, usize) {
        self.stack
            .last()
            .map_or((NodeId::ROOT, 0), |f| (f.node, f.start))
    }

    /// Append a block node under the current frame.
    fn block(&mut self, node: Node, start: usize) -> NodeId {
        let (parent, parent_start) = self.top();
        if let Some(frame) = self.stack.last_mut() {
            frame.text_block = None;
        }
        let blank = blank_line_before(self.source, start, parent_start);
        let id = self.doc.alloc(node.with_blank_before(blank));
        self.doc.append_child(parent, id);
        id
    }

    /// Append an inline node, wrapping it in a TextBlock when the current
    /// frame only holds blocks (tight list items and the like).
    fn inline(&mut self, node: Node, start: usize) -> NodeId {
        let container = self.inline_container(start);
        let id = self.doc.alloc(node);
        self.doc.append_child(container, id);
        id
    }

    fn inline_container(&mut self, start: usize) -> NodeId {
        let Some(frame) = self.stack.last() else {
            return NodeId::ROOT;
        };
        if frame.collects_inlines {
            return frame.node;
        }
        if let Some(text_block) = frame.text_block {
            return text_block;
        }
        let text_block = self.block(Node::new(NodeKind::TextBlock), start);
        if let Some(frame) = self.stack.last_mut() {
            frame.text_block = Some(text_block);
        }
        text_block
    }

    fn line_break(&mut self, hard: bool, span: Span) {
        let container = self.inline_container(span.start);
        let last_text = self
            .doc
            .last_child(container)
            .and_then(|id| self.doc.node_mut(id))
            .and_then(|n| match &mut n.kind {
                NodeKind::Text(text) => Some(text),
                _ => None,
            });
        match last_text {
            Some(text) => mark_break(text, hard),
            None => {
                let mut text = TextNode {
                    span: Span::new(span.start, span.start),
                    ..TextNode::default()
                };
                mark_break(&mut text, hard);
                let id = self.doc.alloc(Node::new(NodeKind::Text(text)));
                self.doc.append_child(container, id);
            }
        }
    }

    /// pulldown-cmark starts the text of a backslash escape after the
    /// backslash. Pull the backslash back in so the text stays literal and
    /// cannot turn into PukiWiki markup.
    fn with_escape(&self, span: Span) -> Span {
        let escaped = span.start > self.text_end
            && self.source.as_bytes().get(span.start - 1) == Some(&b'\\');
        if escaped {
            Span::new(span.start - 1, span.end)
        } else {
            span
        }
    }

    /// The current frame, if it keeps its content as raw source lines.
    fn verbatim_block(&self) -> Option<NodeId> {
        let (node, _) = self.top();
        match self.doc.node(node)?.kind {
            NodeKind::CodeBlock { .. }
            | NodeKind::FencedCodeBlock { .. }
            | NodeKind::HtmlBlock { .. } => Some(node),
            _ => None,
        }
    }

    fn push_lines(&mut self, block: NodeId, span: Span) {
        let source = self.source;
        let Some(lines) = self.doc.node_mut(block).and_then(|n| match &mut n.kind {
            NodeKind::CodeBlock { lines }
            | NodeKind::FencedCodeBlock { lines, .. }
            | NodeKind::HtmlBlock { lines } => Some(lines),
            _ => None,
        }) else {
            return;
        };
        let text = source.get(span.start..span.end).unwrap_or("");
        let mut offset = span.start;
        for piece in text.split_inclusive('\n') {
            let piece_span = Span::new(offset, offset + piece.len());
            offset = piece_span.end;
            // a line split over several events is glued back together
            if let Some(last) = lines.last_mut() {
                let open = !source
                    .get(last.start..last.end)
                    .is_some_and(|l| l.ends_with('\n'));
                if open && last.end == piece_span.start {
                    last.end = piece_span.end;
                    continue;
                }
            }
            lines.push(piece_span);
        }
    }

    fn finish(mut self) -> Document {
        if !self.footnotes.is_empty() {
            let list = self.doc.alloc(Node::new(NodeKind::FootnoteList));
            self.doc.append_child(NodeId::ROOT, list);
            for footnote in std::mem::take(&mut self.footnotes) {
                self.doc.append_child(list, footnote);
            }
        }
        self.doc
    }
}

fn mark_break(text: &mut TextNode, hard: bool) {
    if hard {
        text.hard_break = true;
    } else {
        text.soft_break = true;
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Span of a code span's content: the backtick fences are dropped, and one
/// padding space on each side when both sides have one and the content is
/// not all spaces.
fn code_span_content(source: &str, span: Span) -> Span {
    let raw = source.get(span.start..span.end).unwrap_or("");
    let open = raw.len() - raw.trim_start_matches('`').len();
    if open == raw.len() {
        return Span::new(span.start, span.start);
    }
    let close = raw.len() - raw.trim_end_matches('`').len();
    let mut start = span.start + open;
    let mut end = span.end - close;
    let inner = &raw[open..raw.len() - close];
    if inner.len() >= 2
        && inner.starts_with(' ')
        && inner.ends_with(' ')
        && !inner.bytes().all(|b| b == b' ')
    {
        start += 1;
        end -= 1;
    }
    Span::new(start, end)
}

/// The lines of a code span as text nodes, all but the last ending in a
/// soft break. Quote markers and indentation opening a continuation line
/// belong to the enclosing containers and are left out.
fn code_span_lines(source: &str, span: Span) -> Vec<TextNode> {
    let content = code_span_content(source, span);
    let raw = source.get(content.start..content.end).unwrap_or("");
    let mut texts = Vec::new();
    let mut offset = content.start;
    for (i, piece) in raw.split('\n').enumerate() {
        let line_end = offset + piece.len();
        let prefix = if i == 0 {
            0
        } else {
            piece.len() - piece.trim_start_matches([' ', '\t', '>']).len()
        };
        let body = &piece[prefix..];
        let end = line_end - (body.len() - body.trim_end_matches('\r').len());
        texts.push(TextNode {
            span: Span::new(offset + prefix, end),
            ..TextNode::default()
        });
        offset = line_end + 1;
    }
    if let Some((_, init)) = texts.split_last_mut() {
        init.iter_mut().for_each(|t| t.soft_break = true);
    }
    texts
}

fn line_start(source: &str, offset: usize) -> usize {
    source
        .get(..offset)
        .and_then(|s| s.rfind('\n'))
        .map_or(0, |i| i + 1)
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c.is_whitespace() || c == '>')
}

/// Whether the block starting at `start` is separated from the preceding
/// content by a blank line. Only blocks that open a later line than their
/// parent count, and only quote markers or indentation may precede them on
/// that line. A line holding nothing but `>` is blank inside a quote.
pub(crate) fn blank_line_before(source: &str, start: usize, parent_start: usize) -> bool {
    let line = line_start(source, start);
    if line == 0 || line <= line_start(source, parent_start) {
        return false;
    }
    if !source.get(line..start).is_some_and(is_blank) {
        return false;
    }
    let prev = line_start(source, line - 1);
    source.get(prev..line - 1).is_some_and(is_blank)
}

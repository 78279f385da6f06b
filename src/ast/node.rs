use crate::error::{Error, Result};
use pulldown_cmark::Alignment;
use std::fmt::{self, Display, Formatter};

/// Index of a node inside a [`crate::ast::Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The document node (always 0).
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte range into the markdown source. Nodes keep spans instead of owned
/// copies of their text; the writer resolves them against the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the text this span covers.
    pub fn resolve<'s>(&self, source: &'s [u8]) -> Result<&'s str> {
        let bytes = source
            .get(self.start..self.end)
            .ok_or(Error::SpanOutOfBounds {
                start: self.start,
                end: self.end,
                len: source.len(),
            })?;
        std::str::from_utf8(bytes).map_err(|e| Error::InvalidUtf8 {
            start: self.start,
            end: self.end,
            source: e,
        })
    }
}

/// A run of literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextNode {
    pub span: Span,
    /// The source line ended right after this text (plain newline).
    pub soft_break: bool,
    /// The source line ended with an explicit hard break.
    pub hard_break: bool,
}

/// The node types the PukiWiki writer knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Paragraph,
    /// Inline content sitting directly in a block container, e.g. the text
    /// of a tight list item.
    TextBlock,
    Heading {
        level: u8,
    },
    ThematicBreak,
    /// Indented code. One span per source line, newline included.
    CodeBlock {
        lines: Vec<Span>,
    },
    FencedCodeBlock {
        info: String,
        lines: Vec<Span>,
    },
    Blockquote,
    /// `start` is `Some` for ordered lists.
    List {
        start: Option<u64>,
    },
    ListItem,
    HtmlBlock {
        lines: Vec<Span>,
    },
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Footnote {
        label: String,
    },
    FootnoteList,
    Table {
        alignments: Vec<Alignment>,
    },
    TableHeader,
    TableRow,
    /// `Alignment::None` defers to the table's column alignment.
    TableCell {
        alignment: Alignment,
    },

    Text(TextNode),
    /// Literal text that does not come from the source buffer.
    String {
        value: String,
    },
    CodeSpan,
    /// Level 1 is `*em*`, level 2 is `**strong**`.
    Emphasis {
        level: u8,
    },
    Link {
        destination: String,
        title: String,
    },
    Image {
        destination: String,
        title: String,
    },
    AutoLink {
        destination: String,
    },
    RawHtml {
        span: Span,
    },
    Strikethrough,
    TaskCheckBox {
        checked: bool,
    },
    FootnoteLink {
        label: String,
    },
    FootnoteBacklink {
        label: String,
    },
}

impl NodeKind {
    /// Inline nodes are concatenated without separators by the tree walker;
    /// everything else is a block.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text(_)
                | NodeKind::String { .. }
                | NodeKind::CodeSpan
                | NodeKind::Emphasis { .. }
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::AutoLink { .. }
                | NodeKind::RawHtml { .. }
                | NodeKind::Strikethrough
                | NodeKind::TaskCheckBox { .. }
                | NodeKind::FootnoteLink { .. }
                | NodeKind::FootnoteBacklink { .. }
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::List { .. })
    }
}

/// A node in the document tree, linked to its parent, first and last child,
/// and next sibling.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// A blank source line separates this block from what came before it.
    pub blank_before: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            blank_before: false,
        }
    }

    pub fn text(span: Span) -> Self {
        Node::new(NodeKind::Text(TextNode {
            span,
            ..TextNode::default()
        }))
    }

    pub fn with_blank_before(mut self, blank: bool) -> Self {
        self.blank_before = blank;
        self
    }
}

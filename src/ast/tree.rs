use super::node::{Node, NodeId, NodeKind};
use crate::error::{Error, Result};

/// A parsed markdown document.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]; the
/// parent link is a plain index, so walking upwards never touches ownership.
/// Text is not stored here: nodes carry [`super::Span`]s into the source the
/// document was parsed from.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes (index 0 is always the document node).
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Like [`Document::node`], but a dangling id is an error.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(Error::MissingNode(id))
    }

    /// Number of allocated nodes, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(child_node) = self.nodes.get_mut(child.index()) {
            child_node.parent = Some(parent);
            child_node.next_sibling = None;
        }
        let prev_last = match self.nodes.get_mut(parent.index()) {
            Some(parent_node) => {
                let prev = parent_node.last_child.replace(child);
                if prev.is_none() {
                    parent_node.first_child = Some(child);
                }
                prev
            }
            None => return,
        };
        if let Some(prev) = prev_last.and_then(|p| self.nodes.get_mut(p.index())) {
            prev.next_sibling = Some(child);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.last_child)
    }

    /// Children of `parent` in document order.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            doc: self,
            current: self.first_child(parent),
        }
    }

    /// Concatenated literal text of every text-bearing descendant of `id`.
    /// Markup is dropped: `[*a* b](x)` yields `a b`.
    pub fn plain_text(&self, source: &[u8], id: NodeId) -> Result<String> {
        let mut out = String::new();
        self.collect_text(source, id, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, source: &[u8], id: NodeId, out: &mut String) -> Result<()> {
        for child in self.children(id) {
            match &self.get(child)?.kind {
                NodeKind::Text(text) => out.push_str(text.span.resolve(source)?),
                NodeKind::String { value } => out.push_str(value),
                _ => self.collect_text(source, child, out)?,
            }
        }
        Ok(())
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    #[test]
    fn new_document_has_only_a_root() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert!(doc.first_child(doc.root()).is_none());
        let root = doc.node(doc.root()).unwrap();
        assert_eq!(root.kind, NodeKind::Document);
        assert!(root.parent.is_none());
    }

    #[test]
    fn append_keeps_children_in_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.alloc(Node::new(NodeKind::Paragraph));
        let b = doc.alloc(Node::new(NodeKind::ThematicBreak));
        let c = doc.alloc(Node::new(NodeKind::Paragraph));
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);

        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.last_child(root), Some(c));
        assert_eq!(doc.parent(b), Some(root));
        assert!(doc.children(a).next().is_none());
    }

    #[test]
    fn plain_text_flattens_markup() {
        let source = b"a b";
        let mut doc = Document::new();
        let link = doc.alloc(Node::new(NodeKind::Link {
            destination: "x".into(),
            title: String::new(),
        }));
        doc.append_child(doc.root(), link);
        let em = doc.alloc(Node::new(NodeKind::Emphasis { level: 1 }));
        doc.append_child(link, em);
        let a = doc.alloc(Node::text(Span::new(0, 1)));
        doc.append_child(em, a);
        let b = doc.alloc(Node::text(Span::new(1, 3)));
        doc.append_child(link, b);

        assert_eq!(doc.plain_text(source, link).unwrap(), "a b");
    }

    #[test]
    fn missing_node_is_reported() {
        let doc = Document::new();
        assert!(matches!(doc.get(NodeId(9)), Err(Error::MissingNode(NodeId(9)))));
    }
}

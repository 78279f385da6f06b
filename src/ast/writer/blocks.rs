use super::{Renderer, Rendered};
use crate::ast::{NodeId, NodeKind, Span};
use crate::error::{Error, Result};
use crate::text::process_lines;

/// PukiWiki only has three heading levels.
const MAX_HEADING_LEVEL: u8 = 3;

impl Renderer<'_> {
    pub(super) fn heading(&self, id: NodeId, level: u8) -> Result<Rendered> {
        let marker = "*".repeat(usize::from(level.min(MAX_HEADING_LEVEL)));
        let content = self.render_children(id, |c| self.render_node(c))?;
        Ok(Rendered::Fragment(format!("{marker} {content}")))
    }

    /// Source lines verbatim, each behind one space (PukiWiki preformatted
    /// text). Lines keep their own newlines.
    pub(super) fn code_block(&self, lines: &[Span]) -> Result<Rendered> {
        let mut out = String::new();
        for line in lines {
            out.push(' ');
            out.push_str(line.resolve(self.source)?);
        }
        Ok(Rendered::Fragment(out))
    }

    /// Quote every line. Lines that are already quoted only gain another
    /// `>`, so nesting reads `>> text` rather than `> > text`.
    pub(super) fn blockquote(&self, id: NodeId) -> Result<Rendered> {
        let content = self.render_children(id, |c| self.render_node(c))?;
        let quoted = process_lines(&content, |i, line| {
            if i == 0 && line.is_empty() {
                String::new()
            } else if line.starts_with('>') {
                format!(">{line}")
            } else {
                format!("> {line}")
            }
        });
        Ok(Rendered::Fragment(quoted))
    }

    /// Every child block of the item becomes a `+ `/`- ` entry. A nested list
    /// already carries its markers, so each of its lines repeats its first
    /// character instead, which is how PukiWiki spells list depth.
    pub(super) fn list_item(&self, id: NodeId) -> Result<Rendered> {
        let parent = self.doc.parent(id).ok_or(Error::OrphanListItem(id))?;
        let marker = match self.doc.get(parent)?.kind {
            NodeKind::List { start: Some(_) } => "+ ",
            NodeKind::List { start: None } => "- ",
            _ => return Err(Error::OrphanListItem(id)),
        };

        let content = self.render_children(id, |child| {
            let Some(fragment) = self.render_node(child)? else {
                return Ok(None);
            };
            if self.doc.get(child)?.kind.is_list() {
                Ok(Some(deepen_list(&fragment)))
            } else {
                Ok(Some(format!("{marker}{fragment}")))
            }
        })?;
        Ok(Rendered::Fragment(content))
    }
}

fn deepen_list(rendered: &str) -> String {
    process_lines(rendered, |_, line| match line.chars().next() {
        Some(first) => format!("{first}{line}"),
        None => String::new(),
    })
}

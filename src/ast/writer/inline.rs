use super::utils::escape_destination;
use super::{Renderer, Rendered};
use crate::ast::{NodeId, TextNode};
use crate::error::Result;

impl Renderer<'_> {
    /// `**strong**` becomes `'''strong'''`, `*em*` becomes `''em''`.
    pub(super) fn emphasis(&self, id: NodeId, level: u8) -> Result<Rendered> {
        let content = self.render_children(id, |c| self.render_node(c))?;
        let delim = if level >= 2 { "'''" } else { "''" };
        Ok(Rendered::Fragment(format!("{delim}{content}{delim}")))
    }

    pub(super) fn code_span(&self, id: NodeId) -> Result<Rendered> {
        let content = self.render_children(id, |c| self.render_node(c))?;
        Ok(Rendered::Fragment(format!("''{content}''")))
    }

    /// Link text is the plain text of the label; inline markup inside the
    /// label is dropped.
    pub(super) fn link(&self, id: NodeId, destination: &str) -> Result<Rendered> {
        let text = self.doc.plain_text(self.source, id)?;
        Ok(Rendered::Fragment(format!(
            "[[{}:{}]]",
            text,
            escape_destination(destination)
        )))
    }

    /// Alt text is not representable in `&ref`, so the children are never
    /// visited.
    pub(super) fn image(&self, destination: &str) -> Rendered {
        Rendered::Fragment(format!("&ref({});", escape_destination(destination)))
    }

    pub(super) fn text(&self, text: &TextNode) -> Result<Rendered> {
        let mut s = text.span.resolve(self.source)?.to_owned();
        if text.soft_break || text.hard_break {
            s.push('\n');
        }
        Ok(Rendered::Fragment(s))
    }
}

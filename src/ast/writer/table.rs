use super::utils::alignment_label;
use super::{Renderer, Rendered};
use crate::ast::{NodeId, NodeKind};
use crate::error::Result;
use pulldown_cmark::Alignment;
use tracing::warn;

impl Renderer<'_> {
    /// One line per row: `|cell|cell|` for body rows, `|cell|cell|h` for the
    /// header. Rows are joined by the tree walker; cells are walked here so
    /// the column index is known.
    pub(super) fn table(&self, id: NodeId, alignments: &[Alignment]) -> Result<Rendered> {
        let content = self.render_children(id, |row| self.table_row(row, alignments).map(Some))?;
        Ok(Rendered::Fragment(content))
    }

    fn table_row(&self, row: NodeId, alignments: &[Alignment]) -> Result<String> {
        let header = matches!(self.doc.get(row)?.kind, NodeKind::TableHeader);
        let mut out = String::new();
        let mut column = 0;
        for cell in self.doc.children(row) {
            let NodeKind::TableCell { alignment } = self.doc.get(cell)?.kind else {
                continue;
            };
            let align = match alignment {
                Alignment::None => column_alignment(alignments, column, cell),
                explicit => explicit,
            };
            column += 1;

            let content = self.render_node(cell)?.unwrap_or_default();
            out.push('|');
            if let Some(label) = alignment_label(align) {
                out.push_str(label);
                out.push(':');
            }
            out.push_str(&content);
        }
        out.push_str(if header { "|h" } else { "|" });
        Ok(out)
    }
}

fn column_alignment(alignments: &[Alignment], column: usize, cell: NodeId) -> Alignment {
    match alignments.get(column) {
        Some(align) => *align,
        None => {
            warn!(
                cell = %cell,
                column,
                columns = alignments.len(),
                "table cell beyond declared columns"
            );
            Alignment::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::Fixture;
    use super::*;

    #[test]
    fn header_and_body_rows() {
        let mut f = Fixture::new();
        let root = f.root();
        f.table(
            root,
            vec![Alignment::None, Alignment::Right],
            &[&["A", "B"], &["1", "2"]],
        );
        assert_eq!(f.render().unwrap(), "|A|RIGHT:B|h\n|1|RIGHT:2|\n");
    }

    #[test]
    fn every_alignment_label() {
        let mut f = Fixture::new();
        let root = f.root();
        f.table(
            root,
            vec![Alignment::Left, Alignment::Center, Alignment::Right, Alignment::None],
            &[&["a", "b", "c", "d"]],
        );
        assert_eq!(f.render().unwrap(), "|LEFT:a|CENTER:b|RIGHT:c|d|h\n");
    }

    #[test]
    fn cell_alignment_overrides_column() {
        let mut f = Fixture::new();
        let root = f.root();
        let table = f.node(
            root,
            NodeKind::Table {
                alignments: vec![Alignment::Left, Alignment::None],
            },
        );
        let row = f.node(table, NodeKind::TableRow);
        let c = f.node(
            row,
            NodeKind::TableCell {
                alignment: Alignment::Center,
            },
        );
        f.text(c, "x");
        let c = f.node(
            row,
            NodeKind::TableCell {
                alignment: Alignment::Right,
            },
        );
        f.text(c, "y");
        assert_eq!(f.render().unwrap(), "|CENTER:x|RIGHT:y|\n");
    }

    #[test]
    fn short_rows_omit_missing_columns() {
        let mut f = Fixture::new();
        let root = f.root();
        f.table(
            root,
            vec![Alignment::None, Alignment::Left, Alignment::Right],
            &[&["a", "b", "c"], &["1"]],
        );
        assert_eq!(f.render().unwrap(), "|a|LEFT:b|RIGHT:c|h\n|1|\n");
    }

    #[test]
    fn extra_cells_fall_back_to_no_alignment() {
        let mut f = Fixture::new();
        let root = f.root();
        f.table(root, vec![Alignment::Right], &[&["a", "b"]]);
        assert_eq!(f.render().unwrap(), "|RIGHT:a|b|h\n");
    }

    #[test]
    fn cells_render_inline_markup() {
        let mut f = Fixture::new();
        let root = f.root();
        let table = f.node(
            root,
            NodeKind::Table {
                alignments: vec![Alignment::None],
            },
        );
        let row = f.node(table, NodeKind::TableHeader);
        let cell = f.node(
            row,
            NodeKind::TableCell {
                alignment: Alignment::None,
            },
        );
        let strong = f.node(cell, NodeKind::Emphasis { level: 2 });
        f.text(strong, "k");
        assert_eq!(f.render().unwrap(), "|'''k'''|h\n");
    }
}

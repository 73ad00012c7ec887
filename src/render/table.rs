//! Rendering of tables as ASCII art.
//!
//! ```text
//! +-------+-----+
//! | Name  | Qty |
//! +=======+=====+
//! | apple | 3   |
//! +-------+-----+
//! ```

use std::cmp::max;

use unicode_width::UnicodeWidthStr;

use crate::dom::Element;
use crate::render::Rewriter;
use crate::rules::RuleInput;
use crate::{Error, Result};

/// Browsers clamp larger spans to this.
const MAX_COLSPAN: usize = 1000;

/// Text between two cells on a content line.
const CELL_SEPARATOR: &str = " | ";

/// Which part of the table a row came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// A row from `<thead>`.
    Header,
    /// A row from `<tbody>`, or directly inside the `<table>`.
    Body,
    /// A row from `<tfoot>`.
    Footer,
}

/// A table cell with its already-rendered text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCell {
    lines: Vec<String>,
    is_header: bool,
    colspan: usize,
}

impl TableCell {
    /// Create a cell.  A `colspan` of 0 means "the rest of the row".
    pub fn new(text: &str, is_header: bool, colspan: usize) -> TableCell {
        TableCell {
            lines: cell_lines(text),
            is_header,
            colspan: colspan.min(MAX_COLSPAN),
        }
    }

    fn empty() -> TableCell {
        TableCell::new("", false, 1)
    }

    /// The cell's text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True for a `<th>` cell.
    pub fn is_header(&self) -> bool {
        self.is_header
    }

    /// The number of columns this cell covers.
    pub fn colspan(&self) -> usize {
        self.colspan
    }

    /// The display width of the widest line.
    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|l| UnicodeWidthStr::width(l.as_str()))
            .max()
            .unwrap_or(0)
    }

    fn is_blank(&self) -> bool {
        self.lines
            .iter()
            .all(|l| l.replace("&nbsp;", "").trim().is_empty())
    }
}

/// A row of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<TableCell>,
    section: Section,
}

impl TableRow {
    /// Create a row.
    pub fn new(cells: Vec<TableCell>, section: Section) -> TableRow {
        TableRow { cells, section }
    }

    /// The cells, in order.
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    /// The section the row belongs to.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Count the number of cells in the row.
    /// Takes into account colspan.
    pub fn num_cells(&self) -> usize {
        self.cells.iter().map(|cell| cell.colspan.max(1)).sum()
    }

    /// Return an iterator over (column, &cell)s, which
    /// takes into account colspan.
    pub fn cell_columns(&self) -> impl Iterator<Item = (usize, &TableCell)> {
        self.cells.iter().scan(0, |colno, cell| {
            let start = *colno;
            *colno += cell.colspan;
            Some((start, cell))
        })
    }
}

/// All the rows of a table: header rows, then body rows, then footer rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableGrid {
    rows: Vec<TableRow>,
    num_columns: usize,
}

impl TableGrid {
    /// Build a grid from rows.  Rows without cells are dropped; it is an
    /// error for no rows to remain.
    pub fn new(rows: Vec<TableRow>) -> Result<TableGrid> {
        let mut rows: Vec<TableRow> = rows.into_iter().filter(|r| !r.cells.is_empty()).collect();
        if rows.is_empty() {
            return Err(Error::EmptyTable);
        }

        // colspan=0 stretches to the widest row.  Only the first such cell
        // in a row stretches; any others count as 1.
        let num_columns = rows.iter().map(TableRow::num_cells).max().unwrap_or(1);
        for row in &mut rows {
            let cols = row.num_cells();
            let mut stretched = false;
            for cell in &mut row.cells {
                if cell.colspan == 0 {
                    cell.colspan = if stretched {
                        1
                    } else {
                        // +1 because it was counted as 1 above
                        num_columns - cols + 1
                    };
                    stretched = true;
                }
            }
            let cols = row.num_cells();
            if cols < num_columns {
                row.cells
                    .extend(std::iter::repeat_with(TableCell::empty).take(num_columns - cols));
            }
        }

        Ok(TableGrid { rows, num_columns })
    }

    /// Collect the rows of a `<table>` element, rendering each cell's
    /// content with `rewriter`.
    pub fn from_element(table: &Element, rewriter: &Rewriter) -> Result<TableGrid> {
        let mut rows = Vec::new();
        for thead in table.child_elements_named(&["thead"]) {
            rows.extend(section_rows(thead, Section::Header, rewriter)?);
        }
        let mut bodies = table.child_elements_named(&["tbody"]).peekable();
        if bodies.peek().is_none() {
            rows.extend(section_rows(table, Section::Body, rewriter)?);
        }
        for tbody in bodies {
            rows.extend(section_rows(tbody, Section::Body, rewriter)?);
        }
        for tfoot in table.child_elements_named(&["tfoot"]) {
            rows.extend(section_rows(tfoot, Section::Footer, rewriter)?);
        }
        TableGrid::new(rows)
    }

    /// The rows, in section order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// The number of logical columns.
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// The width of each column: the widest single-column cell in it.
    /// A spanning cell which doesn't fit in its columns widens the last
    /// column it covers.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.num_columns];
        for row in &self.rows {
            for (colno, cell) in row.cell_columns() {
                if cell.colspan == 1 {
                    widths[colno] = max(widths[colno], cell.width());
                }
            }
        }
        for row in &self.rows {
            for (colno, cell) in row.cell_columns() {
                if cell.colspan > 1 {
                    let avail = span_width(&widths[colno..colno + cell.colspan]);
                    if cell.width() > avail {
                        widths[colno + cell.colspan - 1] += cell.width() - avail;
                    }
                }
            }
        }
        widths
    }

    /// Draw the table.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let row_widths: Vec<Vec<usize>> = self
            .rows
            .iter()
            .map(|row| {
                row.cell_columns()
                    .map(|(colno, cell)| span_width(&widths[colno..colno + cell.colspan]))
                    .collect()
            })
            .collect();

        // A table which starts with its footer is heavy on top.
        let top = if self.rows[0].section == Section::Footer {
            Border::Heavy
        } else {
            Border::Top
        };
        let mut lines = vec![divider(&self.rows[0], &row_widths[0], top)];
        for (i, row) in self.rows.iter().enumerate() {
            let height = row.cells.iter().map(|c| c.lines.len()).max().unwrap_or(0).max(1);
            for lineno in 0..height {
                let parts: Vec<String> = row
                    .cells
                    .iter()
                    .zip(&row_widths[i])
                    .map(|(cell, &width)| {
                        pad(cell.lines.get(lineno).map(String::as_str).unwrap_or(""), width)
                    })
                    .collect();
                lines.push(format!("| {} |", parts.join(CELL_SEPARATOR)));
            }
            let next_is_footer = self
                .rows
                .get(i + 1)
                .is_some_and(|r| r.section == Section::Footer);
            let border = if row.section != Section::Body || next_is_footer {
                Border::Heavy
            } else {
                Border::Row
            };
            lines.push(divider(row, &row_widths[i], border));
        }
        lines.join("\n")
    }
}

/// Split cell text into lines with tabs expanded, dropping blank lines at
/// either end and any indentation common to all lines.
fn cell_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .map(|l| l.replace('\t', "    ").trim_end().to_string())
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let first = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    lines.drain(..first);
    let indent = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);
    lines
        .into_iter()
        .map(|l| l.get(indent..).unwrap_or_default().to_string())
        .collect()
}

/// The content width of a cell covering columns of `widths`: the columns
/// plus the separators between them.
fn span_width(widths: &[usize]) -> usize {
    widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * CELL_SEPARATOR.len()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Border {
    /// Above the first row: always light.
    Top,
    /// Below a body row: heavy only under header cells.
    Row,
    /// Below header and footer rows, and above the footer.
    Heavy,
}

/// A horizontal border segmented like `row`'s cells.
fn divider(row: &TableRow, widths: &[usize], border: Border) -> String {
    let parts: Vec<String> = row
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let heavy = match border {
                Border::Top => false,
                Border::Row => cell.is_header,
                Border::Heavy => true,
            };
            (if heavy { "=" } else { "-" }).repeat(width + 2)
        })
        .collect();
    format!("+{}+", parts.join("+"))
}

fn section_rows(parent: &Element, section: Section, rewriter: &Rewriter) -> Result<Vec<TableRow>> {
    parent
        .child_elements_named(&["tr"])
        .map(|tr| parse_row(tr, section, rewriter))
        .collect()
}

fn parse_row(tr: &Element, section: Section, rewriter: &Rewriter) -> Result<TableRow> {
    let cells = tr
        .child_elements_named(&["th", "td"])
        .map(|cell| -> Result<TableCell> {
            let text = rewriter.render_children(cell)?;
            let colspan = cell
                .attr("colspan")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(1);
            Ok(TableCell::new(&text, cell.tag() == "th", colspan))
        })
        .collect::<Result<Vec<_>>>()?;
    let cells = if rewriter.options().merge_empty_cells {
        merge_empty_cells(cells)
    } else {
        cells
    };
    Ok(TableRow::new(cells, section))
}

/// Fold blank cells into the span of the content cell before them (or,
/// at the start of a row, the one after).
fn merge_empty_cells(cells: Vec<TableCell>) -> Vec<TableCell> {
    let mut merged: Vec<TableCell> = Vec::with_capacity(cells.len());
    let mut leading = 0;
    for mut cell in cells {
        let span = cell.colspan.max(1);
        if cell.is_blank() {
            match merged.last_mut() {
                // A colspan=0 cell already covers the rest of the row.
                Some(prev) if prev.colspan == 0 => {}
                Some(prev) => prev.colspan += span,
                None => leading += span,
            }
        } else {
            if leading > 0 {
                cell.colspan = span + leading;
                leading = 0;
            }
            merged.push(cell);
        }
    }
    if merged.is_empty() && leading > 0 {
        merged.push(TableCell::new("", false, leading));
    }
    merged
}

/// The `table` formatter.
pub fn table_to_text(input: &RuleInput<'_>) -> Result<String> {
    let grid = TableGrid::from_element(input.element(), input.rewriter())?;
    html_trace!(
        "Table with {} rows, {} columns",
        grid.rows().len(),
        grid.num_columns()
    );
    Ok(grid.render())
}

#[cfg(test)]
mod tests {
    use super::{merge_empty_cells, Section, TableCell, TableGrid, TableRow};
    use crate::Error;

    fn row(cells: &[(&str, usize)], section: Section) -> TableRow {
        TableRow::new(
            cells
                .iter()
                .map(|&(t, span)| TableCell::new(t, section == Section::Header, span))
                .collect(),
            section,
        )
    }

    #[test]
    fn test_column_widths_per_column() {
        let grid = TableGrid::new(vec![
            row(&[("a", 1), ("bbbb", 1)], Section::Body),
            row(&[("ccc", 1), ("d", 1)], Section::Body),
        ])
        .unwrap();
        assert_eq!(grid.column_widths(), vec![3, 4]);
    }

    #[test]
    fn test_spanned_cell_widens_last_column() {
        let grid = TableGrid::new(vec![
            row(&[("a", 1), ("b", 1)], Section::Body),
            row(&[("a long merged cell", 2)], Section::Body),
        ])
        .unwrap();
        // 1 + 3 + x == 18
        assert_eq!(grid.column_widths(), vec![1, 14]);
    }

    #[test]
    fn test_colspan_zero_fills_row() {
        let grid = TableGrid::new(vec![
            row(&[("a", 1), ("b", 1), ("c", 1)], Section::Body),
            row(&[("x", 1), ("rest", 0)], Section::Body),
        ])
        .unwrap();
        assert_eq!(grid.rows()[1].cells()[1].colspan(), 2);
    }

    #[test]
    fn test_only_first_colspan_zero_stretches() {
        let grid = TableGrid::new(vec![
            row(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)], Section::Body),
            row(&[("x", 0), ("y", 0)], Section::Body),
        ])
        .unwrap();
        let spans: Vec<_> = grid.rows()[1].cells().iter().map(TableCell::colspan).collect();
        assert_eq!(spans, vec![3, 1]);
        assert_eq!(grid.column_widths(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_short_rows_padded() {
        let grid = TableGrid::new(vec![
            row(&[("a", 1), ("b", 1), ("c", 1)], Section::Body),
            row(&[("x", 1)], Section::Body),
        ])
        .unwrap();
        assert_eq!(grid.num_columns(), 3);
        assert_eq!(grid.rows()[1].num_cells(), 3);
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(TableGrid::new(vec![]), Err(Error::EmptyTable));
        assert_eq!(
            TableGrid::new(vec![TableRow::new(vec![], Section::Body)]),
            Err(Error::EmptyTable)
        );
    }

    #[test]
    fn test_merge_empty_cells() {
        let cells = vec![
            TableCell::new("\u{a0}", false, 1),
            TableCell::new("a", false, 1),
            TableCell::new("  ", false, 1),
            TableCell::new("&nbsp;", false, 2),
            TableCell::new("b", false, 1),
        ];
        let merged = merge_empty_cells(cells);
        let spans: Vec<_> = merged.iter().map(|c| (c.text(), c.colspan())).collect();
        assert_eq!(spans, vec![("a".to_string(), 5), ("b".to_string(), 1)]);
    }

    #[test]
    fn test_merge_keeps_rest_of_row() {
        let merged = merge_empty_cells(vec![
            TableCell::new("x", false, 0),
            TableCell::new(" ", false, 1),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].colspan(), 0);
    }

    #[test]
    fn test_multiline_cell() {
        let grid = TableGrid::new(vec![row(&[("one\ntwo", 1), ("x", 1)], Section::Body)]).unwrap();
        assert_eq!(
            grid.render(),
            "\
+-----+---+
| one | x |
| two |   |
+-----+---+"
        );
    }
}

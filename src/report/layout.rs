//! Page layout: title block, column grid and pagination.
//!
//! All coordinates are in points measured from the top-left corner of the
//! page; the PDF writer flips them.

use crate::error::RenderError;
use crate::report::fonts::{sanitize, text_width, wrap_text};
use crate::report::table::{CellStyle, ReportTable};

pub const TITLE_FONT_SIZE: f32 = 18.0;
pub const TITLE_LEADING: f32 = 22.0;
pub const SUBTITLE_FONT_SIZE: f32 = 9.0;
pub const SUBTITLE_LEADING: f32 = 11.0;
/// Gap between title block and table
const TITLE_SPACE_AFTER: f32 = 32.0;
pub const CELL_FONT_SIZE: f32 = 10.0;
pub const CELL_LEADING: f32 = 12.0;
pub const CELL_PADDING: f32 = 6.0;
pub const FOOTER_FONT_SIZE: f32 = 8.0;
/// Side of the square marker in prediction cells, plus the gap after it
pub const INDICATOR_SIZE: f32 = 6.0;
pub const INDICATOR_GAP: f32 = 3.0;
/// Marks a cell cut short to fit the page
const ELLIPSIS: &str = "...";

/// Page size and margins, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with one-inch margins
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 72.0,
    };

    /// A4 landscape with one-inch margins
    pub const A4_LANDSCAPE: PageGeometry = PageGeometry {
        width: 841.89,
        height: 595.28,
        margin: 72.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn content_bottom(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::A4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    /// Index into the table's body rows
    Body(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutCell {
    pub x: f32,
    pub width: f32,
    pub lines: Vec<String>,
    pub style: CellStyle,
    pub bold: bool,
}

impl LaidOutCell {
    /// Baselines of each line, vertically centred in a row.
    pub fn baselines(&self, row_top: f32, row_height: f32) -> Vec<f32> {
        let text_height = self.lines.len() as f32 * CELL_LEADING;
        let offset = ((row_height - 2.0 * CELL_PADDING) - text_height).max(0.0) / 2.0;
        (0..self.lines.len())
            .map(|i| row_top + CELL_PADDING + offset + i as f32 * CELL_LEADING + CELL_FONT_SIZE)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutRow {
    pub kind: RowKind,
    pub top: f32,
    pub height: f32,
    pub cells: Vec<LaidOutCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleBlock {
    pub lines: Vec<String>,
    pub subtitle: Option<String>,
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 1-based
    pub number: usize,
    pub title: Option<TitleBlock>,
    pub rows: Vec<LaidOutRow>,
}

impl PageLayout {
    pub fn body_rows(&self) -> impl Iterator<Item = &LaidOutRow> {
        self.rows.iter().filter(|row| matches!(row.kind, RowKind::Body(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub geometry: PageGeometry,
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Body row indices in the order they are placed across pages
    pub fn body_row_indices(&self) -> Vec<usize> {
        self.pages
            .iter()
            .flat_map(|page| page.rows.iter())
            .filter_map(|row| match row.kind {
                RowKind::Body(idx) => Some(idx),
                RowKind::Header => None,
            })
            .collect()
    }

    pub fn footer_text(&self, page: &PageLayout) -> String {
        format!("Page {} of {}", page.number, self.pages.len())
    }
}

/// Lines of cell text that fit in a row of `height` points (at least one)
fn lines_fitting(height: f32) -> usize {
    ((height - 2.0 * CELL_PADDING) / CELL_LEADING).floor().max(1.0) as usize
}

/// Keep at most `max_lines`, ending the last kept line with an ellipsis.
fn cap_lines(mut lines: Vec<String>, max_lines: usize, max_width: f32, bold: bool) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        while !last.is_empty()
            && text_width(&format!("{}{}", last, ELLIPSIS), CELL_FONT_SIZE, bold) > max_width
        {
            last.pop();
        }
        last.push_str(ELLIPSIS);
    }
    lines
}

fn lay_out_row(
    kind: RowKind,
    texts: impl Iterator<Item = (String, CellStyle)>,
    column_width: f32,
    geometry: &PageGeometry,
    bold: bool,
    max_lines: usize,
) -> LaidOutRow {
    let cells: Vec<LaidOutCell> = texts
        .enumerate()
        .map(|(idx, (text, style))| {
            let mut wrap_width = column_width - 2.0 * CELL_PADDING;
            if style.indicator().is_some() {
                wrap_width -= INDICATOR_SIZE + INDICATOR_GAP;
            }
            let wrap_width = wrap_width.max(1.0);
            let lines = wrap_text(&sanitize(&text), wrap_width, CELL_FONT_SIZE, bold);
            LaidOutCell {
                x: geometry.margin + idx as f32 * column_width,
                width: column_width,
                lines: cap_lines(lines, max_lines, wrap_width, bold),
                style,
                bold,
            }
        })
        .collect();

    let max_lines = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1);
    LaidOutRow {
        kind,
        top: 0.0,
        height: max_lines as f32 * CELL_LEADING + 2.0 * CELL_PADDING,
        cells,
    }
}

/// Lay out `table` over as many pages as needed.
///
/// The title appears on the first page only; the header row is repeated at
/// the top of every page. Rows are never split: cells are cut to the lines
/// that fit below the title and header, so every row fits on any page.
pub fn layout(
    table: &ReportTable,
    title: &str,
    subtitle: Option<&str>,
    geometry: PageGeometry,
) -> Result<ReportLayout, RenderError> {
    if table.rows.is_empty() {
        return Err(RenderError::EmptyReport);
    }

    let column_width = geometry.content_width() / table.column_count().max(1) as f32;
    let bottom = geometry.content_bottom();

    let title_lines = wrap_text(&sanitize(title), geometry.content_width(), TITLE_FONT_SIZE, true);
    let mut cursor = geometry.margin + title_lines.len() as f32 * TITLE_LEADING;
    if subtitle.is_some() {
        cursor += SUBTITLE_LEADING;
    }
    cursor += TITLE_SPACE_AFTER;

    // First page has the least room; sizing against it fits every page
    let room = bottom - cursor;
    let header = lay_out_row(
        RowKind::Header,
        table.headers.iter().map(|h| (h.clone(), CellStyle::Plain)),
        column_width,
        &geometry,
        true,
        lines_fitting(room / 2.0),
    );
    let body_max_lines = lines_fitting(room - header.height);

    let mut pages = Vec::new();
    let mut page = PageLayout {
        number: 1,
        title: Some(TitleBlock {
            lines: title_lines,
            subtitle: subtitle.map(sanitize),
            top: geometry.margin,
        }),
        rows: Vec::new(),
    };

    let place = |page: &mut PageLayout, mut row: LaidOutRow, cursor: &mut f32| {
        row.top = *cursor;
        *cursor += row.height;
        page.rows.push(row);
    };

    place(&mut page, header.clone(), &mut cursor);

    for (idx, cells) in table.rows.iter().enumerate() {
        let row = lay_out_row(
            RowKind::Body(idx),
            cells.iter().map(|c| (c.text.clone(), c.style)),
            column_width,
            &geometry,
            false,
            body_max_lines,
        );

        let page_has_body = page.rows.len() > 1;
        if cursor + row.height > bottom && page_has_body {
            let number = page.number + 1;
            pages.push(std::mem::replace(
                &mut page,
                PageLayout {
                    number,
                    title: None,
                    rows: Vec::new(),
                },
            ));
            cursor = geometry.margin;
            place(&mut page, header.clone(), &mut cursor);
        }

        place(&mut page, row, &mut cursor);
    }
    pages.push(page);

    Ok(ReportLayout { geometry, pages })
}

/// Horizontal start of `line` centred in a cell, leaving room for a marker.
pub fn centered_x(cell: &LaidOutCell, line: &str) -> f32 {
    let marker = if cell.style.indicator().is_some() {
        INDICATOR_SIZE + INDICATOR_GAP
    } else {
        0.0
    };
    let content = marker + text_width(line, CELL_FONT_SIZE, cell.bold);
    cell.x + ((cell.width - content) / 2.0).max(CELL_PADDING) + marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::ReportCell;
    use crate::types::PredictionLabel;

    fn table(rows: usize) -> ReportTable {
        ReportTable {
            headers: vec!["Type".into(), "Amount".into(), "Prediction Result".into()],
            rows: (0..rows)
                .map(|i| {
                    vec![
                        ReportCell {
                            text: "Payment".into(),
                            style: CellStyle::Plain,
                        },
                        ReportCell {
                            text: format!("{}", i),
                            style: CellStyle::Plain,
                        },
                        ReportCell {
                            text: "Legitimate".into(),
                            style: CellStyle::Prediction(PredictionLabel::Legitimate),
                        },
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_row_fits_one_page() {
        let layout = layout(&table(1), "Fraud Detection Report", None, PageGeometry::A4).unwrap();
        assert_eq!(layout.page_count(), 1);
        let page = &layout.pages[0];
        assert!(page.title.is_some());
        assert_eq!(page.rows[0].kind, RowKind::Header);
        assert_eq!(page.rows[1].kind, RowKind::Body(0));
        assert!(page.rows[1].top >= page.rows[0].top + page.rows[0].height);
    }

    #[test]
    fn test_header_repeats_on_every_page() {
        let layout = layout(&table(500), "Report", Some("Generated now"), PageGeometry::A4).unwrap();
        assert!(layout.page_count() > 1);

        for page in &layout.pages {
            assert_eq!(page.rows[0].kind, RowKind::Header);
            assert!(page.body_rows().count() > 0);
            let last = page.rows.last().unwrap();
            assert!(last.top + last.height <= PageGeometry::A4.height - PageGeometry::A4.margin);
        }
        assert!(layout.pages[1..].iter().all(|p| p.title.is_none()));
    }

    #[test]
    fn test_every_row_placed_once_in_order() {
        let layout = layout(&table(1234), "Report", None, PageGeometry::A4).unwrap();
        assert_eq!(layout.body_row_indices(), (0..1234).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(
            layout(&table(0), "Report", None, PageGeometry::A4),
            Err(RenderError::EmptyReport)
        ));
    }

    #[test]
    fn test_columns_share_content_width() {
        let layout = layout(&table(1), "Report", None, PageGeometry::A4).unwrap();
        let header = &layout.pages[0].rows[0];
        let total: f32 = header.cells.iter().map(|c| c.width).sum();
        assert!((total - PageGeometry::A4.content_width()).abs() < 0.01);
        assert_eq!(header.cells[0].x, PageGeometry::A4.margin);
    }

    #[test]
    fn test_oversized_cell_is_cut_to_fit_page() {
        let mut table = table(3);
        table.rows[1][1].text = "note ".repeat(800);

        let layout = layout(&table, "Report", Some("Generated now"), PageGeometry::A4).unwrap();
        let bottom = PageGeometry::A4.height - PageGeometry::A4.margin;
        for page in &layout.pages {
            for row in &page.rows {
                assert!(row.top + row.height <= bottom);
            }
        }

        assert_eq!(layout.body_row_indices(), vec![0, 1, 2]);
        let row = layout
            .pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .find(|r| r.kind == RowKind::Body(1))
            .unwrap();
        assert!(row.cells[1].lines.last().unwrap().ends_with("..."));
        assert_eq!(row.cells[2].lines, vec!["Legitimate".to_string()]);
        for line in &row.cells[1].lines {
            assert!(text_width(line, CELL_FONT_SIZE, false) <= row.cells[1].width - 2.0 * CELL_PADDING);
        }
    }

    #[test]
    fn test_cap_lines_leaves_short_cells_alone() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(cap_lines(lines.clone(), 2, 100.0, false), lines);
        assert_eq!(cap_lines(lines, 1, 100.0, false), vec!["a...".to_string()]);
    }

    #[test]
    fn test_footer_text() {
        let layout = layout(&table(500), "Report", None, PageGeometry::A4).unwrap();
        let last = layout.pages.last().unwrap();
        assert_eq!(
            layout.footer_text(last),
            format!("Page {} of {}", layout.page_count(), layout.page_count())
        );
    }
}

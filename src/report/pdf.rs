//! PDF writer for a laid-out report

use crate::error::RenderError;
use crate::report::fonts::text_width;
use crate::report::layout::{
    centered_x, LaidOutRow, PageLayout, ReportLayout, RowKind, CELL_FONT_SIZE, FOOTER_FONT_SIZE,
    INDICATOR_GAP, INDICATOR_SIZE, SUBTITLE_FONT_SIZE, TITLE_FONT_SIZE, TITLE_LEADING,
};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect, Rgb,
};

const HEADER_BACKGROUND: (f32, f32, f32) = (0.678, 0.847, 0.902);
const GRID_GREY: (f32, f32, f32) = (0.5, 0.5, 0.5);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GRID_THICKNESS: f32 = 0.5;

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Draws one page, flipping top-down layout coordinates to PDF space.
struct PageCanvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f32,
}

impl PageCanvas<'_> {
    fn y(&self, top: f32) -> Mm {
        mm(self.page_height - top)
    }

    fn text(&self, text: &str, size: f32, x: f32, baseline: f32, bold: bool, color: (f32, f32, f32)) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(text, size, mm(x), self.y(baseline), font);
    }

    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, color: (f32, f32, f32)) {
        self.layer.set_fill_color(rgb(color));
        let rect = Rect::new(mm(x), self.y(top + height), mm(x + width), self.y(top))
            .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    fn stroke_rect(&self, x: f32, top: f32, width: f32, height: f32) {
        self.layer.set_outline_color(rgb(GRID_GREY));
        self.layer.set_outline_thickness(GRID_THICKNESS);
        let corners = [
            (x, top),
            (x + width, top),
            (x + width, top + height),
            (x, top + height),
        ];
        let line = Line {
            points: corners
                .iter()
                .map(|&(px, py)| (Point::new(mm(px), self.y(py)), false))
                .collect(),
            is_closed: true,
        };
        self.layer.add_line(line);
    }

    fn draw_row(&self, row: &LaidOutRow, header: bool) {
        if header {
            if let (Some(first), Some(last)) = (row.cells.first(), row.cells.last()) {
                let width = last.x + last.width - first.x;
                self.fill_rect(first.x, row.top, width, row.height, HEADER_BACKGROUND);
            }
        }

        for cell in &row.cells {
            self.stroke_rect(cell.x, row.top, cell.width, row.height);

            let color = cell.style.indicator().map(|c| c.rgb()).unwrap_or(BLACK);
            let baselines = cell.baselines(row.top, row.height);

            for (line, &baseline) in cell.lines.iter().zip(&baselines) {
                let x = centered_x(cell, line);
                if cell.style.indicator().is_some() {
                    let marker_top = baseline - CELL_FONT_SIZE * 0.7;
                    self.fill_rect(
                        x - INDICATOR_GAP - INDICATOR_SIZE,
                        marker_top,
                        INDICATOR_SIZE,
                        INDICATOR_SIZE,
                        color,
                    );
                }
                self.text(line, CELL_FONT_SIZE, x, baseline, cell.bold, color);
            }
        }
    }

    fn draw_page(&self, layout: &ReportLayout, page: &PageLayout) {
        let geometry = layout.geometry;

        if let Some(title) = &page.title {
            let mut baseline = title.top;
            for line in &title.lines {
                baseline += TITLE_LEADING;
                let x = (geometry.width - text_width(line, TITLE_FONT_SIZE, true)) / 2.0;
                self.text(line, TITLE_FONT_SIZE, x, baseline - 4.0, true, BLACK);
            }
            if let Some(subtitle) = &title.subtitle {
                baseline += SUBTITLE_FONT_SIZE + 2.0;
                let x = (geometry.width - text_width(subtitle, SUBTITLE_FONT_SIZE, false)) / 2.0;
                self.text(subtitle, SUBTITLE_FONT_SIZE, x, baseline, false, GRID_GREY);
            }
        }

        for row in &page.rows {
            self.draw_row(row, row.kind == RowKind::Header);
        }

        let footer = layout.footer_text(page);
        let x = (geometry.width - text_width(&footer, FOOTER_FONT_SIZE, false)) / 2.0;
        let baseline = geometry.height - geometry.margin / 2.0;
        self.text(&footer, FOOTER_FONT_SIZE, x, baseline, false, GRID_GREY);
    }
}

/// Serialize `layout` into a PDF held in memory.
pub fn write_pdf(layout: &ReportLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let geometry = layout.geometry;
    let (width, height) = (mm(geometry.width), mm(geometry.height));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Report");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(format!("{:?}", e)))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(format!("{:?}", e)))?,
    };

    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, "Report");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        let canvas = PageCanvas {
            layer,
            fonts: &fonts,
            page_height: geometry.height,
        };
        canvas.draw_page(layout, page);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{layout, PageGeometry};
    use crate::report::table::{CellStyle, ReportCell, ReportTable};
    use crate::types::PredictionLabel;

    #[test]
    fn test_write_pdf_produces_document() {
        let table = ReportTable {
            headers: vec!["Amount".into(), "Prediction Result".into()],
            rows: vec![vec![
                ReportCell {
                    text: "1000".into(),
                    style: CellStyle::Plain,
                },
                ReportCell {
                    text: "Fraudulent".into(),
                    style: CellStyle::Prediction(PredictionLabel::Fraud),
                },
            ]],
        };
        let layout = layout(&table, "Fraud Detection Report", Some("Generated today"), PageGeometry::A4).unwrap();
        let bytes = write_pdf(&layout, "Fraud Detection Report").unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }
}

//! Plain-text preview of the first labelled rows, for terminals

use crate::report::table::ReportTable;
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 24;

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        clipped.push('…');
        clipped
    }
}

/// Render up to `limit` body rows as an aligned text table.
pub fn render_preview(table: &ReportTable, limit: usize) -> String {
    let shown = table.rows.len().min(limit);

    let headers: Vec<String> = table.headers.iter().map(|h| clip(h)).collect();
    let rows: Vec<Vec<String>> = table.rows[..shown]
        .iter()
        .map(|row| row.iter().map(|cell| clip(&cell.text)).collect())
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let format_line = |cells: &[String], out: &mut String| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
    };

    format_line(&headers, &mut out);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        format_line(row, &mut out);
    }

    if table.rows.len() > shown {
        let _ = writeln!(out, "... {} more row(s)", table.rows.len() - shown);
    }

    out
}

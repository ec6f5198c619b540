//! Report rendering: labelled batch -> styled, paginated PDF
//!
//! Rendering runs in three steps:
//! - [`table`] maps records to display cells (header names, prediction styling)
//! - [`layout`] wraps text and paginates, repeating the header row per page
//! - [`pdf`] writes the laid-out pages into an in-memory document

pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod preview;
pub mod table;

use crate::error::RenderError;
use crate::types::LabeledBatch;
use chrono::{DateTime, Utc};
use layout::PageGeometry;
use std::io;
use std::path::{Path, PathBuf};
use table::ReportTable;
use tracing::debug;

pub use preview::render_preview;
pub use table::{CellStyle, IndicatorColor};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Tables wider than this switch to landscape pages
const PORTRAIT_MAX_COLUMNS: usize = 8;

/// A finished document plus what the caller needs to offer it as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

impl RenderedDocument {
    /// Write to `path`, creating parent directories.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.bytes)?;
        Ok(path.to_path_buf())
    }

    /// Write into `dir` under the suggested filename.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> io::Result<PathBuf> {
        self.write_to_path(dir.as_ref().join(&self.filename))
    }
}

/// Title, filename and optional timestamp for one report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub filename: String,
    pub generated_at: Option<DateTime<Utc>>,
}

impl ReportOptions {
    pub fn new(title: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
            generated_at: None,
        }
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    fn subtitle(&self) -> Option<String> {
        self.generated_at
            .map(|at| format!("Generated {}", at.format("%Y-%m-%d %H:%M UTC")))
    }
}

/// Stateless PDF renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    geometry: Option<PageGeometry>,
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self { geometry: None }
    }

    /// Fix the page geometry instead of choosing by column count.
    pub fn with_geometry(geometry: PageGeometry) -> Self {
        Self {
            geometry: Some(geometry),
        }
    }

    fn geometry_for(&self, table: &ReportTable) -> PageGeometry {
        self.geometry.unwrap_or(if table.column_count() > PORTRAIT_MAX_COLUMNS {
            PageGeometry::A4_LANDSCAPE
        } else {
            PageGeometry::A4
        })
    }

    /// Lay out `batch` without producing bytes.
    pub fn layout(&self, batch: &LabeledBatch, options: &ReportOptions) -> Result<layout::ReportLayout, RenderError> {
        if batch.is_empty() {
            return Err(RenderError::EmptyReport);
        }
        let table = ReportTable::from_batch(batch);
        layout::layout(
            &table,
            &options.title,
            options.subtitle().as_deref(),
            self.geometry_for(&table),
        )
    }

    /// Render `batch` into a PDF document.
    pub fn render(&self, batch: &LabeledBatch, options: &ReportOptions) -> Result<RenderedDocument, RenderError> {
        let layout = self.layout(batch, options)?;
        let bytes = pdf::write_pdf(&layout, &options.title)?;

        debug!(
            rows = batch.len(),
            pages = layout.page_count(),
            bytes = bytes.len(),
            "Report rendered"
        );

        Ok(RenderedDocument {
            bytes,
            filename: options.filename.clone(),
            content_type: PDF_CONTENT_TYPE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchColumn, LabeledRecord, PredictionLabel, RecordBatch, TransactionRecord, TransactionType};
    use chrono::TimeZone;

    fn batch(labels: &[PredictionLabel], extra_columns: usize) -> LabeledBatch {
        let record = TransactionRecord {
            tx_type: TransactionType::Deposit,
            amount: 10.0,
            old_balance_sender: 10.0,
            new_balance_sender: 0.0,
            old_balance_receiver: 0.0,
            new_balance_receiver: 10.0,
        };
        let mut columns = RecordBatch::single(record.clone()).columns;
        for slot in 0..extra_columns {
            columns.push(BatchColumn::Passthrough {
                name: format!("extra{}", slot),
                slot,
            });
        }
        LabeledBatch {
            columns,
            records: labels
                .iter()
                .map(|&label| LabeledRecord::new(record.clone(), vec!["v".to_string(); extra_columns], label))
                .collect(),
        }
    }

    #[test]
    fn test_render_sets_download_metadata() {
        let doc = ReportRenderer::new()
            .render(
                &batch(&[PredictionLabel::Legitimate], 0),
                &ReportOptions::new("Fraud Detection Report", "fraud_report.pdf"),
            )
            .unwrap();
        assert_eq!(doc.filename, "fraud_report.pdf");
        assert_eq!(doc.content_type, "application/pdf");
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_batch_is_a_render_error() {
        let err = ReportRenderer::new()
            .render(&batch(&[], 0), &ReportOptions::new("t", "f.pdf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyReport));
    }

    #[test]
    fn test_wide_tables_use_landscape() {
        let options = ReportOptions::new("t", "f.pdf");
        let narrow = ReportRenderer::new()
            .layout(&batch(&[PredictionLabel::Fraud], 0), &options)
            .unwrap();
        let wide = ReportRenderer::new()
            .layout(&batch(&[PredictionLabel::Fraud], 3), &options)
            .unwrap();
        assert_eq!(narrow.geometry, PageGeometry::A4);
        assert_eq!(wide.geometry, PageGeometry::A4_LANDSCAPE);
    }

    #[test]
    fn test_timestamp_subtitle() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let options = ReportOptions::new("t", "f.pdf").generated_at(at);
        let layout = ReportRenderer::new()
            .layout(&batch(&[PredictionLabel::Fraud], 0), &options)
            .unwrap();
        let title = layout.pages[0].title.as_ref().unwrap();
        assert_eq!(title.subtitle.as_deref(), Some("Generated 2026-10-19 08:30 UTC"));
    }

    #[test]
    fn test_write_to_dir_uses_suggested_filename() {
        let dir = tempfile::tempdir().unwrap();
        let doc = RenderedDocument {
            bytes: b"%PDF-1.3".to_vec(),
            filename: "fraud_predictions.pdf".to_string(),
            content_type: PDF_CONTENT_TYPE,
        };
        let path = doc.write_to(dir.path().join("reports")).unwrap();
        assert_eq!(path, dir.path().join("reports").join("fraud_predictions.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.3");
    }
}

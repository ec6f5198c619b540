//! End-to-end orchestration: normalize -> validate -> coerce -> predict -> render
//!
//! A single entry and a bulk upload take the same path; the single entry is
//! the one-row case of the batch. Every run either yields a complete
//! document or a typed error, never a partial report.

use crate::config::ReportConfig;
use crate::error::PipelineError;
use crate::metrics::{PipelineMetrics, Stage};
use crate::models::{label_batch, Classifier};
use crate::report::{RenderedDocument, ReportOptions, ReportRenderer};
use crate::schema::{check_record, coerce, normalize, validate};
use crate::types::{LabeledBatch, PredictionLabel, RawTable, RecordBatch, TransactionRecord};
use chrono::Utc;
use std::io::Read;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub labeled: LabeledBatch,
    pub report: RenderedDocument,
}

impl PipelineOutput {
    /// Label of the first row; the verdict for single-entry runs
    pub fn first_label(&self) -> Option<PredictionLabel> {
        self.labeled.records.first().map(|r| r.prediction)
    }
}

/// Reentrant pipeline bound to one classifier.
///
/// Holds no per-run state, so one instance can serve any number of
/// sequential or concurrent runs.
pub struct ReportPipeline<'a> {
    classifier: &'a dyn Classifier,
    renderer: ReportRenderer,
    report: ReportConfig,
    metrics: Option<Arc<PipelineMetrics>>,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(classifier: &'a dyn Classifier, report: ReportConfig) -> Self {
        Self {
            classifier,
            renderer: ReportRenderer::new(),
            report,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_renderer(mut self, renderer: ReportRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Bulk upload: comma-separated text with a header row.
    pub fn process_csv<R: Read>(&self, reader: R) -> Result<PipelineOutput, PipelineError> {
        self.observe(|| {
            let table = RawTable::from_csv_reader(reader)?;
            debug!(
                columns = table.columns.len(),
                rows = table.row_count(),
                "Input parsed"
            );
            let batch = self.prepare(table)?;
            self.finish(batch, &self.report.batch_filename)
        })
    }

    /// Bulk run over an already-parsed table.
    pub fn process_table(&self, table: RawTable) -> Result<PipelineOutput, PipelineError> {
        self.observe(|| {
            let batch = self.prepare(table)?;
            self.finish(batch, &self.report.batch_filename)
        })
    }

    /// Single entry built by the caller (form fields, CLI flags).
    pub fn process_record(&self, record: TransactionRecord) -> Result<PipelineOutput, PipelineError> {
        self.observe(|| {
            self.timed(Stage::Coerce, || check_record(&record))?;
            self.finish(RecordBatch::single(record), &self.report.single_filename)
        })
    }

    /// Normalize, validate and coerce a raw table.
    pub fn prepare(&self, table: RawTable) -> Result<RecordBatch, PipelineError> {
        let table = self.timed(Stage::Normalize, || normalize(table));
        let validated = self.timed(Stage::Validate, || validate(table))?;
        let batch = self.timed(Stage::Coerce, || coerce(&validated))?;
        debug!(rows = batch.len(), columns = batch.columns.len(), "Batch validated");
        Ok(batch)
    }

    fn finish(&self, batch: RecordBatch, filename: &str) -> Result<PipelineOutput, PipelineError> {
        let labeled = self.timed(Stage::Predict, || label_batch(self.classifier, batch))?;

        let mut options = ReportOptions::new(self.report.title.clone(), filename);
        if self.report.timestamp {
            options = options.generated_at(Utc::now());
        }
        let report = self.timed(Stage::Render, || self.renderer.render(&labeled, &options))?;

        if let Some(metrics) = &self.metrics {
            metrics.record_batch(labeled.len(), labeled.fraud_count());
        }

        info!(
            rows = labeled.len(),
            fraud = labeled.fraud_count(),
            filename = %report.filename,
            bytes = report.bytes.len(),
            "Report generated"
        );

        Ok(PipelineOutput { labeled, report })
    }

    fn timed<T>(&self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        if let Some(metrics) = &self.metrics {
            metrics.record_stage(stage, start.elapsed());
        }
        out
    }

    fn observe(
        &self,
        run: impl FnOnce() -> Result<PipelineOutput, PipelineError>,
    ) -> Result<PipelineOutput, PipelineError> {
        run().map_err(|e| {
            warn!(kind = e.kind(), error = %e, "Pipeline run failed");
            if let Some(metrics) = &self.metrics {
                metrics.record_failure(e.kind());
            }
            e
        })
    }
}

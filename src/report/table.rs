//! Display table: headers and styled cells derived from a labelled batch

use crate::types::{BatchColumn, LabeledBatch, PredictionLabel};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical field name -> report header
static COLUMN_DISPLAY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("type", "Type"),
        ("amount", "Amount"),
        ("oldBalanceSender", "Old Balance (Sender)"),
        ("newBalanceSender", "New Balance (Sender)"),
        ("oldBalanceReceiver", "Old Balance (Receiver)"),
        ("newBalanceReceiver", "New Balance (Receiver)"),
        (PREDICTION_COLUMN, "Prediction Result"),
    ])
});

pub const PREDICTION_COLUMN: &str = "prediction";

/// Header text for a canonical field or the prediction column; unknown
/// names are shown as given.
pub fn display_name(column: &str) -> &str {
    COLUMN_DISPLAY_NAMES.get(column).copied().unwrap_or(column)
}

/// Colour of the marker drawn in prediction cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Red,
    Green,
}

impl IndicatorColor {
    /// RGB components in 0..=1
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            IndicatorColor::Red => (1.0, 0.0, 0.0),
            IndicatorColor::Green => (0.0, 0.502, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Prediction(PredictionLabel),
}

impl CellStyle {
    pub fn indicator(self) -> Option<IndicatorColor> {
        match self {
            CellStyle::Plain => None,
            CellStyle::Prediction(PredictionLabel::Fraud) => Some(IndicatorColor::Red),
            CellStyle::Prediction(PredictionLabel::Legitimate) => Some(IndicatorColor::Green),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub text: String,
    pub style: CellStyle,
}

impl ReportCell {
    fn plain(text: String) -> Self {
        Self {
            text,
            style: CellStyle::Plain,
        }
    }

    fn prediction(label: PredictionLabel) -> Self {
        Self {
            text: label.report_text().to_string(),
            style: CellStyle::Prediction(label),
        }
    }
}

/// Header row plus one body row per labelled record, prediction last.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportTable {
    pub fn from_batch(batch: &LabeledBatch) -> Self {
        let headers = batch
            .columns
            .iter()
            .map(|column| match column {
                BatchColumn::Field(field) => display_name(field.as_str()).to_string(),
                BatchColumn::Passthrough { name, .. } => name.clone(),
            })
            .chain(std::iter::once(display_name(PREDICTION_COLUMN).to_string()))
            .collect();

        let rows = batch
            .records
            .iter()
            .map(|record| {
                batch
                    .columns
                    .iter()
                    .map(|column: &BatchColumn| ReportCell::plain(LabeledBatch::cell_text(column, record)))
                    .chain(std::iter::once(ReportCell::prediction(record.prediction)))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Body rows whose prediction marker has the given colour
    pub fn count_indicator(&self, color: IndicatorColor) -> usize {
        self.rows
            .iter()
            .filter(|row| row.iter().any(|cell| cell.style.indicator() == Some(color)))
            .count()
    }
}

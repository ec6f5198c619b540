//! Typed batches flowing between coercion, prediction and rendering

use crate::types::prediction::{LabeledRecord, PredictionLabel};
use crate::types::transaction::{CanonicalField, TransactionRecord};

/// A column of the batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchColumn {
    /// One of the six canonical fields
    Field(CanonicalField),
    /// Unrecognised input column; `slot` indexes the row's passthrough cells
    Passthrough { name: String, slot: usize },
}

impl BatchColumn {
    pub fn name(&self) -> &str {
        match self {
            BatchColumn::Field(field) => field.as_str(),
            BatchColumn::Passthrough { name, .. } => name,
        }
    }
}

/// A coerced input row
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub record: TransactionRecord,
    pub passthrough: Vec<String>,
    /// Trimmed input text of the canonical cells, indexed by
    /// [`CanonicalField::index`]; `None` for records built by a caller.
    pub source_text: Option<[String; 6]>,
}

/// Validated, typed transactions ready for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub columns: Vec<BatchColumn>,
    pub rows: Vec<BatchRow>,
}

impl RecordBatch {
    /// A single entry is the one-row case of the batch.
    pub fn single(record: TransactionRecord) -> Self {
        Self {
            columns: CanonicalField::ALL.into_iter().map(BatchColumn::Field).collect(),
            rows: vec![BatchRow {
                record,
                passthrough: Vec::new(),
                source_text: None,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Canonical records only, in row order
    pub fn records(&self) -> Vec<TransactionRecord> {
        self.rows.iter().map(|row| row.record.clone()).collect()
    }
}

/// Output of the prediction adapter: the batch columns plus one labelled
/// record per input row, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBatch {
    pub columns: Vec<BatchColumn>,
    pub records: Vec<LabeledRecord>,
}

impl LabeledBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fraud_count(&self) -> usize {
        self.records.iter().filter(|r| r.prediction.is_fraud()).count()
    }

    pub fn labels(&self) -> Vec<PredictionLabel> {
        self.records.iter().map(|r| r.prediction).collect()
    }

    /// Report text for `column` in `record`.
    ///
    /// Numeric cells read from input are shown exactly as written (trimmed);
    /// only caller-built records fall back to formatting the parsed value.
    pub fn cell_text(column: &BatchColumn, record: &LabeledRecord) -> String {
        match column {
            BatchColumn::Field(field) if field.is_numeric() => match &record.source_text {
                Some(text) => text[field.index()].clone(),
                None => record.record.display_value(*field),
            },
            BatchColumn::Field(field) => record.record.display_value(*field),
            BatchColumn::Passthrough { slot, .. } => {
                record.passthrough.get(*slot).cloned().unwrap_or_default()
            }
        }
    }
}

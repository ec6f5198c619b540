//! Classifier capability and the prediction adapter

use crate::error::PredictionError;
use crate::types::{LabeledBatch, LabeledRecord, PredictionLabel, RecordBatch, TransactionRecord};
use anyhow::Result;
use tracing::{debug, warn};

/// Opaque trained model.
///
/// `predict` must return one output per input row, in input order, where
/// `1` means fraud and `0` legitimate.
pub trait Classifier: Send + Sync {
    fn predict(&self, records: &[TransactionRecord]) -> Result<Vec<u8>>;

    /// Name used in logs
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<F> Classifier for F
where
    F: Fn(&[TransactionRecord]) -> Result<Vec<u8>> + Send + Sync,
{
    fn predict(&self, records: &[TransactionRecord]) -> Result<Vec<u8>> {
        self(records)
    }
}

/// Label every row of `batch` with a single classifier call.
///
/// Either every row is labelled or none is: classifier failures, length
/// mismatches and out-of-range outputs all fail the whole batch.
pub fn label_batch<C: Classifier + ?Sized>(
    classifier: &C,
    batch: RecordBatch,
) -> Result<LabeledBatch, PredictionError> {
    let records = batch.records();

    let outputs = classifier.predict(&records).map_err(|e| {
        warn!(classifier = %classifier.name(), error = %e, "Classifier call failed");
        PredictionError::Classifier(e)
    })?;

    if outputs.len() != records.len() {
        return Err(PredictionError::LengthMismatch {
            expected: records.len(),
            actual: outputs.len(),
        });
    }

    let labels = outputs
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            PredictionLabel::from_output(value).ok_or(PredictionError::InvalidLabel { row: idx + 1, value })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let labeled: Vec<LabeledRecord> = batch
        .rows
        .into_iter()
        .zip(labels)
        .map(|(row, label)| LabeledRecord {
            source_text: row.source_text,
            ..LabeledRecord::new(row.record, row.passthrough, label)
        })
        .collect();

    let out = LabeledBatch {
        columns: batch.columns,
        records: labeled,
    };

    debug!(
        classifier = %classifier.name(),
        rows = out.len(),
        fraud = out.fraud_count(),
        "Batch labelled"
    );

    Ok(out)
}

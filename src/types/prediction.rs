//! Classifier outcome attached to a transaction

use crate::types::transaction::TransactionRecord;
use serde::{Deserialize, Serialize};

/// Binary classifier outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionLabel {
    Fraud,
    Legitimate,
}

impl PredictionLabel {
    /// Map a raw classifier output; only 0 and 1 are meaningful.
    pub fn from_output(output: u8) -> Option<Self> {
        match output {
            1 => Some(PredictionLabel::Fraud),
            0 => Some(PredictionLabel::Legitimate),
            _ => None,
        }
    }

    pub fn is_fraud(self) -> bool {
        self == PredictionLabel::Fraud
    }

    /// Fixed report cell text; never localized.
    pub fn report_text(self) -> &'static str {
        match self {
            PredictionLabel::Fraud => "Fraudulent",
            PredictionLabel::Legitimate => "Legitimate",
        }
    }

    /// One-line verdict shown for single-transaction checks
    pub fn verdict(self) -> &'static str {
        match self {
            PredictionLabel::Fraud => "Fraudulent Transaction",
            PredictionLabel::Legitimate => "Legitimate Transaction",
        }
    }
}

/// A transaction plus its label.
///
/// `passthrough` holds the cells of unrecognised input columns so the report
/// can reproduce them; they never reach the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRecord {
    #[serde(flatten)]
    pub record: TransactionRecord,
    #[serde(skip)]
    pub passthrough: Vec<String>,
    /// Canonical cell text as read from input, see [`crate::types::BatchRow`]
    #[serde(skip)]
    pub source_text: Option<[String; 6]>,
    pub prediction: PredictionLabel,
}

impl LabeledRecord {
    pub fn new(record: TransactionRecord, passthrough: Vec<String>, prediction: PredictionLabel) -> Self {
        Self {
            record,
            passthrough,
            source_text: None,
            prediction,
        }
    }
}

//! Error kinds surfaced to callers of the pipeline

use crate::types::CanonicalField;
use std::fmt;
use thiserror::Error;

/// Top-level pipeline failure. No variant is retried; all are caller-visible.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read tabular input: {0}")]
    Input(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    TypeCoercion(#[from] TypeCoercionError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Short stable name used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Input(_) => "input",
            PipelineError::Schema(_) => "schema",
            PipelineError::TypeCoercion(_) => "type_coercion",
            PipelineError::Prediction(_) => "prediction",
            PipelineError::Render(_) => "render",
        }
    }
}

/// Required canonical columns are absent or ambiguous after normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing columns in input: {}", field_list(.missing))]
    MissingFields { missing: Vec<CanonicalField> },

    #[error("column `{field}` appears more than once after header normalization")]
    DuplicateField { field: CanonicalField },

    #[error("input contains no transaction rows")]
    NoRows,

    /// `row` is 1-based, header excluded
    #[error("row {row} has {actual} cell(s) but the header has {expected}")]
    RowWidth { row: usize, expected: usize, actual: usize },
}

impl SchemaError {
    /// Literal missing canonical names, in required-list order.
    pub fn missing_field_names(&self) -> Vec<&'static str> {
        match self {
            SchemaError::MissingFields { missing } => missing.iter().map(|f| f.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

fn field_list(fields: &[CanonicalField]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
    format!("{:?}", names)
}

/// Why a single cell could not be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionReason {
    Empty,
    NotANumber,
    Negative,
    UnknownTransactionType,
}

impl fmt::Display for CoercionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionReason::Empty => f.write_str("value is empty"),
            CoercionReason::NotANumber => f.write_str("expected a finite number"),
            CoercionReason::Negative => f.write_str("expected a non-negative number"),
            CoercionReason::UnknownTransactionType => {
                f.write_str("expected one of PAYMENT, TRANSFER, CASH_OUT, DEPOSIT")
            }
        }
    }
}

/// One failing cell; `row` is the 1-based data row (header excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFailure {
    pub row: usize,
    pub field: CanonicalField,
    pub value: String,
    pub reason: CoercionReason,
}

impl fmt::Display for CellFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column `{}`: {:?} ({})",
            self.row, self.field, self.value, self.reason
        )
    }
}

/// Present fields whose values cannot be interpreted, one entry per cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} value(s) could not be interpreted; first: {}", .failures.len(), first_failure(.failures))]
pub struct TypeCoercionError {
    pub failures: Vec<CellFailure>,
}

fn first_failure(failures: &[CellFailure]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// The classifier boundary failed; the whole batch is unlabelled.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("classifier failed: {0:#}")]
    Classifier(anyhow::Error),

    #[error("classifier returned {actual} label(s) for {expected} row(s)")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("classifier returned {value} for row {row}; expected 0 or 1")]
    InvalidLabel { row: usize, value: u8 },
}

/// Document construction failed
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("report has no rows to render")]
    EmptyReport,

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

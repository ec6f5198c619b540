//! Type definitions for the transaction labelling pipeline

pub mod batch;
pub mod prediction;
pub mod table;
pub mod transaction;

pub use batch::{BatchColumn, BatchRow, LabeledBatch, RecordBatch};
pub use prediction::{LabeledRecord, PredictionLabel};
pub use table::RawTable;
pub use transaction::{CanonicalField, TransactionRecord, TransactionType};

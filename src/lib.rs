//! Transaction fraud labelling library
//!
//! Normalizes tabular transaction input to a fixed schema, validates it,
//! labels every row with an external classifier and renders the result as a
//! paginated PDF with fraud/legitimate highlighting.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod template;
pub mod types;

pub use config::AppConfig;
pub use error::{PipelineError, PredictionError, RenderError, SchemaError, TypeCoercionError};
pub use models::{label_batch, Classifier};
pub use pipeline::{PipelineOutput, ReportPipeline};
pub use report::{RenderedDocument, ReportRenderer};
pub use types::{LabeledBatch, PredictionLabel, RawTable, TransactionRecord, TransactionType};

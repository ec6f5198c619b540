//! Header normalization, schema validation and cell coercion

pub mod aliases;
pub mod coerce;
pub mod validator;

pub use aliases::{normalize, normalize_column, normalize_columns};
pub use coerce::{check_record, coerce};
pub use validator::{missing_fields, validate, ValidatedTable};

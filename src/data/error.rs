use thiserror::Error;

/// Errors raised while coercing a raw row into a [`Record`](super::model::Record).
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': value is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotANumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}, column '{column}': value {value} is not finite")]
    NotFinite {
        row: usize,
        column: &'static str,
        value: f64,
    },

    #[error("row {row}, column '{column}': unsupported value type {kind}")]
    UnsupportedType {
        row: usize,
        column: &'static str,
        kind: String,
    },
}

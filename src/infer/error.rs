//! Error types for schema inference

use thiserror::Error;

use super::types::SqlType;

/// Errors that can occur while deriving a table descriptor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferError {
    /// No records provided for inference
    #[error("Cannot infer a schema from an empty batch")]
    NoRecords,

    /// Declared primary key never appears in the sampled records
    #[error("Primary key column '{0}' does not appear in the sampled records")]
    PrimaryKeyMissing(String),

    /// Declared primary key classified as a non-integer type
    #[error("Primary key column '{name}' classified as {found:?}; an INT column is required")]
    PrimaryKeyNotInteger { name: String, found: SqlType },
}

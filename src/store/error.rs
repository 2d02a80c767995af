//! Error types for table storage

use thiserror::Error;

/// Errors that can occur against the relational store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection or driver-level failure
    #[error("Database error: {0}")]
    Database(String),

    /// CREATE refused because the table is already there
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// Operation against a table that does not exist
    #[error("Table '{0}' does not exist")]
    TableMissing(String),

    /// Identifier unsafe to interpolate into DDL
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Value incompatible with the declared column type
    #[error("Value for column '{column}' does not fit its declared type: {reason}")]
    ValueMismatch { column: String, reason: String },

    /// Text value wider than the declared column width
    #[error("Value for column '{column}' exceeds {width} characters")]
    ValueTooWide { column: String, width: usize },
}

impl From<mysql::Error> for StoreError {
    fn from(err: mysql::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

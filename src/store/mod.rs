//! Relational table storage facade
//!
//! The database is an external collaborator; the engine only needs four
//! operations: does the table exist, create it from a descriptor, list its
//! live columns, and insert-or-ignore one row. [`MysqlStore`] is the
//! production backend; [`MemoryStore`] backs tests and dry runs with the
//! same observable semantics.

mod error;
mod memory;
mod mysql;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use mysql::MysqlStore;

use crate::infer::TableDescriptor;
use crate::record::Record;

/// Outcome of an insert-or-ignore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was committed
    Inserted,
    /// A uniqueness constraint matched an existing row; benign skip
    Skipped,
}

/// Thin facade over a relational store.
///
/// Row durability is per-insert: there is no batch transaction, and a run
/// owns its connection exclusively (no concurrent writers are protected
/// against).
pub trait TableStore {
    /// Whether a table of this name exists (a read against it succeeds)
    fn exists(&mut self, table: &str) -> Result<bool, StoreError>;

    /// Create a table from a descriptor.
    ///
    /// Fails when the table already exists; descriptors are derived once and
    /// never re-applied.
    fn create_table(&mut self, table: &str, descriptor: &TableDescriptor) -> Result<(), StoreError>;

    /// The live column list, in authoritative order for inserts
    fn columns(&mut self, table: &str) -> Result<Vec<String>, StoreError>;

    /// Insert one row, ignoring duplicate-key conflicts.
    ///
    /// Values are aligned positionally to `columns`; fields absent from the
    /// record, or explicitly null, are written as SQL NULL. A duplicate
    /// primary key reports `Skipped`. Any other failure is returned as an
    /// error for the caller to isolate at row level.
    fn insert_ignore(
        &mut self,
        table: &str,
        columns: &[String],
        record: &Record,
    ) -> Result<InsertOutcome, StoreError>;
}

/// Validate a SQL identifier (table or column name).
///
/// DDL cannot take placeholders, so identifiers interpolated into CREATE
/// statements are restricted to `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

//! In-memory table store for tests and dry runs

use std::collections::HashMap;

use super::error::StoreError;
use super::{InsertOutcome, TableStore, validate_identifier};
use crate::infer::{SqlType, TEXT_WIDTH, TableDescriptor};
use crate::record::{FieldValue, Record};

struct MemoryTable {
    descriptor: TableDescriptor,
    rows: Vec<Vec<FieldValue>>,
}

/// Table store holding everything in memory.
///
/// Enforces the same observable semantics as the MySQL backend: declared
/// column types are checked on insert, text wider than the column fails,
/// and a duplicate primary key is a benign skip.
#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<String, MemoryTable>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed rows in a table (0 when absent)
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |t| t.rows.len())
    }

    /// Committed rows in insertion order, aligned to the table's columns
    pub fn rows(&self, table: &str) -> Option<&[Vec<FieldValue>]> {
        self.tables.get(table).map(|t| t.rows.as_slice())
    }

    /// The descriptor a table was created from
    pub fn descriptor(&self, table: &str) -> Option<&TableDescriptor> {
        self.tables.get(table).map(|t| &t.descriptor)
    }
}

fn check_value(kind: SqlType, column: &str, value: &FieldValue) -> Result<(), StoreError> {
    match (kind, value) {
        (_, FieldValue::Null) => Ok(()),
        (SqlType::Integer, FieldValue::Integer(_)) => Ok(()),
        // Integers coerce into FLOAT columns, as the server would
        (SqlType::Float, FieldValue::Integer(_) | FieldValue::Float(_)) => Ok(()),
        (SqlType::Text, FieldValue::Text(s)) => {
            if s.chars().count() > TEXT_WIDTH {
                Err(StoreError::ValueTooWide {
                    column: column.to_string(),
                    width: TEXT_WIDTH,
                })
            } else {
                Ok(())
            }
        }
        // Numeric-shaped strings coerce into numeric columns
        (SqlType::Integer | SqlType::Float, FieldValue::Text(s))
            if SqlType::of_scalar(value) <= kind && !s.is_empty() =>
        {
            Ok(())
        }
        // Numbers render into text columns
        (SqlType::Text, FieldValue::Integer(_) | FieldValue::Float(_)) => Ok(()),
        _ => Err(StoreError::ValueMismatch {
            column: column.to_string(),
            reason: format!("{value:?} is not a {kind:?}"),
        }),
    }
}

impl TableStore for MemoryStore {
    fn exists(&mut self, table: &str) -> Result<bool, StoreError> {
        validate_identifier(table)?;
        Ok(self.tables.contains_key(table))
    }

    fn create_table(
        &mut self,
        table: &str,
        descriptor: &TableDescriptor,
    ) -> Result<(), StoreError> {
        validate_identifier(table)?;
        if self.tables.contains_key(table) {
            return Err(StoreError::TableExists(table.to_string()));
        }
        for spec in descriptor.columns() {
            validate_identifier(&spec.name)?;
        }
        self.tables.insert(
            table.to_string(),
            MemoryTable {
                descriptor: descriptor.clone(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<String>, StoreError> {
        validate_identifier(table)?;
        self.tables
            .get(table)
            .map(|t| t.descriptor.column_names())
            .ok_or_else(|| StoreError::TableMissing(table.to_string()))
    }

    fn insert_ignore(
        &mut self,
        table: &str,
        columns: &[String],
        record: &Record,
    ) -> Result<InsertOutcome, StoreError> {
        validate_identifier(table)?;
        let entry = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableMissing(table.to_string()))?;

        let mut row = Vec::with_capacity(columns.len());
        for column in columns {
            let value = record.get(column).cloned().unwrap_or(FieldValue::Null);
            let kind = entry
                .descriptor
                .column(column)
                .map(|c| c.kind)
                .ok_or_else(|| StoreError::ValueMismatch {
                    column: column.clone(),
                    reason: "no such column".to_string(),
                })?;
            check_value(kind, column, &value)?;
            row.push(value);
        }

        // Duplicate primary key is a benign skip
        if let Some(pk) = entry.descriptor.primary_key() {
            let pk_index = columns.iter().position(|c| *c == pk.name);
            if let Some(idx) = pk_index {
                let duplicate = entry.rows.iter().any(|r| r[idx] == row[idx]);
                if duplicate {
                    return Ok(InsertOutcome::Skipped);
                }
            }
        }

        entry.rows.push(row);
        Ok(InsertOutcome::Inserted)
    }
}

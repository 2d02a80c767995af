//! Table descriptor derivation from sampled records

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::InferError;
use super::types::SqlType;
use crate::record::{FieldValue, Record};

/// One column of a derived table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name (the JSON field name)
    pub name: String,
    /// Inferred SQL type
    pub kind: SqlType,
    /// Whether this column is the table's primary key
    pub is_primary_key: bool,
}

/// Ordered column set for a table, derived once per table lifetime.
///
/// Schema evolution is not supported: the descriptor is computed from the
/// first sampled batch and never revisited. Columns first observed in later
/// batches are not added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    columns: Vec<ColumnSpec>,
}

impl TableDescriptor {
    /// The columns in union-of-first-batch-keys order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Column names in descriptor order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary key column, if one was declared
    pub fn primary_key(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.is_primary_key)
    }
}

/// Derives a [`TableDescriptor`] from a sample of records
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Build a descriptor from sampled records.
    ///
    /// The column set is the union of field names across all samples, in
    /// first-seen order. Each column is classified from the values of the
    /// records that carry the field; records missing it contribute nulls.
    ///
    /// When `primary_key` is given, that column must exist in the sample and
    /// classify as `Integer`; anything else is a misconfiguration and fails
    /// before any DDL is issued.
    pub fn build(
        samples: &[Record],
        primary_key: Option<&str>,
    ) -> Result<TableDescriptor, InferError> {
        if samples.is_empty() {
            return Err(InferError::NoRecords);
        }

        // Ordered union of keys across the whole sample
        let mut keys: Vec<String> = Vec::new();
        for record in samples {
            for key in record.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }

        let mut columns = Vec::with_capacity(keys.len());
        for key in &keys {
            let column: Vec<FieldValue> = samples
                .iter()
                .map(|r| r.get(key).cloned().unwrap_or(FieldValue::Null))
                .collect();
            let kind = SqlType::of_column(&column);
            let is_primary_key = primary_key == Some(key.as_str());

            if is_primary_key && kind != SqlType::Integer {
                return Err(InferError::PrimaryKeyNotInteger {
                    name: key.clone(),
                    found: kind,
                });
            }

            columns.push(ColumnSpec {
                name: key.clone(),
                kind,
                is_primary_key,
            });
        }

        if let Some(pk) = primary_key {
            if !columns.iter().any(|c| c.is_primary_key) {
                return Err(InferError::PrimaryKeyMissing(pk.to_string()));
            }
        }

        debug!(
            columns = columns.len(),
            samples = samples.len(),
            "derived table descriptor"
        );

        Ok(TableDescriptor { columns })
    }
}

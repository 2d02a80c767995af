//! MySQL table store

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Value};
use tracing::{debug, info};

use super::error::StoreError;
use super::{InsertOutcome, TableStore, validate_identifier};
use crate::infer::{TEXT_WIDTH, TableDescriptor};
use crate::record::{FieldValue, Record};

/// Table store backed by a MySQL connection.
///
/// One run owns the connection exclusively; every insert commits on its own
/// (autocommit), so partial progress survives an aborted run.
pub struct MysqlStore {
    conn: Conn,
}

impl MysqlStore {
    /// Connect to a MySQL server
    pub fn connect(
        host: &str,
        user: &str,
        password: &str,
        database: &str,
    ) -> Result<Self, StoreError> {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(host))
            .user(Some(user))
            .pass(Some(password))
            .db_name(Some(database));
        let conn = Conn::new(opts)?;
        info!(host, database, "connected to MySQL");
        Ok(Self { conn })
    }
}

impl TableStore for MysqlStore {
    fn exists(&mut self, table: &str) -> Result<bool, StoreError> {
        validate_identifier(table)?;
        let count: Option<i64> = self.conn.exec_first(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = DATABASE() AND table_name = ?",
            (table,),
        )?;
        Ok(count.unwrap_or(0) > 0)
    }

    fn create_table(
        &mut self,
        table: &str,
        descriptor: &TableDescriptor,
    ) -> Result<(), StoreError> {
        validate_identifier(table)?;
        if self.exists(table)? {
            return Err(StoreError::TableExists(table.to_string()));
        }

        // DDL takes no placeholders; identifiers are validated instead
        let mut parts = Vec::with_capacity(descriptor.columns().len());
        for spec in descriptor.columns() {
            validate_identifier(&spec.name)?;
            let mut part = format!("{} {}", spec.name, spec.kind.sql_name());
            if spec.is_primary_key {
                part.push_str(" PRIMARY KEY");
            }
            parts.push(part);
        }
        let ddl = format!("CREATE TABLE {} ({})", table, parts.join(", "));

        debug!(%ddl, "creating table");
        self.conn.query_drop(ddl)?;
        Ok(())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<String>, StoreError> {
        validate_identifier(table)?;
        let columns: Vec<String> = self.conn.exec(
            "SELECT column_name FROM information_schema.columns
             WHERE table_schema = DATABASE() AND table_name = ?
             ORDER BY ordinal_position",
            (table,),
        )?;
        if columns.is_empty() {
            return Err(StoreError::TableMissing(table.to_string()));
        }
        Ok(columns)
    }

    fn insert_ignore(
        &mut self,
        table: &str,
        columns: &[String],
        record: &Record,
    ) -> Result<InsertOutcome, StoreError> {
        validate_identifier(table)?;
        let mut values = Vec::with_capacity(columns.len());
        for column in columns {
            validate_identifier(column)?;
            values.push(to_sql_value(column, record.get(column))?);
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let stmt = format!(
            "INSERT IGNORE INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        self.conn.exec_drop(stmt, values)?;
        // INSERT IGNORE reports zero affected rows on a duplicate key
        if self.conn.affected_rows() == 0 {
            Ok(InsertOutcome::Skipped)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }
}

/// Convert one field value for positional binding.
///
/// Absent and null fields both bind SQL NULL. Overlong text is rejected here
/// because `INSERT IGNORE` demotes the server-side width error to a warning
/// and truncates, which must not happen silently.
fn to_sql_value(column: &str, value: Option<&FieldValue>) -> Result<Value, StoreError> {
    match value {
        None | Some(FieldValue::Null) => Ok(Value::NULL),
        Some(FieldValue::Integer(i)) => Ok(Value::Int(*i)),
        Some(FieldValue::Float(f)) => Ok(Value::Double(*f)),
        Some(FieldValue::Text(s)) => {
            if s.chars().count() > TEXT_WIDTH {
                return Err(StoreError::ValueTooWide {
                    column: column.to_string(),
                    width: TEXT_WIDTH,
                });
            }
            Ok(Value::Bytes(s.clone().into_bytes()))
        }
    }
}

//! SQL type classification for observed field values

use serde::{Deserialize, Serialize};

use crate::record::FieldValue;

/// Maximum width of a generated VARCHAR column.
///
/// A real limitation: values longer than this must fail loudly at insert
/// time rather than truncate.
pub const TEXT_WIDTH: usize = 100;

/// SQL column type inferred from observed data.
///
/// Ordered from most to least constraining: a column widens from `Integer`
/// through `Float` to `Text` as values demand it, never the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    /// Whole numbers
    Integer,
    /// Decimal numbers
    Float,
    /// Everything else
    Text,
}

impl SqlType {
    /// Classify a single observed value.
    ///
    /// Native integers and floats map directly. Null and empty strings are
    /// text, the least constraining kind. Strings are classified by shape:
    /// every character must be a digit, `-`, or `.` to count as numeric,
    /// which rejects scientific notation, leading `+`, and thousands
    /// separators by construction.
    pub fn of_scalar(value: &FieldValue) -> SqlType {
        match value {
            FieldValue::Integer(_) => SqlType::Integer,
            FieldValue::Float(_) => SqlType::Float,
            FieldValue::Null => SqlType::Text,
            FieldValue::Text(s) => Self::of_str(s),
        }
    }

    fn of_str(s: &str) -> SqlType {
        if s.is_empty() {
            return SqlType::Text;
        }

        let mut chars = s.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            return if only.is_ascii_digit() {
                SqlType::Integer
            } else {
                SqlType::Text
            };
        }

        if !s.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '.') {
            return SqlType::Text;
        }

        if s.contains('.') {
            SqlType::Float
        } else {
            SqlType::Integer
        }
    }

    /// Widen to the more general of two types (Text > Float > Integer)
    pub fn widen(self, other: SqlType) -> SqlType {
        self.max(other)
    }

    /// Classify a whole column of values.
    ///
    /// Nulls are skipped: a null is stored as SQL NULL and fits any column,
    /// so it never widens the type. An empty column (or one holding only
    /// nulls) classifies as text. The reduction is order-independent.
    pub fn of_column<'a, I>(values: I) -> SqlType
    where
        I: IntoIterator<Item = &'a FieldValue>,
    {
        let mut result = None;
        for value in values {
            if value.is_null() {
                continue;
            }
            let t = Self::of_scalar(value);
            result = Some(result.map_or(t, |r: SqlType| r.widen(t)));
        }
        result.unwrap_or(SqlType::Text)
    }

    /// The SQL type name used in CREATE statements
    pub fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Integer => "INT",
            SqlType::Float => "FLOAT(8,4)",
            SqlType::Text => "VARCHAR(100)",
        }
    }
}

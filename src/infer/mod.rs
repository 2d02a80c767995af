//! Type inference and schema derivation for observed JSON records
//!
//! The target table has no predeclared contract; its column set and column
//! types are derived from the first sampled batch of records:
//!
//! - **Scalar classification** - map one observed value to a SQL type
//! - **Column classification** - widen across all values of one field
//! - **Schema building** - ordered key union plus per-column classification,
//!   emitting an immutable table descriptor
//!
//! Classification is deliberately conservative pattern matching over the
//! textual form, not numeric parsing: scientific notation, leading `+`, and
//! locale formatting all classify as text.

mod error;
mod schema;
mod types;

pub use error::InferError;
pub use schema::{ColumnSpec, SchemaBuilder, TableDescriptor};
pub use types::{SqlType, TEXT_WIDTH};

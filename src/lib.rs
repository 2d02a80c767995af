//! Tableload - Paginated JSON collections into relational tables
//!
//! Provides the pieces of a small ingestion pipeline:
//! - Fetching paginated JSON collections over HTTP (link-based and
//!   year-substitution pagination)
//! - SQL type inference over sampled records
//! - Schema construction preserving first-seen column order
//! - Table stores (MySQL, plus an in-memory store for tests)
//! - An engine orchestrating schema-ensure, fetch, insert, and reporting

pub mod fetch;
pub mod infer;
pub mod ingest;
pub mod record;
pub mod store;

// Re-export commonly used types
pub use fetch::{FetchError, HttpFetcher, PageSource, YearRange};
pub use infer::{ColumnSpec, InferError, SchemaBuilder, SqlType, TableDescriptor};
pub use ingest::{IngestionEngine, IngestionReport, LoadConfig, LoadError};
pub use record::{FieldValue, Record};
pub use store::{InsertOutcome, MemoryStore, MysqlStore, StoreError, TableStore};

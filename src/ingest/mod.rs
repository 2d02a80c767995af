//! Ingestion orchestration
//!
//! One run walks a fixed sequence of phases: ensure the schema (inferring it
//! from the first batch only when the table does not yet exist), fetch the
//! full record sequence, insert row by row with per-record failure
//! isolation, then report. A malformed record never aborts the loop; it is
//! retained verbatim in the failure artifact instead.

mod config;
mod engine;
mod error;
mod progress;
mod report;

pub use config::{LoadConfig, LoadConfigBuilder};
pub use engine::IngestionEngine;
pub use error::LoadError;
pub use progress::InsertProgress;
pub use report::{FailedRow, IngestionReport};

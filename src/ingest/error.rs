//! Error types for ingestion runs

use thiserror::Error;

use crate::fetch::FetchError;
use crate::infer::InferError;
use crate::store::StoreError;

/// Fatal errors that abort an ingestion run.
///
/// Row-level insertion failures are not represented here; they are isolated
/// per record and accumulated into the run's [`IngestionReport`].
///
/// [`IngestionReport`]: super::IngestionReport
#[derive(Error, Debug)]
pub enum LoadError {
    /// Misconfiguration caught before any network or database activity
    #[error("Configuration error: {0}")]
    Config(String),

    /// The list accessor yielded zero records on the first batch
    #[error("Dataset appears to be empty")]
    EmptyDataset,

    /// Transport failure during a fetch
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Schema inference failed (also a misconfiguration when the declared
    /// primary key is unusable)
    #[error(transparent)]
    Infer(#[from] InferError),

    /// Store failure outside the per-row insert path
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failure artifact could not be written
    #[error("Failed to write failure artifact to {path}: {reason}")]
    Artifact { path: String, reason: String },
}

//! The ingestion engine
//!
//! Ties the fetch, inference, and store layers together for one run.

use std::path::Path;

use tracing::{info, warn};

use super::config::LoadConfig;
use super::error::LoadError;
use super::progress::InsertProgress;
use super::report::IngestionReport;
use crate::fetch::{PageSource, fetch_all, fetch_year_scoped};
use crate::infer::SchemaBuilder;
use crate::record::Record;
use crate::store::{InsertOutcome, TableStore};

/// Drives one ingestion run against a page source and a table store.
///
/// The run is a fixed sequence: fetch the first batch, ensure the table
/// exists (inferring its schema from that batch when it does not), fetch the
/// remaining batches, insert row by row, then report. A store error on a
/// single row is isolated into the report; transport and schema errors abort
/// the run.
pub struct IngestionEngine<'a, S, T> {
    source: &'a S,
    store: &'a mut T,
}

impl<'a, S: PageSource, T: TableStore> IngestionEngine<'a, S, T> {
    /// Create an engine over a page source and a table store
    pub fn new(source: &'a S, store: &'a mut T) -> Self {
        Self { source, store }
    }

    /// Execute one run and return its accounting
    pub fn run(&mut self, config: &LoadConfig) -> Result<IngestionReport, LoadError> {
        let sample = fetch_all(
            self.source,
            &config.url,
            &config.list_field,
            config.link_field.as_deref(),
        )?;
        if sample.is_empty() {
            return Err(LoadError::EmptyDataset);
        }

        let columns = self.ensure_table(config, &sample)?;

        // Year-scoped runs refetch per year from the original URL; a plain
        // run already holds the full dataset in the sample batch.
        let batches: Vec<Vec<Record>> = match config.years {
            Some(range) => fetch_year_scoped(
                self.source,
                &config.url,
                range,
                &config.list_field,
                config.link_field.as_deref(),
            )?
            .into_iter()
            .map(|(_, records)| records)
            .collect(),
            None => vec![sample],
        };

        let total: usize = batches.iter().map(Vec::len).sum();
        info!(table = %config.table, records = total, "inserting records");

        let progress = InsertProgress::new(total as u64, config.show_progress);
        let mut report = IngestionReport::new();
        for batch in &batches {
            for record in batch {
                match self.store.insert_ignore(&config.table, &columns, record) {
                    Ok(InsertOutcome::Inserted) => report.record_inserted(),
                    Ok(InsertOutcome::Skipped) => report.record_skipped(),
                    Err(e) => report.record_failed(record, e.to_string()),
                }
                progress.inc();
            }
        }
        progress.finish_success(&format!(
            "{} inserted, {} skipped, {} failed",
            report.inserted,
            report.skipped,
            report.failed.len()
        ));

        if report.has_failures() {
            let path = Path::new(&config.artifact_path);
            report.write_artifact(path)?;
            warn!(
                failed = report.failed.len(),
                artifact = %path.display(),
                "some records could not be inserted"
            );
        }
        info!(
            table = %config.table,
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed.len(),
            "run complete"
        );
        Ok(report)
    }

    /// Create the table from the sample batch when it does not exist yet,
    /// then return its column order.
    fn ensure_table(
        &mut self,
        config: &LoadConfig,
        sample: &[Record],
    ) -> Result<Vec<String>, LoadError> {
        if !self.store.exists(&config.table)? {
            let descriptor = SchemaBuilder::build(sample, config.primary_key.as_deref())?;
            info!(
                table = %config.table,
                columns = descriptor.columns().len(),
                "creating table from inferred schema"
            );
            self.store.create_table(&config.table, &descriptor)?;
        }
        Ok(self.store.columns(&config.table)?)
    }
}

//! Configuration for an ingestion run

use serde::{Deserialize, Serialize};

use super::error::LoadError;
use crate::fetch::YearRange;

/// Configuration for one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Target table name
    pub table: String,
    /// URL of the first page
    pub url: String,
    /// JSON key holding the array of record objects
    pub list_field: String,
    /// JSON key holding the next-page URL (enables link pagination)
    pub link_field: Option<String>,
    /// Field to declare as the table's primary key
    pub primary_key: Option<String>,
    /// Inclusive year range (enables year-scoped fetching)
    #[serde(skip)]
    pub years: Option<YearRange>,
    /// Path of the failure artifact written when rows fail
    pub artifact_path: String,
    /// Show progress bars during the insert loop
    pub show_progress: bool,
}

impl LoadConfig {
    /// Create a builder
    pub fn builder() -> LoadConfigBuilder {
        LoadConfigBuilder::default()
    }
}

/// Builder for [`LoadConfig`]
#[derive(Debug, Default)]
pub struct LoadConfigBuilder {
    table: Option<String>,
    url: Option<String>,
    list_field: Option<String>,
    link_field: Option<String>,
    primary_key: Option<String>,
    years: Option<YearRange>,
    artifact_path: Option<String>,
    show_progress: bool,
}

impl LoadConfigBuilder {
    /// Set the target table name
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Set the URL of the first page
    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Set the list accessor key
    pub fn list_field(mut self, key: &str) -> Self {
        self.list_field = Some(key.to_string());
        self
    }

    /// Set the link field key, enabling link pagination
    pub fn link_field(mut self, key: &str) -> Self {
        self.link_field = Some(key.to_string());
        self
    }

    /// Declare a primary key field
    pub fn primary_key(mut self, key: &str) -> Self {
        self.primary_key = Some(key.to_string());
        self
    }

    /// Set the year range, enabling year-scoped fetching
    pub fn years(mut self, range: YearRange) -> Self {
        self.years = Some(range);
        self
    }

    /// Override the failure artifact path
    pub fn artifact_path(mut self, path: &str) -> Self {
        self.artifact_path = Some(path.to_string());
        self
    }

    /// Enable progress bars
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build the config; table, URL, and list accessor are required
    pub fn build(self) -> Result<LoadConfig, LoadError> {
        let table = self
            .table
            .ok_or_else(|| LoadError::Config("A table name is required".to_string()))?;
        let url = self
            .url
            .ok_or_else(|| LoadError::Config("The URL of the API being accessed is required".to_string()))?;
        let list_field = self.list_field.ok_or_else(|| {
            LoadError::Config("The key accessing the record list is required".to_string())
        })?;

        Ok(LoadConfig {
            table,
            url,
            list_field,
            link_field: self.link_field,
            primary_key: self.primary_key,
            years: self.years,
            artifact_path: self
                .artifact_path
                .unwrap_or_else(|| "problematic_entries.json".to_string()),
            show_progress: self.show_progress,
        })
    }
}

//! End-to-end pipeline tests over an in-memory store and canned pages

use std::collections::HashMap;

use serde_json::{Value, json};

use tableload::fetch::{FetchError, PageSource};
use tableload::infer::SqlType;
use tableload::ingest::{IngestionEngine, LoadConfig, LoadError};
use tableload::record::FieldValue;
use tableload::store::MemoryStore;

/// Page source serving canned bodies from a URL map
struct FakeSource {
    pages: HashMap<String, Value>,
}

impl FakeSource {
    fn new(pages: Vec<(String, Value)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }
}

impl PageSource for FakeSource {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn config(url: &str, artifact: &str) -> LoadConfig {
    LoadConfig::builder()
        .table("students")
        .url(url)
        .list_field("results")
        .primary_key("id")
        .artifact_path(artifact)
        .build()
        .unwrap()
}

#[test]
fn test_schema_inferred_from_first_batch() {
    // One record carries a null score; the other types the column.
    let source = FakeSource::new(vec![(
        "http://x/data".to_string(),
        json!({"results": [
            {"id": "1", "name": "Ada", "score": "91.5"},
            {"id": "2", "name": "Grace", "score": null},
        ]}),
    )]);
    let mut store = MemoryStore::new();

    IngestionEngine::new(&source, &mut store)
        .run(&config("http://x/data", "unused.json"))
        .unwrap();

    let descriptor = store.descriptor("students").unwrap();
    let columns: Vec<_> = descriptor
        .columns()
        .iter()
        .map(|c| (c.name.as_str(), c.kind, c.is_primary_key))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", SqlType::Integer, true),
            ("name", SqlType::Text, false),
            ("score", SqlType::Float, false),
        ]
    );

    // The null score lands as SQL NULL, not as text.
    let rows = store.rows("students").unwrap();
    assert_eq!(rows[1][2], FieldValue::Null);
}

#[test]
fn test_link_pagination_collects_every_page() {
    let source = FakeSource::new(vec![
        (
            "http://x/p1".to_string(),
            json!({"results": [{"id": 1}], "next": "http://x/p2"}),
        ),
        (
            "http://x/p2".to_string(),
            json!({"results": [{"id": 2}, {"id": 3}], "next": null}),
        ),
    ]);
    let mut store = MemoryStore::new();

    let mut config = config("http://x/p1", "unused.json");
    config.link_field = Some("next".to_string());

    let report = IngestionEngine::new(&source, &mut store)
        .run(&config)
        .unwrap();
    assert_eq!(report.inserted, 3);
    assert_eq!(store.row_count("students"), 3);
}

#[test]
fn test_rerun_is_idempotent() {
    let source = FakeSource::new(vec![(
        "http://x/data".to_string(),
        json!({"results": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}]}),
    )]);
    let mut store = MemoryStore::new();
    let config = config("http://x/data", "unused.json");

    IngestionEngine::new(&source, &mut store)
        .run(&config)
        .unwrap();
    let report = IngestionEngine::new(&source, &mut store)
        .run(&config)
        .unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(store.row_count("students"), 2);
}

#[test]
fn test_one_bad_row_does_not_sink_the_batch() {
    let dir = tempfile::TempDir::new().unwrap();
    let artifact = dir.path().join("problematic_entries.json");

    // First run types the table; second run carries one mismatching record.
    let mut store = MemoryStore::new();
    let source = FakeSource::new(vec![(
        "http://x/data".to_string(),
        json!({"results": [{"id": 1, "name": "Ada"}]}),
    )]);
    IngestionEngine::new(&source, &mut store)
        .run(&config("http://x/data", artifact.to_str().unwrap()))
        .unwrap();

    let source = FakeSource::new(vec![(
        "http://x/data".to_string(),
        json!({"results": [
            {"id": 2, "name": "Grace"},
            {"id": "oops", "name": "Bad"},
            {"id": 3, "name": "Edsger"},
        ]}),
    )]);
    let report = IngestionEngine::new(&source, &mut store)
        .run(&config("http://x/data", artifact.to_str().unwrap()))
        .unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(store.row_count("students"), 3);

    let body = std::fs::read_to_string(&artifact).unwrap();
    let failed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(failed[0]["record"]["id"], "oops");
}

#[test]
fn test_empty_first_batch_aborts_before_any_ddl() {
    let source = FakeSource::new(vec![(
        "http://x/data".to_string(),
        json!({"results": []}),
    )]);
    let mut store = MemoryStore::new();

    let err = IngestionEngine::new(&source, &mut store)
        .run(&config("http://x/data", "unused.json"))
        .unwrap_err();
    assert!(matches!(err, LoadError::EmptyDataset));
}

#[test]
fn test_year_scoped_run_fetches_each_year_once() {
    let mut pages = Vec::new();
    for year in 2017..=2019u16 {
        pages.push((
            format!("http://x/report/{year}"),
            json!({"results": [{"id": year, "year": year}]}),
        ));
    }
    let source = FakeSource::new(pages);
    let mut store = MemoryStore::new();

    let config = LoadConfig::builder()
        .table("students")
        .url("http://x/report/2019")
        .list_field("results")
        .primary_key("id")
        .years("2017-2019".parse().unwrap())
        .build()
        .unwrap();

    let report = IngestionEngine::new(&source, &mut store)
        .run(&config)
        .unwrap();

    assert_eq!(report.inserted, 3);
    let years: Vec<_> = store
        .rows("students")
        .unwrap()
        .iter()
        .map(|row| row[0].clone())
        .collect();
    // Years are walked most-recent first.
    assert_eq!(
        years,
        vec![
            FieldValue::Integer(2019),
            FieldValue::Integer(2018),
            FieldValue::Integer(2017),
        ]
    );
}

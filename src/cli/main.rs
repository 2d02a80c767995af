//! Command-line entry point
//!
//! Connects to MySQL, then runs one ingestion: infer the schema from the
//! first batch when the table does not exist, fetch every page (optionally
//! per year), and insert record by record.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tableload::fetch::HttpFetcher;
use tableload::ingest::{IngestionEngine, LoadConfig};
use tableload::store::MysqlStore;

#[derive(Parser, Debug)]
#[command(name = "tableload", version, about = "Load paginated JSON collections into MySQL tables")]
struct Cli {
    /// MySQL host name of server
    #[arg(long, default_value = "localhost")]
    host: String,

    /// MySQL username
    #[arg(short, long, default_value = "root")]
    username: String,

    /// MySQL connection password
    #[arg(short, long, default_value = "password")]
    password: String,

    /// MySQL database name
    #[arg(short = 'n', long, default_value = "db")]
    database: String,

    /// Table name
    #[arg(short, long)]
    table: String,

    /// URL of the API being accessed, just copy and paste
    #[arg(long)]
    url: String,

    /// Name of the JSON key for accessing the list of individual records
    #[arg(long)]
    list_field: String,

    /// Name of the JSON key holding the next-page URL
    #[arg(long)]
    link_field: Option<String>,

    /// Primary key of the table to be created
    #[arg(long)]
    primary_key: Option<String>,

    /// Inclusive year range to fetch, as YYYY or YYYY-YYYY
    #[arg(long)]
    years: Option<String>,

    /// Path of the artifact written when rows fail
    #[arg(long, default_value = "problematic_entries.json")]
    artifact: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut builder = LoadConfig::builder()
        .table(&cli.table)
        .url(&cli.url)
        .list_field(&cli.list_field)
        .artifact_path(&cli.artifact)
        .show_progress(!cli.quiet);
    if let Some(ref link_field) = cli.link_field {
        builder = builder.link_field(link_field);
    }
    if let Some(ref primary_key) = cli.primary_key {
        builder = builder.primary_key(primary_key);
    }
    if let Some(ref years) = cli.years {
        builder = builder.years(years.parse().context("invalid --years")?);
    }
    let config = builder.build()?;

    let source = HttpFetcher::new(Duration::from_secs(cli.timeout))
        .context("failed to build HTTP client")?;
    let mut store = MysqlStore::connect(&cli.host, &cli.username, &cli.password, &cli.database)
        .with_context(|| format!("failed to connect to MySQL at {}", cli.host))?;

    let report = IngestionEngine::new(&source, &mut store).run(&config)?;

    println!();
    println!("Ingestion complete:");
    println!("  Records attempted: {}", report.attempted);
    println!("  Records inserted:  {}", report.inserted);
    println!("  Duplicates skipped: {}", report.skipped);
    if report.has_failures() {
        println!("  Records failed:    {}", report.failed.len());
        println!("  See {} for the failed records.", cli.artifact);
    }

    Ok(())
}

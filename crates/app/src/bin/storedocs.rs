use anyhow::Context;
use chrono::{Local, NaiveDateTime, TimeZone};
use clap::Parser;
use searchdocs_core::{
    process_target, CharacterNgramEmbedder, ChunkingConfig, DocumentConverter, LopdfExtractor,
    OpenSearchStore, SolrStore, DEFAULT_MAX_CHUNK_TOKENS,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Index documents into Solr (full text) and OpenSearch (chunk embeddings).
#[derive(Parser)]
#[command(name = "storedocs", version)]
struct Cli {
    /// File or directory to process.
    fl_or_fldr: PathBuf,

    /// Only process files modified after "YYYY-MM-DD HH:MM:SS" (local time).
    #[arg(short = 'r', long)]
    prevrun_dt: Option<String>,

    /// Solr base URL.
    #[arg(long, env = "SOLR_URL", default_value = "http://localhost:8983/solr")]
    solr_url: String,

    /// Solr index name.
    #[arg(long, env = "SOLR_INDEX", default_value = "searchdocuments")]
    solr_index: String,

    /// Skip TLS certificate verification for Solr.
    #[arg(long, default_value_t = false)]
    solr_insecure: bool,

    /// OpenSearch base URL.
    #[arg(long, env = "OPENSEARCH_URL", default_value = "http://localhost:9200")]
    opensearch_url: String,

    /// OpenSearch index name.
    #[arg(long, env = "OPENSEARCH_INDEX", default_value = "docchunks")]
    opensearch_index: String,

    /// Skip TLS certificate verification for OpenSearch.
    #[arg(long, default_value_t = false)]
    opensearch_insecure: bool,

    /// Maximum whitespace tokens per chunk.
    #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_TOKENS)]
    max_chunk_tokens: usize,

    /// Timeout in seconds for indexing writes.
    #[arg(long, default_value_t = 30)]
    request_timeout: u64,
}

fn parse_prevrun(raw: &str) -> anyhow::Result<i64> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("invalid --prevrun_dt value: {raw}"))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|stamp| stamp.timestamp())
        .context("prevrun timestamp does not exist in the local timezone")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let previous_run = cli.prevrun_dt.as_deref().map(parse_prevrun).transpose()?;
    let timeout = Duration::from_secs(cli.request_timeout);

    let converter = DocumentConverter::new(
        LopdfExtractor,
        ChunkingConfig {
            max_tokens: cli.max_chunk_tokens,
        },
    );
    let embedder = CharacterNgramEmbedder::default();
    let fulltext = SolrStore::new(&cli.solr_url, &cli.solr_index, !cli.solr_insecure, timeout)?;
    let vectors = OpenSearchStore::new(
        &cli.opensearch_url,
        &cli.opensearch_index,
        !cli.opensearch_insecure,
        timeout,
    )?;

    info!(path = %cli.fl_or_fldr.display(), ?previous_run, "ingestion run start");

    let report = process_target(
        &converter,
        &embedder,
        &fulltext,
        &vectors,
        &cli.fl_or_fldr,
        previous_run,
    )
    .await?;

    for skipped in &report.skipped {
        warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped document");
    }
    info!(
        indexed = report.indexed.len(),
        skipped = report.skipped.len(),
        "ingestion run complete"
    );
    println!(
        "{} document(s) indexed, {} skipped",
        report.indexed.len(),
        report.skipped.len()
    );

    Ok(())
}

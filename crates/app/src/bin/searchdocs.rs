use clap::Parser;
use searchdocs_core::{LlmClient, SearchDispatcher, SolrStore};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Run a keyword query against the full-text index and print the results.
#[derive(Parser)]
#[command(name = "searchdocs", version)]
struct Cli {
    /// Search terms; end with '?' to also request a generated summary.
    inp_txt: String,

    /// Solr base URL.
    #[arg(long, env = "SOLR_URL", default_value = "http://localhost:8983/solr")]
    solr_url: String,

    /// Solr index name.
    #[arg(long, env = "SOLR_INDEX", default_value = "searchdocuments")]
    solr_index: String,

    /// Skip TLS certificate verification for Solr.
    #[arg(long, default_value_t = false)]
    solr_insecure: bool,

    /// Generation service base URL.
    #[arg(long, env = "LLM_URL", default_value = "http://localhost:11434")]
    llm_url: String,

    /// Generation model name.
    #[arg(long, env = "LLM_MODEL", default_value = "llama3")]
    llm_model: String,

    /// Timeout in seconds for the summary call.
    #[arg(long, default_value_t = 60)]
    llm_timeout: u64,

    /// Timeout in seconds for store writes.
    #[arg(long, default_value_t = 30)]
    request_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let fulltext = SolrStore::new(
        &cli.solr_url,
        &cli.solr_index,
        !cli.solr_insecure,
        Duration::from_secs(cli.request_timeout),
    )?;
    let generator = LlmClient::new(
        &cli.llm_url,
        cli.llm_model,
        Duration::from_secs(cli.llm_timeout),
    )?;
    let dispatcher = SearchDispatcher::new(fulltext, generator);

    let outcome = dispatcher.search(&cli.inp_txt).await;

    if let Some(error) = &outcome.error {
        println!("{error}");
        return Ok(());
    }

    if let Some(description) = &outcome.description {
        println!("{description}");
    }
    for hit in &outcome.hits {
        println!("[{}] {}", hit.modified, hit.docpath);
        println!("  {}", hit.snippet);
    }
    if let Some(summary) = &outcome.summary {
        println!("summary:");
        println!("{summary}");
    }

    Ok(())
}

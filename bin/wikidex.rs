use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use wikidex::config::{EngineConfig, MatchMode, QueryConfig, ServerConfig, TokenizerConfig};
use wikidex::loader::load_documents;
use wikidex::{AppState, CancelToken, SearchEngine, SearchMetrics};

#[derive(Parser)]
#[command(name = "wikidex")]
#[command(about = "Full-text keyword search over encyclopedia abstracts", long_about = None)]
struct Args {
    /// Abstracts file: Wikipedia abstract dump (.xml) or JSON lines, optionally .gz
    #[arg(short = 'p', long, env = "WIKIDEX_CORPUS")]
    corpus: PathBuf,

    /// HTTP port
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Indexing worker threads (defaults to the number of CPUs)
    #[arg(long, env = "WIKIDEX_WORKERS")]
    workers: Option<usize>,

    /// Drop English stop words at index and query time
    #[arg(long, env = "WIKIDEX_STOPWORDS")]
    stopwords: bool,

    /// Apply English stemming at index and query time
    #[arg(long, env = "WIKIDEX_STEM")]
    stem: bool,

    /// Match documents containing any query term instead of all of them
    #[arg(long)]
    any: bool,

    /// Per-query deadline in milliseconds
    #[arg(long, env = "WIKIDEX_SEARCH_TIMEOUT_MS", default_value = "5000")]
    search_timeout_ms: u64,

    /// Run one query, print the hits as JSON and exit instead of serving
    #[arg(short = 'q', long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting wikidex v{}", wikidex::VERSION);

    let server_config = ServerConfig::new(args.port, args.corpus.clone())
        .with_search_timeout_ms(args.search_timeout_ms);

    let mut engine_config = EngineConfig::default()
        .with_tokenizer(TokenizerConfig {
            remove_stopwords: args.stopwords,
            stem: args.stem,
            ..Default::default()
        })
        .with_query(QueryConfig {
            mode: if args.any { MatchMode::Any } else { MatchMode::All },
            ..Default::default()
        });
    if let Some(workers) = args.workers {
        engine_config = engine_config.with_workers(workers);
    }

    info!("Engine configuration:");
    info!("  Corpus: {:?}", server_config.corpus_path);
    info!("  Workers: {}", engine_config.build.workers);
    info!("  Stop words: {}", engine_config.tokenizer.remove_stopwords);
    info!("  Stemming: {}", engine_config.tokenizer.stem);
    info!("  Match mode: {:?}", engine_config.query.mode);

    let metrics = Arc::new(SearchMetrics::new()?);
    let engine = Arc::new(SearchEngine::new(engine_config));

    // Load and index off the async runtime
    let build_engine = engine.clone();
    let corpus_path = server_config.corpus_path.clone();
    let built = tokio::task::spawn_blocking(move || -> wikidex::Result<_> {
        let (documents, report) = load_documents(&corpus_path)?;
        if report.skipped > 0 {
            warn!("Skipped {} malformed records", report.skipped);
        }
        build_engine.build(documents)
    })
    .await?;

    let stats = match built {
        Ok(stats) => stats,
        Err(e) => {
            metrics.record_build_failure();
            return Err(e.into());
        }
    };
    metrics.record_build(&stats);
    info!(
        "Indexed {} documents ({} terms) in {} ms",
        stats.documents, stats.terms, stats.build_ms
    );

    if let Some(query) = args.query {
        let cancel = CancelToken::with_timeout(server_config.search_timeout());
        let hits = engine.search_hits(&query, &cancel)?;
        info!("Search found {} documents", hits.len());
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    let app = wikidex::create_router(AppState {
        engine,
        metrics,
        search_timeout: server_config.search_timeout(),
    });
    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    info!("HTTP API server listening on {}", server_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal, gracefully shutting down");
        })
        .await?;

    Ok(())
}

//! Bookmesh - Book Metadata Aggregation and Translation
//!
//! This is the main entry point for the bookmesh CLI, which searches
//! Google Books or Open Library, normalizes the results into an
//! entity/relationship graph, and optionally translates textual fields
//! into a target language.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use bookmesh::cli::{Args, Commands};
use bookmesh::config::Config;
use bookmesh::error::BookmeshError;
use bookmesh::normalize::{normalize, NormalizeOptions};
use bookmesh::report::SearchReport;
use bookmesh::sources::{SearchQuery, SourceFactory, SourceKind};
use bookmesh::translate::local::check_local_availability;
use bookmesh::translate::remote::check_remote_availability;
use bookmesh::translate::{TranslatorFactory, TreeTranslator};

// External caps mirroring the upstream APIs' behavior
const MAX_RESULTS_CAP: usize = 200;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Search {
            source,
            author,
            title,
            max_results,
            lang,
            output,
        } => {
            let kind = SourceKind::parse(&source)?;
            let query = SearchQuery {
                author,
                title,
                max_results: max_results.min(MAX_RESULTS_CAP),
            };
            run_search(&config, kind, query, &lang, output).await?;
        }
        Commands::CheckTranslator => {
            match check_local_availability(&config.translate.local_endpoint).await {
                Ok(()) => println!(
                    "Local MT server at {} is available",
                    config.translate.local_endpoint
                ),
                Err(e) => println!("Local MT server unavailable ({})", e),
            }
            match check_remote_availability(
                &config.translate.remote_endpoint,
                config.translate.remote_api_key.as_deref(),
            )
            .await
            {
                Ok(()) => println!(
                    "Remote translation API at {} is available",
                    config.translate.remote_endpoint
                ),
                Err(e) => println!("Remote translation API unavailable ({})", e),
            }
        }
        Commands::InitConfig { path } => {
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Fetch, normalize and optionally translate one search, then write the
/// JSON report to stdout or a file.
async fn run_search(
    config: &Config,
    kind: SourceKind,
    query: SearchQuery,
    lang: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if query.is_empty() {
        return Err(BookmeshError::Config("Author or title required".to_string()).into());
    }

    let start = Instant::now();
    let source = SourceFactory::create_source(kind, &config.sources, lang);
    info!("Searching {} (lang: {})", source.name(), lang);

    let deadline = Duration::from_secs(config.request_timeout_secs);
    let report = tokio::time::timeout(deadline, build_report(config, source.as_ref(), query, lang, start))
        .await
        .map_err(|_| BookmeshError::Timeout(config.request_timeout_secs))??;

    let rendered = serde_json::to_string_pretty(&report).map_err(BookmeshError::from)?;
    match output {
        Some(path) => {
            std::fs::write(&path, rendered).map_err(BookmeshError::from)?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn build_report(
    config: &Config,
    source: &dyn bookmesh::sources::BookSource,
    query: SearchQuery,
    lang: &str,
    start: Instant,
) -> Result<Value, BookmeshError> {
    let records = source.search(&query).await?;
    info!("Fetched {} raw records", records.len());

    let opts = NormalizeOptions {
        default_language: config.sources.openlib.default_language.clone(),
        default_summary: config.sources.openlib.default_summary.clone(),
    };
    let results = normalize(&records, &opts);
    info!(
        "Normalized into {} books, {} authors, {} genres",
        results.books.len(),
        results.authors.len(),
        results.genres.len()
    );

    let report = SearchReport::new(source.name(), query, results, start.elapsed(), lang);
    let mut value = serde_json::to_value(&report)?;

    // Source data is English; any other output language means the data
    // section goes through the tree translator. Metadata stays verbatim.
    if lang != "en" {
        let mut translate_config = config.translate.clone();
        translate_config.target_language = lang.to_string();

        let translator = TranslatorFactory::select(&translate_config).await;
        let tree = TreeTranslator::with_chunk_size(translator.as_ref(), translate_config.chunk_size);

        match tree.translate(&value["data"]).await {
            Ok(translated) => value["data"] = translated,
            Err(e) => {
                // All-or-nothing: on failure return the untranslated data
                warn!("Translation failed ({}), returning untranslated data", e);
            }
        }
    }

    Ok(value)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let bookmesh_dir = std::env::current_dir()?.join(".bookmesh");
    let log_dir = bookmesh_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "bookmesh.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("bookmesh.log").display()
    );

    Ok(())
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use bookwormz::app::enrich_use_case::EnrichUseCase;
use bookwormz::app::load_books_use_case::LoadBooksUseCase;
use bookwormz::app::ports::HttpClientPort;
use bookwormz::config::Config;
use bookwormz::domain::BookRecord;
use bookwormz::infra::http_client::ReqwestHttp;
use bookwormz::logging;
use bookwormz::pipeline::{build_view, FeedSource, Filter, SortKey};
use bookwormz::render;

#[derive(Parser)]
#[command(name = "bookwormz")]
#[command(about = "Book club leaderboard from a published spreadsheet")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./bookwormz.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Published spreadsheet CSV URL (overrides config)
    #[arg(long, conflicts_with = "input")]
    feed_url: Option<String>,
    /// Read the CSV from a local file instead of fetching it
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the sheet and print the leaderboard, streaming catalog ratings
    Leaderboard {
        #[command(flatten)]
        source: SourceArgs,
        /// Only show books picked by this member ("All" for everyone)
        #[arg(long)]
        picker: Option<String>,
        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,
        /// date, score or title
        #[arg(long, default_value = "date")]
        sort: SortKey,
        /// Skip catalog rating lookups
        #[arg(long)]
        no_enrich: bool,
        /// Catalog lookups in flight at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Wait for enrichment and print the view model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the normalized book records as JSON
    Parse {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Look up a single book in the catalog
    Lookup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
    },
}

fn feed_source(config: &Config, args: &SourceArgs) -> anyhow::Result<FeedSource> {
    if let Some(path) = &args.input {
        return Ok(FeedSource::File(path.clone()));
    }
    if let Some(url) = &args.feed_url {
        return Ok(FeedSource::Url(url.clone()));
    }
    Ok(FeedSource::Url(config.feed_url()?.to_string()))
}

async fn load_books(
    http: Arc<dyn HttpClientPort>,
    config: &Config,
    source: &SourceArgs,
) -> anyhow::Result<Vec<BookRecord>> {
    let source = feed_source(config, source)?;
    Ok(LoadBooksUseCase::with_defaults(http).load(&source).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    // Errors surface once, through the log; returning lets the file writer flush
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new());

    match cli.command {
        Commands::Leaderboard { source, picker, search, sort, no_enrich, concurrency, json } => {
            if let Some(n) = concurrency {
                config.enrichment.concurrency = n.max(1);
            }
            let books = load_books(Arc::clone(&http), &config, &source).await?;
            let filter = Filter { picker, search };
            let enrich = config.enrichment.enabled && !no_enrich;
            let enricher = EnrichUseCase::with_google_books(
                Arc::clone(&http),
                &config.catalog,
                &config.enrichment,
            );

            if json {
                if enrich {
                    let matched = enricher.start(&books).finish().await;
                    info!("Catalog matched {} of {} books", matched, books.len());
                }
                let view = build_view(&books, &filter, sort, &enricher.store().snapshot());
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            // Show the list right away; ratings stream in afterwards
            let view = build_view(&books, &filter, sort, &enricher.store().snapshot());
            print!("{}", render::render_view(&view));

            if enrich {
                let shown: Vec<BookRecord> = view.books.into_iter().map(|c| c.book).collect();
                let mut handle = enricher.start(&shown);
                if handle.total() > 0 {
                    println!("Catalog ratings:");
                }
                while let Some(update) = handle.next_update().await {
                    let line = update
                        .catalog
                        .as_ref()
                        .and_then(render::catalog_line)
                        .unwrap_or_else(|| "no rating found".to_string());
                    println!("  {}: {}", update.title, line);
                }
                handle.finish().await;
            }
        }
        Commands::Parse { source } => {
            let books = load_books(http, &config, &source).await?;
            let records: Vec<serde_json::Value> = books
                .iter()
                .map(|b| serde_json::json!({ "status": b.status(), "record": b }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Lookup { title, author, isbn } => {
            let enricher =
                EnrichUseCase::with_google_books(http, &config.catalog, &config.enrichment);
            let found = enricher.lookup(isbn.as_deref(), &title, author.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
    }
    Ok(())
}

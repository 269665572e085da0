use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hub_ingest::{CatalogService, SourceClassScanner, WatchBackend};
use hub_search::QueryEngine;
use hub_store::CatalogStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod resource;

use resource::ResourceExtractor;

#[derive(Parser)]
#[command(name = "keyword-hub")]
#[command(about = "Searchable catalog of keyword documentation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog database file (default: in-memory, discarded on exit)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest artifacts into the catalog
    Load(LoadArgs),

    /// List collections
    List(ListArgs),

    /// Search keywords (`name:` and `in:` modifiers supported)
    Search(SearchArgs),
}

#[derive(Args)]
struct LoadArgs {
    /// Files, directories, or logical library names
    paths: Vec<String>,

    /// Sweep this directory for installed libraries
    #[arg(long)]
    libdir: Option<PathBuf>,

    /// Keep running and reindex when watched directories change
    #[arg(long)]
    watch: bool,

    /// Use the polling watch backend instead of OS events
    #[arg(long)]
    poll: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Collection name pattern
    #[arg(default_value = "*")]
    pattern: String,

    /// Collection kind pattern
    #[arg(long, default_value = "*")]
    kind: String,
}

#[derive(Args)]
struct SearchArgs {
    /// Query, e.g. `click`, `name: open*`, `screenshot in:Selenium*`
    query: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let store = Arc::new(match &cli.db {
        Some(path) => CatalogStore::open(path)
            .with_context(|| format!("cannot open catalog at {}", path.display()))?,
        None => CatalogStore::open_in_memory().context("cannot open in-memory catalog")?,
    });

    match cli.command {
        Commands::Load(args) => cmd_load(store, args),
        Commands::List(args) => cmd_list(store, args),
        Commands::Search(args) => cmd_search(store, args),
    }
}

fn cmd_load(store: Arc<CatalogStore>, args: LoadArgs) -> Result<()> {
    let backend = if args.poll {
        WatchBackend::Polling
    } else {
        WatchBackend::Native
    };
    let service = CatalogService::new(
        store,
        Arc::new(ResourceExtractor),
        Arc::new(SourceClassScanner),
        backend,
    )?;

    for path in &args.paths {
        let report = service.add(path, args.watch);
        println!("{path}: {report}");
    }
    if let Some(libdir) = &args.libdir {
        let report = service.add_installed_libraries(libdir);
        println!("{}: {report}", libdir.display());
    }

    if args.watch {
        log::info!(
            "watching {} directories; interrupt to stop",
            service.watched_count()
        );
        loop {
            std::thread::sleep(Duration::from_secs(3600));
        }
    }
    Ok(())
}

fn cmd_list(store: Arc<CatalogStore>, args: ListArgs) -> Result<()> {
    let engine = QueryEngine::new(store);
    for collection in engine.list_collections(&args.pattern, &args.kind)? {
        let path = collection.path.unwrap_or_default();
        println!(
            "{:5}  {:30}  {:10}  {}",
            collection.collection_id, collection.name, collection.kind, path
        );
        if !collection.synopsis.is_empty() {
            println!("       {}", collection.synopsis);
        }
    }
    Ok(())
}

fn cmd_search(store: Arc<CatalogStore>, args: SearchArgs) -> Result<()> {
    let engine = QueryEngine::new(store);
    let query = args.query.join(" ");
    let hits = engine.search(&query)?;
    for hit in &hits {
        println!(
            "{}.{}: {}",
            hit.collection_name, hit.keyword_name, hit.synopsis
        );
    }
    log::info!("{} keywords matched", hits.len());
    Ok(())
}

//! Serve search and intersect requests over stdin/stdout.
//!
//! Usage: `param-worker [CONFIG] [DATASET_DIR]`
//!
//! Requests and responses are `<requestId>|<operation>|<json>` lines. Logs
//! go to stderr and honour `RUST_LOG`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use param_search::config::EngineConfig;
use param_search::dataset::DatasetCatalog;
use param_search::protocol::{serve, WorkerPool};

const DEFAULT_CONFIG: &str = "param-search.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        eprintln!("usage: param-worker [CONFIG] [DATASET_DIR]");
        return Ok(());
    }

    let config_path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = EngineConfig::load(&config_path)?;
    if let Some(dir) = args.get(1) {
        config.dataset_dir = Some(PathBuf::from(dir));
    }

    let dataset_dir = config
        .dataset_dir
        .clone()
        .context("no dataset directory given in config or on the command line")?;
    let catalog = DatasetCatalog::load_dir(&dataset_dir)
        .with_context(|| format!("loading datasets from {}", dataset_dir.display()))?;
    if catalog.is_empty() {
        bail!("no datasets found in {}", dataset_dir.display());
    }

    let manifest = catalog.manifest();
    info!(
        datasets = manifest.dataset_count,
        manifest = %serde_json::to_string(&manifest)?,
        "Catalog ready"
    );

    let pool = WorkerPool::new(Arc::new(catalog), &config)?;
    let stats = serve(&pool, io::stdin().lock(), io::stdout())?;
    info!(
        requests = stats.requests,
        rejected = stats.rejected,
        "Input closed, shutting down"
    );
    pool.shutdown();

    Ok(())
}

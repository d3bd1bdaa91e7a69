//! Loads a JSON register dataset into the configured database.

mod dataset;

use anyhow::Context;
use clap::Parser;
use cr_config::Settings;
use cr_db_sqlite::{SqliteCityRightsRepo, SqliteTodoRepo};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Import a city-rights dataset")]
struct Args {
    /// Path to the JSON dataset
    dataset: PathBuf,

    /// Database URL, overriding the configured one
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&settings.log.level));
    if let Some(path) = &settings.env_file {
        log::debug!("Loaded environment from {}", path.display());
    }

    let raw = std::fs::read_to_string(&args.dataset)
        .with_context(|| format!("Failed to read {}", args.dataset.display()))?;
    let data: dataset::Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid dataset {}", args.dataset.display()))?;

    let url = args.database.unwrap_or(settings.database.url);
    let pool = cr_db_sqlite::connect(&url, settings.database.max_connections)
        .await
        .with_context(|| format!("Failed to open {url}"))?;

    let repo = SqliteCityRightsRepo::new(pool.clone());
    let todos = SqliteTodoRepo::new(pool);
    let summary = dataset::import(data, &repo, &todos).await.context("Import failed")?;

    log::info!("Imported into {url}: {summary:?}");
    Ok(())
}

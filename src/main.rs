//! Thin command line front for the search engine: reads settings from an
//! optional `clusterseek.toml` (or `CLUSTERSEEK_*` environment variables),
//! runs the search given on the command line against the configured catalog
//! and prints the result as JSON.

use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clusterseek::catalog::Catalog;
use clusterseek::engine::Engine;
use clusterseek::error::{ClusterseekError, Result};

#[derive(Debug, Deserialize)]
struct Settings {
    catalog: String,
    offset: usize,
    limit: usize,
}

fn load_settings() -> Result<Settings> {
    let settings = config::Config::builder()
        .set_default("catalog", "catalog.db")?
        .set_default("offset", 0i64)?
        .set_default("limit", 0i64)?
        .add_source(config::File::with_name("clusterseek").required(false))
        .add_source(config::Environment::with_prefix("CLUSTERSEEK"))
        .build()?;
    Ok(settings.try_deserialize()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = load_settings()?;
    let search_string = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    let connection = Connection::open(&settings.catalog)?;
    let mut catalog = Catalog::new(&connection)?;
    let mut engine = Engine::new(&mut catalog);
    let result = engine.search(&search_string, settings.offset, settings.limit)?;
    info!(total = result.total, returned = result.clusters.len(), "search finished");

    let rendered = serde_json::to_string_pretty(&result)
        .map_err(|e| ClusterseekError::Execution(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

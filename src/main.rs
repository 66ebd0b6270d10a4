use std::sync::Arc;
use std::time::Duration;

use catalog_engine::clock::SystemClock;
use catalog_engine::config::Config;
use catalog_engine::db::{BackgroundStore, FileStore};
use catalog_engine::models::EntryId;
use catalog_engine::services::providers::{fetch_snapshot, HttpCatalogProvider};
use catalog_engine::Personalizer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    // Fetch the catalog snapshot
    let provider = HttpCatalogProvider::new(
        config.catalog_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let snapshot = fetch_snapshot(&provider).await?;

    // Persisted records live in the data dir; writes happen off the main path
    let file_store = FileStore::open(&config.data_dir)?;
    let (store, writer) = BackgroundStore::new(Arc::new(file_store));

    let mut engine = Personalizer::load(
        Arc::new(store),
        Arc::new(SystemClock),
        config.engine_settings(),
    );
    engine.set_catalog(snapshot.entries);

    if !engine.onboarding_seen() {
        tracing::info!("First run, onboarding shown");
        engine.mark_onboarding_seen();
    }

    // Each argument is an entry the user opened, oldest first
    for id in std::env::args().skip(1) {
        let id = EntryId::from(id);
        if engine.state().entry(&id).is_none() {
            tracing::warn!(entry_id = %id, "Opened entry is not in the catalog");
        }
        engine.record_open(id);
    }

    let home = serde_json::to_value(engine.home_view())?;
    let stats = serde_json::to_value(engine.category_stats(&snapshot.categories))?;
    let output = serde_json::json!({
        "categories": snapshot.categories,
        "categoryStats": stats,
        "home": home,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    writer.shutdown().await;
    Ok(())
}

use tracing::instrument;

/// Catalog data provider abstraction
///
/// The catalog is the only data this application fetches over the network.
/// Providers deliver it as a full snapshot; the engine treats each snapshot
/// as immutable.
use crate::{
    error::AppResult,
    models::{CatalogEntry, CatalogSnapshot},
};

pub mod http;

pub use http::HttpCatalogProvider;

/// Trait for catalog sources
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch every catalog entry, in the provider's order
    async fn fetch_entries(&self) -> AppResult<Vec<CatalogEntry>>;

    /// Fetch the category labels
    async fn fetch_categories(&self) -> AppResult<Vec<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fetches entries and categories concurrently into one snapshot
#[instrument(skip(provider), fields(provider = provider.name()))]
pub async fn fetch_snapshot(provider: &dyn CatalogProvider) -> AppResult<CatalogSnapshot> {
    let (entries, categories) =
        tokio::try_join!(provider.fetch_entries(), provider.fetch_categories())?;

    tracing::info!(
        provider = provider.name(),
        entries = entries.len(),
        categories = categories.len(),
        "Catalog snapshot fetched"
    );

    Ok(CatalogSnapshot {
        entries,
        categories,
    })
}

/// Provider serving a fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    snapshot: CatalogSnapshot,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>, categories: Vec<String>) -> Self {
        Self {
            snapshot: CatalogSnapshot {
                entries,
                categories,
            },
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_entries(&self) -> AppResult<Vec<CatalogEntry>> {
        Ok(self.snapshot.entries.clone())
    }

    async fn fetch_categories(&self) -> AppResult<Vec<String>> {
        Ok(self.snapshot.categories.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

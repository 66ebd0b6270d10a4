/// Catalog REST API provider
///
/// API Flow:
/// 1. Entries: /applications/get_many?return_in_order=true → JSON array of applications
/// 2. Categories: /categories/get_all → `{ "categories": [...] }`
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ApiCategories, ApiEntry, CatalogEntry, ALL_CATEGORIES},
    services::providers::CatalogProvider,
};

#[derive(Clone)]
pub struct HttpCatalogProvider {
    http_client: HttpClient,
    api_url: String,
}

impl HttpCatalogProvider {
    /// Creates a provider for the API rooted at `api_url`
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> AppResult<serde_json::Value> {
        let url = format!("{}{}", self.api_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_entries(&self) -> AppResult<Vec<CatalogEntry>> {
        let body = self
            .get_json("/applications/get_many", &[("return_in_order", "true")])
            .await?;

        // Anything other than an array means "no entries"
        let raw = match body {
            serde_json::Value::Array(items) => items,
            other => {
                tracing::warn!(
                    kind = %json_kind(&other),
                    "Catalog API returned a non-array entry list"
                );
                return Ok(Vec::new());
            }
        };

        let mut entries = Vec::with_capacity(raw.len());
        for item in raw {
            match serde_json::from_value::<ApiEntry>(item) {
                Ok(api) => entries.push(CatalogEntry::from(api)),
                Err(e) => tracing::warn!(error = %e, "Skipping malformed catalog entry"),
            }
        }

        tracing::debug!(count = entries.len(), "Fetched catalog entries");
        Ok(entries)
    }

    async fn fetch_categories(&self) -> AppResult<Vec<String>> {
        let body = self.get_json("/categories/get_all", &[]).await?;
        let categories = serde_json::from_value::<ApiCategories>(body)
            .map(|c| c.categories)
            .unwrap_or_default();

        Ok(with_all_categories(categories))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Prepends the "all" label unless the API already lists it
fn with_all_categories(categories: Vec<String>) -> Vec<String> {
    if categories.iter().any(|c| c == ALL_CATEGORIES) {
        return categories;
    }
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(categories)
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryId;
    use mockito::{Matcher, Server};

    fn provider(url: &str) -> HttpCatalogProvider {
        HttpCatalogProvider::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_entries_maps_api_fields() {
        let mut server = Server::new_async().await;

        let _m = server
            .mock("GET", "/applications/get_many")
            .match_query(Matcher::UrlEncoded("return_in_order".into(), "true".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 1, "name": "Wallet", "category": "Финансы", "rating": 4.5,
                     "popularity": 900, "created_at": "2026-01-10T08:00:00",
                     "editors_choice": true, "fun_fact": "Built in a weekend"},
                    {"id": "2", "name": "Chess", "category": "Игры"},
                    {"name": "no id"}
                ]"#,
            )
            .create_async()
            .await;

        let entries = provider(&server.url()).fetch_entries().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, EntryId::from("1"));
        assert!(entries[0].editors_choice);
        assert!(entries[0].created_at.is_some());
        assert_eq!(entries[1].id, EntryId::from("2"));
        assert_eq!(entries[1].rating, 0.0);
    }

    #[tokio::test]
    async fn test_fetch_entries_non_array_is_empty() {
        let mut server = Server::new_async().await;

        let _m = server
            .mock("GET", "/applications/get_many")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "maintenance"}"#)
            .create_async()
            .await;

        let entries = provider(&server.url()).fetch_entries().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_entries_error_status() {
        let mut server = Server::new_async().await;

        let _m = server
            .mock("GET", "/applications/get_many")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let result = provider(&server.url()).fetch_entries().await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_fetch_categories_prepends_all() {
        let mut server = Server::new_async().await;

        let _m = server
            .mock("GET", "/categories/get_all")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"categories": ["Финансы", "Игры"]}"#)
            .create_async()
            .await;

        let categories = provider(&server.url()).fetch_categories().await.unwrap();
        assert_eq!(categories, vec![ALL_CATEGORIES, "Финансы", "Игры"]);
    }

    #[test]
    fn test_with_all_categories_keeps_existing_label() {
        let categories = vec!["Игры".to_string(), ALL_CATEGORIES.to_string()];
        assert_eq!(with_all_categories(categories.clone()), categories);
    }
}

// src/assets.rs
// =============================================================================
// Verifies the assets (images, scripts, stylesheets) used by crawled pages.
//
// How the HTTP verifier works:
// 1. Re-fetch every working page and collect its asset URLs
// 2. De-duplicate them - a logo used on 50 pages is checked once
// 3. Check each asset's status concurrently (HEAD, falling back to GET)
//
// Assets can live on any host, so unlike the crawler there is no
// same-origin rule.
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use url::Url;

use crate::checker;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::model::{AssetCheck, AssetOutcome, CrawlOutcome};

/// Checks the assets referenced by a set of pages
#[async_trait]
pub trait AssetVerifier: Send + Sync {
    async fn verify(&self, pages: &CrawlOutcome, config: &CrawlConfig) -> Result<AssetOutcome, CrawlError>;

    /// Releases pooled resources; called once per run on every exit path
    fn shutdown(&self) {}
}

/// Verifies assets over HTTP with reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpAssetVerifier;

impl HttpAssetVerifier {
    pub fn new() -> Self {
        HttpAssetVerifier
    }
}

#[async_trait]
impl AssetVerifier for HttpAssetVerifier {
    async fn verify(&self, pages: &CrawlOutcome, config: &CrawlConfig) -> Result<AssetOutcome, CrawlError> {
        let client = checker::build_client(config)?;
        let threads = config.http().http_threads;

        // Step 1: collect asset URLs from every working page.
        // BTreeSet de-duplicates and gives a stable order.
        let page_urls: Vec<String> = pages.working_pages().iter().map(|p| p.url.clone()).collect();
        let bodies: Vec<(Option<Url>, Option<String>)> = stream::iter(page_urls)
            .map(|page_url| {
                let client = &client;
                async move {
                    let fetched = checker::fetch_page(client, config, &page_url).await;
                    let base = fetched.final_url.or_else(|| Url::parse(&page_url).ok());
                    (base, fetched.body)
                }
            })
            .buffered(threads)
            .collect()
            .await;

        let mut asset_urls = BTreeSet::new();
        for (base, body) in bodies {
            let (Some(body), Some(base)) = (body, base) else {
                continue;
            };
            asset_urls.extend(checker::extract_asset_links(&body, &base).into_iter().map(String::from));
        }
        tracing::info!(assets = asset_urls.len(), "verifying assets");

        // Step 2: check every asset
        let checks: Vec<AssetCheck> = stream::iter(asset_urls)
            .map(|url| {
                let client = &client;
                async move {
                    let fetched = checker::fetch_status(client, config, &url).await;
                    AssetCheck::new(url, fetched.status_code, fetched.fetch_time_millis)
                }
            })
            .buffer_unordered(threads)
            .collect()
            .await;

        Ok(AssetOutcome::from_checks(checks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageCheck;

    #[tokio::test]
    async fn test_verifies_assets_of_working_pages() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<img src="/logo.png"><script src="/app.js"></script><img src="/logo.png">"#)
            .create_async()
            .await;
        let _logo = server.mock("HEAD", "/logo.png").with_status(200).create_async().await;
        let _app = server.mock("HEAD", "/app.js").with_status(404).create_async().await;

        let root = format!("{}/", server.url());
        let pages = CrawlOutcome::from_checks(vec![
            PageCheck::new(root.clone(), None, 200, 1),
            // Broken pages are not fetched for assets
            PageCheck::new(format!("{}/gone", server.url()), Some(root.clone()), 404, 1),
        ]);
        let config = CrawlConfig::builder(root).build().unwrap();

        let outcome = HttpAssetVerifier::new().verify(&pages, &config).await.unwrap();

        assert_eq!(outcome.working_assets().len(), 1);
        assert_eq!(outcome.broken_assets().len(), 1);
        assert_eq!(outcome.broken_assets()[0].url, format!("{}/app.js", server.url()));
        assert_eq!(outcome.broken_assets()[0].status_code, 404);
    }

    #[tokio::test]
    async fn test_assets_resolve_against_redirect_target() {
        let mut server = mockito::Server::new_async().await;
        let _docs = server
            .mock("GET", "/docs")
            .with_status(301)
            .with_header("location", "/docs/")
            .create_async()
            .await;
        let _index = server
            .mock("GET", "/docs/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<img src="diagram.png">"#)
            .create_async()
            .await;
        let _diagram = server.mock("HEAD", "/docs/diagram.png").with_status(200).create_async().await;

        let start = format!("{}/docs", server.url());
        let pages = CrawlOutcome::from_checks(vec![PageCheck::new(start.clone(), None, 200, 1)]);
        let config = CrawlConfig::builder(start).build().unwrap();

        let outcome = HttpAssetVerifier::new().verify(&pages, &config).await.unwrap();

        assert!(outcome.broken_assets().is_empty());
        assert_eq!(outcome.working_assets()[0].url, format!("{}/docs/diagram.png", server.url()));
    }

    #[tokio::test]
    async fn test_no_pages_means_no_assets() {
        let config = CrawlConfig::builder("http://site.test/").build().unwrap();
        let outcome = HttpAssetVerifier::new()
            .verify(&CrawlOutcome::default(), &config)
            .await
            .unwrap();
        assert_eq!(outcome.total(), 0);
    }
}

// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling with a breadth-first approach.
//
// How it works:
// 1. Start with the initial URL as level 1
// 2. Fetch every page of the current level (concurrently, bounded)
// 3. Record a PageCheck for each one - working or broken
// 4. Extract same-origin links from the pages that returned HTML
// 5. Links not seen before (and allowed by the path filters) form the next level
// 6. Repeat until the queue is empty or max_levels is reached
// 7. Links found on the last level are status-checked but not parsed
//
// Every URL remembers the first page that linked to it (the referer), so a
// broken link can be traced back to where it was found.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - Streams with .buffered(n): Run n fetches at once, keep results in order
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

use super::Crawler;
use crate::checker::{self, Fetched};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::model::{CrawlOutcome, PageCheck};

// Represents a page waiting to be fetched
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    referer: Option<String>,
}

/// Crawls a site over HTTP with reqwest
///
/// Holds no state between runs: each `crawl()` builds its own client (and
/// connection pool), which is dropped when the crawl returns.
#[derive(Debug, Clone, Default)]
pub struct HttpCrawler;

impl HttpCrawler {
    pub fn new() -> Self {
        HttpCrawler
    }
}

#[async_trait]
impl Crawler for HttpCrawler {
    async fn crawl(&self, config: &CrawlConfig) -> Result<CrawlOutcome, CrawlError> {
        let client = checker::build_client(config)?;

        let mut start = config.start_url().clone();
        start.set_fragment(None);
        let origin = start.origin();

        // Track visited URLs to avoid checking the same page twice
        let mut visited = HashSet::new();
        visited.insert(start.to_string());

        let mut checks = Vec::new();
        let mut level = vec![CrawlItem {
            url: start.clone(),
            referer: None,
        }];

        for depth in 1..=config.max_levels() {
            if level.is_empty() {
                break;
            }
            tracing::info!(depth, pages = level.len(), "crawling level");

            let fetched = fetch_all(&client, config, level, FetchKind::Page).await;

            if depth == 1 {
                if let Some((item, result)) = fetched.first() {
                    if !result.responded() {
                        return Err(CrawlError::StartUnreachable {
                            url: item.url.to_string(),
                            reason: result.error.clone().unwrap_or_else(|| "no response".to_string()),
                        });
                    }
                }
            }

            let mut next = Vec::new();
            for (item, result) in fetched {
                // A redirected page's links are relative to where it landed
                let base = result.final_url.clone().unwrap_or_else(|| item.url.clone());
                if base != item.url {
                    visited.insert(base.to_string());
                }
                if let Some(body) = &result.body {
                    for link in checker::extract_page_links(body, &base) {
                        if link.origin() != origin || !config.allows_path(link.path()) {
                            continue;
                        }
                        if visited.insert(link.to_string()) {
                            next.push(CrawlItem {
                                url: link,
                                referer: Some(item.url.to_string()),
                            });
                        }
                    }
                }
                checks.push(to_check(item, &result));
            }

            level = next;
        }

        // Whatever is left was linked from the deepest level; make sure
        // those links at least resolve
        if config.verify_urls() && !level.is_empty() {
            tracing::info!(urls = level.len(), "verifying links beyond the last level");
            let fetched = fetch_all(&client, config, level, FetchKind::StatusOnly).await;
            checks.extend(fetched.into_iter().map(|(item, result)| to_check(item, &result)));
        }

        Ok(CrawlOutcome::from_checks(checks))
    }
}

#[derive(Debug, Clone, Copy)]
enum FetchKind {
    Page,
    StatusOnly,
}

// Fetches a batch of URLs, at most `http_threads` at a time
//
// .buffered() (unlike .buffer_unordered()) yields results in input order,
// which keeps referers stable from one run to the next.
async fn fetch_all(
    client: &Client,
    config: &CrawlConfig,
    items: Vec<CrawlItem>,
    kind: FetchKind,
) -> Vec<(CrawlItem, Fetched)> {
    let futures = items.into_iter().map(|item| async move {
        let result = match kind {
            FetchKind::Page => checker::fetch_page(client, config, item.url.as_str()).await,
            FetchKind::StatusOnly => checker::fetch_status(client, config, item.url.as_str()).await,
        };
        (item, result)
    });

    stream::iter(futures)
        .buffered(config.http().http_threads)
        .collect()
        .await
}

fn to_check(item: CrawlItem, result: &Fetched) -> PageCheck {
    PageCheck::new(item.url, item.referer, result.status_code, result.fetch_time_millis)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why crawl level by level instead of one URL at a time?
//    - All pages of a level are independent, so they can be fetched together
//    - .buffered(n) keeps at most n requests in flight
//    - The next level only starts once the current one is done
//
// 2. What is Url::origin()?
//    - The (scheme, host, port) triple of a URL
//    - Two URLs with the same origin belong to the same site
//    - Unlike .domain(), it also works for IP addresses like 127.0.0.1
//
// 3. What does visited.insert() return?
//    - true if the value was NOT in the set yet
//    - So `if visited.insert(x)` means "first time we see x"
//
// 4. What is #[async_trait]?
//    - Lets a trait have async methods that work with dyn Trait
//    - It rewrites `async fn` into a method returning a boxed future
// -----------------------------------------------------------------------------

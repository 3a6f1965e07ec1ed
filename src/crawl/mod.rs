// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// The pipeline only talks to the `Crawler` trait, so the HTTP crawler can be
// swapped for something else (a test double, a sitemap reader...).
//
// Features of the HTTP crawler:
// - Breadth-first crawling starting from a URL
// - Respects same-origin restriction (doesn't crawl external sites)
// - Configurable depth limit and path filters
// - Bounded concurrency per level
// =============================================================================

mod queue;

use async_trait::async_trait;

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::model::CrawlOutcome;

pub use queue::HttpCrawler;

/// Discovers pages starting from the configured URL
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Crawls the site and classifies every page found
    ///
    /// Broken pages are part of the outcome. An `Err` means the crawl could
    /// not produce any result at all.
    async fn crawl(&self, config: &CrawlConfig) -> Result<CrawlOutcome, CrawlError>;

    /// Releases pooled resources (connections, workers)
    ///
    /// The pipeline calls this exactly once per run, on every exit path.
    fn shutdown(&self) {}
}

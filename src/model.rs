// src/model.rs
// =============================================================================
// The result model: what a crawl and an asset verification produce.
//
// - PageCheck / AssetCheck: the outcome of fetching ONE url
// - CrawlOutcome / AssetOutcome: all outcomes of a run, split into
//   "working" and "broken"
//
// Outcomes are built once from a list of checks and never change afterwards.
// Which side a check lands on is decided only by its status code.
//
// Rust concepts:
// - BTreeMap: A sorted map, used to de-duplicate by URL and keep a stable order
// - Iterators and IntoIterator: Building outcomes from any collection of checks
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::status;

/// Outcome of fetching one crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCheck {
    /// Absolute URL of the page
    pub url: String,
    /// The page that first linked here (None for the start URL)
    pub referer: Option<String>,
    /// HTTP status, or a sentinel from `status` for transport failures
    pub status_code: i32,
    /// How long the fetch took; 0 when timing is unavailable
    pub fetch_time_millis: u64,
}

impl PageCheck {
    pub fn new(url: impl Into<String>, referer: Option<String>, status_code: i32, fetch_time_millis: u64) -> Self {
        PageCheck {
            url: url.into(),
            referer,
            status_code,
            fetch_time_millis,
        }
    }

    pub fn is_working(&self) -> bool {
        status::is_working(self.status_code)
    }
}

/// Outcome of fetching one asset (image, script, stylesheet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCheck {
    pub url: String,
    pub status_code: i32,
    pub fetch_time_millis: u64,
}

impl AssetCheck {
    pub fn new(url: impl Into<String>, status_code: i32, fetch_time_millis: u64) -> Self {
        AssetCheck {
            url: url.into(),
            status_code,
            fetch_time_millis,
        }
    }

    pub fn is_working(&self) -> bool {
        status::is_working(self.status_code)
    }
}

/// All page outcomes of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlOutcome {
    working_pages: Vec<PageCheck>,
    broken_pages: Vec<PageCheck>,
}

impl CrawlOutcome {
    /// Builds an outcome from individual page checks
    ///
    /// If the same URL shows up twice, the first check wins.
    pub fn from_checks(checks: impl IntoIterator<Item = PageCheck>) -> Self {
        let (working_pages, broken_pages) = partition_by_url(checks, |c| &c.url, PageCheck::is_working);
        CrawlOutcome {
            working_pages,
            broken_pages,
        }
    }

    /// Working pages, sorted by URL
    pub fn working_pages(&self) -> &[PageCheck] {
        &self.working_pages
    }

    /// Broken pages, sorted by URL
    pub fn broken_pages(&self) -> &[PageCheck] {
        &self.broken_pages
    }

    pub fn total(&self) -> usize {
        self.working_pages.len() + self.broken_pages.len()
    }
}

/// All asset outcomes of one verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetOutcome {
    working_assets: Vec<AssetCheck>,
    broken_assets: Vec<AssetCheck>,
}

impl AssetOutcome {
    /// Builds an outcome from individual asset checks (first check per URL wins)
    pub fn from_checks(checks: impl IntoIterator<Item = AssetCheck>) -> Self {
        let (working_assets, broken_assets) = partition_by_url(checks, |c| &c.url, AssetCheck::is_working);
        AssetOutcome {
            working_assets,
            broken_assets,
        }
    }

    pub fn working_assets(&self) -> &[AssetCheck] {
        &self.working_assets
    }

    pub fn broken_assets(&self) -> &[AssetCheck] {
        &self.broken_assets
    }

    pub fn total(&self) -> usize {
        self.working_assets.len() + self.broken_assets.len()
    }
}

// De-duplicates checks by URL and splits them into (working, broken)
//
// Both halves come out sorted by URL because BTreeMap iterates in key order.
fn partition_by_url<T>(
    checks: impl IntoIterator<Item = T>,
    url_of: impl Fn(&T) -> &String,
    is_working: impl Fn(&T) -> bool,
) -> (Vec<T>, Vec<T>) {
    let mut by_url: BTreeMap<String, T> = BTreeMap::new();
    for check in checks {
        let url = url_of(&check).clone();
        by_url.entry(url).or_insert(check);
    }

    by_url.into_values().partition(|c| is_working(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_split_by_status() {
        let outcome = CrawlOutcome::from_checks(vec![
            PageCheck::new("http://site.test/", None, 200, 10),
            PageCheck::new("http://site.test/missing", Some("http://site.test/".into()), 404, 5),
            PageCheck::new("http://site.test/moved", Some("http://site.test/".into()), 301, 5),
        ]);

        assert_eq!(outcome.working_pages().len(), 2);
        assert_eq!(outcome.broken_pages().len(), 1);
        assert_eq!(outcome.broken_pages()[0].url, "http://site.test/missing");
        assert_eq!(outcome.total(), 3);
    }

    #[test]
    fn test_duplicate_url_keeps_first_check() {
        let outcome = CrawlOutcome::from_checks(vec![
            PageCheck::new("http://site.test/a", None, 200, 10),
            PageCheck::new("http://site.test/a", None, 500, 10),
        ]);

        assert_eq!(outcome.working_pages().len(), 1);
        assert!(outcome.broken_pages().is_empty());
    }

    #[test]
    fn test_entries_are_sorted_by_url() {
        let outcome = AssetOutcome::from_checks(vec![
            AssetCheck::new("http://site.test/z.js", 200, 1),
            AssetCheck::new("http://site.test/a.css", 200, 1),
            AssetCheck::new("http://site.test/m.png", 200, 1),
        ]);

        let urls: Vec<_> = outcome.working_assets().iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["http://site.test/a.css", "http://site.test/m.png", "http://site.test/z.js"]);
    }

    #[test]
    fn test_transport_sentinel_is_broken() {
        let check = AssetCheck::new("http://site.test/x.png", status::TIMEOUT, 0);
        assert!(!check.is_working());
    }
}

// src/report/mod.rs
// =============================================================================
// The report document: a format-agnostic tree of test suites and test cases.
//
// build_report() turns crawl/asset outcomes into this tree. The submodules
// turn the tree into text:
// - junit: JUnit-style XML (what CI servers understand)
// - json: a machine-readable JSON summary
// - writer: renders with one of the above, logs it, writes it to disk
//
// Every URL becomes one test case. Broken URLs become failing test cases.
// =============================================================================

mod json;
mod junit;
mod writer;

pub use json::JsonSummary;
pub use junit::JunitXml;
pub use writer::{ReportFormat, ReportWriter};

use serde::Serialize;

use crate::model::{AssetCheck, AssetOutcome, CrawlOutcome, PageCheck};
use crate::status::friendly_name;
use crate::verdict::NO_REFERER;

pub const PAGES_SUITE: &str = "Crawled pages";
pub const ASSETS_SUITE: &str = "Crawled assets";

/// The whole report: an ordered list of suites
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub suites: Vec<TestSuite>,
}

impl VerificationReport {
    pub fn total_failures(&self) -> usize {
        self.suites.iter().map(TestSuite::failures).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn tests(&self) -> usize {
        self.cases.len()
    }

    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|c| c.failure_message.is_some()).count()
    }

    /// Total time in milliseconds; summed as integers so the seconds value
    /// does not pick up floating point noise
    pub fn time_millis(&self) -> u64 {
        self.cases.iter().map(|c| c.time_millis).sum()
    }

    pub fn time_seconds(&self) -> f64 {
        self.time_millis() as f64 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub name: String,
    pub status: String,
    pub time_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

impl TestCase {
    pub fn time_seconds(&self) -> f64 {
        self.time_millis as f64 / 1000.0
    }

    pub fn is_failure(&self) -> bool {
        self.failure_message.is_some()
    }
}

// Builds the report tree
//
// The pages suite is always present. The assets suite only exists when
// assets were verified - "not verified" and "verified, nothing found"
// are different things.
pub fn build_report(pages: &CrawlOutcome, assets: Option<&AssetOutcome>) -> VerificationReport {
    let mut suites = vec![pages_suite(pages)];
    if let Some(assets) = assets {
        suites.push(assets_suite(assets));
    }
    VerificationReport { suites }
}

fn pages_suite(outcome: &CrawlOutcome) -> TestSuite {
    let working = outcome.working_pages().iter().map(|page| page_case(page, None));
    let broken = outcome.broken_pages().iter().map(|page| {
        let message = format!(
            "The url {} got {} and is linked from {}",
            page.url,
            friendly_name(page.status_code),
            page.referer.as_deref().unwrap_or(NO_REFERER)
        );
        page_case(page, Some(message))
    });

    TestSuite {
        name: PAGES_SUITE.to_string(),
        cases: working.chain(broken).collect(),
    }
}

fn assets_suite(outcome: &AssetOutcome) -> TestSuite {
    let working = outcome.working_assets().iter().map(|asset| asset_case(asset, None));
    let broken = outcome.broken_assets().iter().map(|asset| {
        let message = format!("The asset {} got {}", asset.url, friendly_name(asset.status_code));
        asset_case(asset, Some(message))
    });

    TestSuite {
        name: ASSETS_SUITE.to_string(),
        cases: working.chain(broken).collect(),
    }
}

fn page_case(page: &PageCheck, failure_message: Option<String>) -> TestCase {
    TestCase {
        name: case_name(&page.url),
        status: friendly_name(page.status_code),
        time_millis: page.fetch_time_millis,
        failure_message,
    }
}

fn asset_case(asset: &AssetCheck, failure_message: Option<String>) -> TestCase {
    TestCase {
        name: case_name(&asset.url),
        status: friendly_name(asset.status_code),
        time_millis: asset.fetch_time_millis,
        failure_message,
    }
}

// CI report parsers choke on '&' in test names, so swap it out
pub fn case_name(url: &str) -> String {
    url.replace('&', "_")
}

// src/lib.rs
// =============================================================================
// site-verifier as a library: crawl a site, judge it, write a JUnit report.
//
// Modules, from the bottom up:
// - status:   status code -> label ("Not Found"), working/broken rule
// - model:    PageCheck, AssetCheck and the working/broken outcomes
// - verdict:  pass/fail plus summary lines for the build log
// - report:   the report document and its renderers/writer
// - config:   the immutable per-run configuration
// - checker:  HTTP fetching and HTML link extraction
// - crawl:    the Crawler trait and the HTTP crawler
// - assets:   the AssetVerifier trait and the HTTP asset verifier
// - pipeline: runs all of the above in order
// =============================================================================

pub mod assets;
pub mod checker;
pub mod config;
pub mod crawl;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod status;
pub mod verdict;

pub use assets::{AssetVerifier, HttpAssetVerifier};
pub use config::{CrawlConfig, CrawlConfigBuilder, Credentials, HttpSettings};
pub use crawl::{Crawler, HttpCrawler};
pub use error::{ConfigError, CrawlError, PipelineError, WriteError};
pub use model::{AssetCheck, AssetOutcome, CrawlOutcome, PageCheck};
pub use pipeline::{Pipeline, RunOptions, RunOutcome};
pub use report::{build_report, ReportFormat, ReportWriter, VerificationReport};
pub use verdict::{evaluate_assets, evaluate_pages, Verdict};

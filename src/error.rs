// src/error.rs
// =============================================================================
// Error types for the verification pipeline.
//
// - ConfigError: bad input, caught before any network traffic
// - CrawlError: the crawl could not produce any result at all
// - WriteError: the report could not be saved
// - PipelineError: the fatal ones (config or crawl), wrapped for the caller
//
// Broken pages are NOT errors - they are data, recorded in the report.
//
// We use `thiserror` here (typed errors for a library) and `anyhow` only in
// main.rs (convenient errors for an application).
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set a start url")]
    EmptyUrl,

    #[error("The url must start with http:// or https:// (got '{0}')")]
    UnsupportedScheme(String),

    #[error("Invalid start url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Crawl level must be at least 1")]
    ZeroLevel,

    #[error("{0} must be greater than zero")]
    ZeroSetting(&'static str),

    #[error("Follow path and not-follow path are both '{0}', nothing could be crawled")]
    ConflictingPaths(String),

    #[error("Login and password must be given together")]
    IncompleteCredentials,
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Start url {url} did not respond ({reason})")]
    StartUnreachable { url: String, reason: String },
}

#[derive(Debug, Error)]
#[error("Couldn't write report to {}: {source}", .destination.display())]
pub struct WriteError {
    pub destination: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),
}

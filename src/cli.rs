// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The parsed arguments are turned into:
// - a CrawlConfigBuilder (validated later into a CrawlConfig)
// - RunOptions (assets on/off, where to write the report)
// - a ReportWriter for the chosen output format
//
// Rust concepts:
// - Derive macros: Parser and ValueEnum generate the parsing code
// - Option<T>: Flags the user may leave out
// =============================================================================

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use site_verifier::config::{CrawlConfig, CrawlConfigBuilder, HttpSettings};
use site_verifier::pipeline::{RunOptions, DEFAULT_REPORT_FILE};
use site_verifier::report::{JsonSummary, JunitXml, ReportWriter};

// This struct represents our entire CLI application
//
// No Debug derive on purpose: it would print the password.
#[derive(Parser)]
#[command(
    name = "site-verifier",
    version,
    about = "Crawl a website and fail the build on broken pages or assets",
    long_about = "site-verifier crawls a website from a start URL, checks every internal page it finds \
                  (and optionally every image, script and stylesheet), writes a JUnit XML report and \
                  exits non-zero if anything is broken. Built for CI pipelines."
)]
pub struct Cli {
    /// Start URL of the crawl (must begin with http:// or https://)
    pub url: String,

    /// How many levels deep to crawl (1 = the start page and its links)
    #[arg(short, long, default_value_t = 1)]
    pub level: usize,

    /// Also verify images, scripts and stylesheets of every working page
    #[arg(long)]
    pub verify_assets: bool,

    /// Only follow URLs whose path starts with this prefix
    #[arg(long)]
    pub follow_path: Option<String>,

    /// Do not follow URLs whose path starts with this prefix
    #[arg(long)]
    pub not_follow_path: Option<String>,

    /// Login for HTTP basic auth (sent only to the start URL's host)
    #[arg(long)]
    pub login: Option<String>,

    /// Password for HTTP basic auth
    #[arg(long, env = "SITE_VERIFIER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Maximum number of concurrent HTTP requests
    #[arg(long, default_value_t = 10)]
    pub http_threads: usize,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub socket_timeout: u64,

    /// Connection timeout in milliseconds
    #[arg(long, default_value_t = 5_000)]
    pub connection_timeout: u64,

    /// Where to write the report
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Junit)]
    pub format: OutputFormat,
}

/// Report formats the CLI can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JUnit-style XML (what most CI servers read)
    Junit,
    /// JSON summary
    Json,
}

impl Cli {
    pub fn config_builder(&self) -> CrawlConfigBuilder {
        let http = HttpSettings {
            http_threads: self.http_threads,
            socket_timeout: Duration::from_millis(self.socket_timeout),
            connection_timeout: Duration::from_millis(self.connection_timeout),
            ..HttpSettings::default()
        };

        let mut builder = CrawlConfig::builder(self.url.clone())
            .with_max_levels(self.level)
            .with_http(http);

        if let Some(path) = &self.follow_path {
            builder = builder.with_only_on_path(path.clone());
        }
        if let Some(path) = &self.not_follow_path {
            builder = builder.with_not_on_path(path.clone());
        }
        if let Some(login) = &self.login {
            builder = builder.with_login(login.clone());
        }
        if let Some(password) = &self.password {
            builder = builder.with_password(password.clone());
        }
        builder
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            verify_assets: self.verify_assets,
            report_path: self.output.clone(),
        }
    }

    pub fn report_writer(&self) -> ReportWriter {
        match self.format {
            OutputFormat::Junit => ReportWriter::new(Box::new(JunitXml)),
            OutputFormat::Json => ReportWriter::new(Box::new(JsonSummary)),
        }
    }
}

// src/pipeline.rs
// =============================================================================
// The pipeline ties everything together. One call = one verification run:
//
//   Crawl -> evaluate pages -> [verify assets -> evaluate assets]
//         -> build report -> write report -> verdict
//
// The run passes only if ALL of these hold:
// - no broken pages
// - no broken assets (when assets are verified)
// - the report was written
//
// Every check is evaluated even when an earlier one already failed, so the
// log and the report always show the full picture. The only early exit is a
// failed crawl: with no pages there is nothing to evaluate.
//
// Rust concepts:
// - Generics with trait bounds: Pipeline<C: Crawler, V: AssetVerifier>
// - Drop: A guard that releases collaborator resources on every exit path
// =============================================================================

use std::io::Write;
use std::path::PathBuf;

use crate::assets::AssetVerifier;
use crate::config::{CrawlConfig, CrawlConfigBuilder};
use crate::crawl::Crawler;
use crate::error::PipelineError;
use crate::report::{build_report, ReportWriter, VerificationReport};
use crate::verdict::{evaluate_assets, evaluate_pages};

/// Default report file name, relative to the working directory
pub const DEFAULT_REPORT_FILE: &str = "crawler-junit.xml";

/// Per-run options that are not about crawling
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub verify_assets: bool,
    pub report_path: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            verify_assets: false,
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub pages_ok: bool,
    /// None when asset verification was not requested
    pub assets_ok: Option<bool>,
    pub report_written: bool,
    pub report: VerificationReport,
}

impl RunOutcome {
    /// The build-level verdict
    pub fn passed(&self) -> bool {
        self.pages_ok && self.assets_ok.unwrap_or(true) && self.report_written
    }
}

/// Orchestrates one verification run
pub struct Pipeline<C, V> {
    crawler: C,
    verifier: V,
    writer: ReportWriter,
}

impl<C: Crawler, V: AssetVerifier> Pipeline<C, V> {
    pub fn new(crawler: C, verifier: V, writer: ReportWriter) -> Self {
        Pipeline {
            crawler,
            verifier,
            writer,
        }
    }

    // Validates the configuration, runs, and returns the overall verdict
    //
    // Fatal errors (bad configuration, failed crawl) are logged and count as
    // a failed run.
    pub async fn verify(&self, config: CrawlConfigBuilder, options: &RunOptions, log: &mut dyn Write) -> bool {
        match self.run_unvalidated(config, options, log).await {
            Ok(outcome) => outcome.passed(),
            Err(_) => false,
        }
    }

    // Validates the configuration, then runs
    //
    // An invalid configuration is logged and returned as
    // PipelineError::Config before anything is crawled.
    pub async fn run_unvalidated(
        &self,
        config: CrawlConfigBuilder,
        options: &RunOptions,
        log: &mut dyn Write,
    ) -> Result<RunOutcome, PipelineError> {
        let config = match config.build() {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "invalid configuration");
                let _ = writeln!(log, "Invalid configuration: {}", e);
                return Err(e.into());
            }
        };

        self.run(&config, options, log).await
    }

    // Runs the pipeline with an already validated configuration
    //
    // Returns Err only for a failed crawl; everything else (broken pages,
    // broken assets, a failed report write) is part of the RunOutcome.
    pub async fn run(
        &self,
        config: &CrawlConfig,
        options: &RunOptions,
        log: &mut dyn Write,
    ) -> Result<RunOutcome, PipelineError> {
        // Released when this function returns, whichever way it returns
        let _guard = ShutdownGuard {
            crawler: &self.crawler,
            verifier: &self.verifier,
        };

        let _ = writeln!(
            log,
            "Start crawling: {} for {} level(s){}",
            config.start_url(),
            config.max_levels(),
            if options.verify_assets { ", will verify assets" } else { "" }
        );
        if let Some(credentials) = config.auth() {
            let _ = writeln!(log, "Using basic auth for {} as {}", config.auth_host(), credentials.login);
        }

        // Crawl
        tracing::info!(url = %config.start_url(), "crawl started");
        let pages = match self.crawler.crawl(config).await {
            Ok(pages) => pages,
            Err(e) => {
                tracing::error!(error = %e, "crawl failed");
                let _ = writeln!(log, "Crawl failed: {}", e);
                return Err(e.into());
            }
        };

        // Evaluate pages
        let page_verdict = evaluate_pages(&pages);
        for line in &page_verdict.lines {
            let _ = writeln!(log, "{}", line);
        }

        // Verify and evaluate assets
        let assets = if options.verify_assets {
            tracing::info!(pages = pages.working_pages().len(), "asset verification started");
            match self.verifier.verify(&pages, config).await {
                Ok(assets) => Some(assets),
                Err(e) => {
                    tracing::error!(error = %e, "asset verification failed");
                    let _ = writeln!(log, "Asset verification failed: {}", e);
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        let asset_verdict = assets.as_ref().map(evaluate_assets);
        if let (Some(assets), Some(verdict)) = (&assets, &asset_verdict) {
            let _ = writeln!(
                log,
                "Verified {} asset(s): {} working, {} broken",
                assets.total(),
                assets.working_assets().len(),
                assets.broken_assets().len()
            );
            for line in &verdict.lines {
                let _ = writeln!(log, "{}", line);
            }
        }

        // Build and write the report
        let report = build_report(&pages, assets.as_ref());
        let report_written = match self.writer.write(&report, &options.report_path, log) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "report write failed");
                let _ = writeln!(log, "{}", e);
                false
            }
        };

        let outcome = RunOutcome {
            pages_ok: page_verdict.ok,
            assets_ok: asset_verdict.map(|v| v.ok),
            report_written,
            report,
        };
        let _ = writeln!(log, "Verification {}", if outcome.passed() { "passed" } else { "failed" });
        Ok(outcome)
    }
}

// Calls shutdown() on both collaborators when dropped
struct ShutdownGuard<'a> {
    crawler: &'a dyn Crawler,
    verifier: &'a dyn AssetVerifier,
}

impl Drop for ShutdownGuard<'_> {
    fn drop(&mut self) {
        self.crawler.shutdown();
        self.verifier.shutdown();
        tracing::debug!("collaborators shut down");
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a guard struct instead of calling shutdown() at the end?
//    - A function can return from many places (including `?` and early returns)
//    - Drop::drop runs whenever the guard goes out of scope, on every path
//    - It is the Rust version of try/finally
//
// 2. Why `let _ = writeln!(...)`?
//    - Writing to the log returns a Result
//    - A broken log sink should not stop the verification
//    - `let _ =` says "we know, and we ignore it on purpose"
//
// 3. Why &mut dyn Write for the log?
//    - The binary passes stdout, tests pass a Vec<u8> and read it back
//    - Both implement std::io::Write
// -----------------------------------------------------------------------------

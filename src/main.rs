// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up diagnostic logging (RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Validate them into a CrawlConfig
// 4. Run the verification pipeline, printing the build log to stdout
// 5. Exit with proper code (0 = passed, 1 = broken pages/assets or report
//    not written, 2 = error)
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

mod cli;

use clap::Parser;
use cli::Cli;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_verifier::{HttpAssetVerifier, HttpCrawler, Pipeline};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Fatal: bad configuration or the crawl could not start
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so stdout stays a clean build log
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = everything passed
//   Ok(1) = broken pages/assets, or the report could not be written
//   Err   = configuration error or failed crawl
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let options = cli.run_options();
    let pipeline = Pipeline::new(HttpCrawler::new(), HttpAssetVerifier::new(), cli.report_writer());

    let stdout = std::io::stdout();
    let mut log = stdout.lock();
    let outcome = pipeline.run_unvalidated(cli.config_builder(), &options, &mut log).await?;

    if outcome.passed() {
        Ok(0)
    } else {
        Ok(1)
    }
}

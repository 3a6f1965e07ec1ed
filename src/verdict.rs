// src/verdict.rs
// =============================================================================
// Decides whether a crawl (or an asset verification) passed, and produces the
// summary lines we show in the build log.
//
// The rule is simple: a result fails if and only if something is broken.
// An empty crawl (nothing reached) still passes - we only fail on broken
// entries, not on coverage.
//
// These functions are pure: they return data and never print anything.
// The pipeline decides where the lines go.
// =============================================================================

use crate::model::{AssetOutcome, CrawlOutcome};
use crate::status::friendly_name;

/// Pass/fail result plus the human-readable lines explaining it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub ok: bool,
    pub lines: Vec<String>,
}

/// Shown in place of a referer when a page has none (the start URL)
pub const NO_REFERER: &str = "<start>";

// Evaluates crawled pages
//
// Line order: totals, then one line per broken page, then one per working page
pub fn evaluate_pages(outcome: &CrawlOutcome) -> Verdict {
    let working = outcome.working_pages();
    let broken = outcome.broken_pages();

    let mut lines = vec![
        format!("Checked {} page(s)", working.len() + broken.len()),
        format!("Working pages: {}", working.len()),
        format!("Broken pages: {}", broken.len()),
    ];

    for page in broken {
        lines.push(format!(
            "{} {} linked from:{}",
            page.url,
            friendly_name(page.status_code),
            page.referer.as_deref().unwrap_or(NO_REFERER)
        ));
    }

    lines.extend(working.iter().map(|page| page.url.clone()));

    Verdict {
        ok: broken.is_empty(),
        lines,
    }
}

// Evaluates verified assets, same layout as pages minus the referer
pub fn evaluate_assets(outcome: &AssetOutcome) -> Verdict {
    let working = outcome.working_assets();
    let broken = outcome.broken_assets();

    let mut lines = vec![
        format!("Checked {} asset(s)", working.len() + broken.len()),
        format!("Working assets: {}", working.len()),
        format!("Broken assets: {}", broken.len()),
    ];

    for asset in broken {
        lines.push(format!("{} {}", asset.url, friendly_name(asset.status_code)));
    }

    lines.extend(working.iter().map(|asset| asset.url.clone()));

    Verdict {
        ok: broken.is_empty(),
        lines,
    }
}

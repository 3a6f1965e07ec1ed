// src/checker/mod.rs
// =============================================================================
// Low-level building blocks shared by the crawler and the asset verifier.
//
// Submodules:
// - http: Fetches URLs and classifies the outcome as a status code
// - html: Extracts page links and asset URLs from HTML
// =============================================================================

mod html;
mod http;

pub use html::{extract_asset_links, extract_page_links};
pub use http::{build_client, categorize_error, fetch_page, fetch_status, Fetched};

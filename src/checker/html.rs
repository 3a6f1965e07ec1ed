// src/checker/html.rs
// =============================================================================
// This module extracts links and assets from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Parse and validate URLs
// - Resolve relative URLs to absolute URLs
//
// Two kinds of things are extracted:
// - Page links: <a href="..."> - candidates for crawling
// - Assets: <img src>, <script src>, <link rel="stylesheet" href>
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

const PAGE_LINKS: &str = "a[href]";
const ASSET_SOURCES: [(&str, &str); 3] = [
    ("img[src]", "src"),
    ("script[src]", "src"),
    ("link[rel~=\"stylesheet\"][href]", "href"),
];

// Extracts all page links from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base: the URL of the page (for resolving relative links)
//
// Returns: absolute http(s) URLs without #fragments, in document order
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   base = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_page_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(PAGE_LINKS) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(base, href))
        .collect()
}

// Extracts image, script and stylesheet URLs from HTML content
//
// Assets may live on any host (CDNs are common), so there is no
// same-domain filter here.
pub fn extract_asset_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut assets = Vec::new();

    for (css, attribute) in ASSET_SOURCES {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        assets.extend(
            document
                .select(&selector)
                .filter_map(|element| element.value().attr(attribute))
                .filter_map(|value| resolve_url(base, value)),
        );
    }

    assets
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "javascript:void(0)" -> None (not HTTP)
//   href = "#top" -> None (same page)
fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let mut url = base.join(href).ok()?;
    if !is_checkable_link(&url) {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

// Only http and https can be checked; this skips mailto:, tel:,
// javascript:, data: and file: links
fn is_checkable_link(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is scraper and how does it work?
//    - scraper parses HTML into a tree structure (DOM)
//    - You can then query it using CSS selectors (like jQuery or querySelector)
//    - "a[href]" means "all <a> tags that have an href attribute"
//    - link[rel~="stylesheet"] matches rel="stylesheet" and rel="alternate stylesheet"
//
// 2. What does base.join(href) do?
//    - Resolves href the way a browser would
//    - Absolute hrefs replace the base, relative ones are applied to it
//
// 3. What is let-else?
//    - `let Ok(x) = expr else { return ...; };`
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, continue, break)
// -----------------------------------------------------------------------------

// src/checker/http.rs
// =============================================================================
// This module fetches URLs and turns the outcome into a status code.
//
// Key functionality:
// - Builds one reqwest Client per run from the run's HttpSettings
// - fetch_page: GET a page, keep the HTML body so we can look for links
// - fetch_status: HEAD a URL (falls back to GET if the server rejects HEAD)
// - Maps transport failures (timeout, DNS, SSL...) to sentinel codes
// - Sends basic auth, but only to the start URL's host
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - std::time::Instant: Measuring how long each fetch took
// =============================================================================

use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Instant;
use url::Url;

use crate::config::CrawlConfig;
use crate::status;

/// What we learned from fetching one URL
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status_code: i32,
    pub fetch_time_millis: u64,
    /// HTML body, only kept for successful text/html responses
    pub body: Option<String>,
    /// Short description of a transport failure, if there was one
    pub error: Option<String>,
    /// Where the request ended up after redirects; relative links in
    /// `body` resolve against this, not the requested URL
    pub final_url: Option<Url>,
}

impl Fetched {
    /// True if the server answered at all (even with an error status)
    pub fn responded(&self) -> bool {
        self.status_code > 0
    }
}

// Creates an HTTP client configured for this run
//
// The client holds the connection pool; it lives for one crawl or one
// verification and is dropped with it.
pub fn build_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let http = config.http();
    Client::builder()
        .timeout(http.socket_timeout)
        .connect_timeout(http.connection_timeout)
        .redirect(reqwest::redirect::Policy::limited(http.max_redirects))
        .user_agent(http.user_agent.clone())
        .build()
}

// Fetches a page with GET and keeps its HTML
pub async fn fetch_page(client: &Client, config: &CrawlConfig, url: &str) -> Fetched {
    let started = Instant::now();
    let response = match with_auth(client.get(url), config, url).send().await {
        Ok(response) => response,
        Err(e) => return transport_failure(url, &e, started),
    };

    let status_code = i32::from(response.status().as_u16());
    let final_url = response.url().clone();
    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    let body = if response.status().is_success() && is_html {
        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to read page body");
                None
            }
        }
    } else {
        None
    };

    let fetched = Fetched {
        status_code,
        fetch_time_millis: elapsed_millis(started),
        body,
        error: None,
        final_url: Some(final_url),
    };
    tracing::debug!(url, status = fetched.status_code, millis = fetched.fetch_time_millis, "fetched page");
    fetched
}

// Checks a URL's status without downloading the body
//
// Some servers answer HEAD with 405 Method Not Allowed or 501 Not
// Implemented even though GET works; in that case we retry with GET.
pub async fn fetch_status(client: &Client, config: &CrawlConfig, url: &str) -> Fetched {
    let started = Instant::now();
    let result = match with_auth(client.head(url), config, url).send().await {
        Ok(response)
            if matches!(response.status(), StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED) =>
        {
            with_auth(client.get(url), config, url).send().await
        }
        other => other,
    };

    let fetched = match result {
        Ok(response) => Fetched {
            status_code: i32::from(response.status().as_u16()),
            fetch_time_millis: elapsed_millis(started),
            body: None,
            error: None,
            final_url: Some(response.url().clone()),
        },
        Err(e) => transport_failure(url, &e, started),
    };
    tracing::debug!(url, status = fetched.status_code, millis = fetched.fetch_time_millis, "checked status");
    fetched
}

// Adds basic auth when the request goes to the start URL's host
fn with_auth(request: RequestBuilder, config: &CrawlConfig, url: &str) -> RequestBuilder {
    let Some(credentials) = config.auth() else {
        return request;
    };

    let same_host = Url::parse(url)
        .ok()
        .and_then(|u| {
            let host = u.host_str()?.to_string();
            Some(format!("{}:{}", host, u.port_or_known_default()?))
        })
        .map(|host| host == config.auth_host())
        .unwrap_or(false);

    if same_host {
        request.basic_auth(&credentials.login, Some(credentials.password()))
    } else {
        request
    }
}

fn transport_failure(url: &str, error: &reqwest::Error, started: Instant) -> Fetched {
    let status_code = categorize_error(error);
    tracing::warn!(url, error = %error, "request failed");
    Fetched {
        status_code,
        fetch_time_millis: elapsed_millis(started),
        body: None,
        error: Some(format!("{} ({})", status::friendly_name(status_code), error)),
        final_url: None,
    }
}

// Categorizes different error types from reqwest into sentinel codes
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
pub fn categorize_error(error: &reqwest::Error) -> i32 {
    // Look at the whole source chain; the interesting part is often nested
    let mut chain = error.to_string().to_lowercase();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        chain.push_str(" | ");
        chain.push_str(&inner.to_string().to_lowercase());
        source = inner.source();
    }

    if error.is_timeout() {
        status::TIMEOUT
    } else if error.is_redirect() {
        status::TOO_MANY_REDIRECTS
    } else if error.is_builder() {
        status::MALFORMED_URL
    } else if chain.contains("dns") || chain.contains("failed to lookup") {
        status::UNKNOWN_HOST
    } else if chain.contains("certificate") || chain.contains("ssl") || chain.contains("tls") {
        status::SSL_ERROR
    } else if error.is_connect() && chain.contains("refused") {
        status::CONNECTION_REFUSED
    } else {
        status::NO_RESPONSE
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(url: &str) -> CrawlConfig {
        CrawlConfig::builder(url).build().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_keeps_html_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<a href=\"/about\">About</a>")
            .create_async()
            .await;

        let config = config_for(&server.url());
        let client = build_client(&config).unwrap();
        let fetched = fetch_page(&client, &config, &format!("{}/", server.url())).await;

        assert_eq!(fetched.status_code, 200);
        assert!(fetched.body.unwrap().contains("/about"));
    }

    #[tokio::test]
    async fn test_fetch_page_drops_non_html_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/data.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let config = config_for(&server.url());
        let client = build_client(&config).unwrap();
        let fetched = fetch_page(&client, &config, &format!("{}/data.json", server.url())).await;

        assert_eq!(fetched.status_code, 200);
        assert!(fetched.body.is_none());
    }

    #[tokio::test]
    async fn test_fetch_page_reports_redirect_target() {
        let mut server = mockito::Server::new_async().await;
        let _moved = server
            .mock("GET", "/docs")
            .with_status(301)
            .with_header("location", "/docs/")
            .create_async()
            .await;
        let _target = server
            .mock("GET", "/docs/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<p>Docs</p>")
            .create_async()
            .await;

        let config = config_for(&server.url());
        let client = build_client(&config).unwrap();
        let fetched = fetch_page(&client, &config, &format!("{}/docs", server.url())).await;

        assert_eq!(fetched.status_code, 200);
        assert_eq!(fetched.final_url.unwrap().path(), "/docs/");
    }

    #[tokio::test]
    async fn test_fetch_status_falls_back_to_get() {
        let mut server = mockito::Server::new_async().await;
        let _head = server.mock("HEAD", "/logo.png").with_status(405).create_async().await;
        let _get = server.mock("GET", "/logo.png").with_status(200).create_async().await;

        let config = config_for(&server.url());
        let client = build_client(&config).unwrap();
        let fetched = fetch_status(&client, &config, &format!("{}/logo.png", server.url())).await;

        assert_eq!(fetched.status_code, 200);
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_sentinel() {
        // Port 1 on localhost has nothing listening
        let config = config_for("http://127.0.0.1:1/");
        let client = build_client(&config).unwrap();
        let fetched = fetch_status(&client, &config, "http://127.0.0.1:1/").await;

        assert!(!fetched.responded());
        assert!(fetched.status_code <= 0);
        assert!(fetched.error.is_some());
    }

    #[tokio::test]
    async fn test_basic_auth_sent_to_start_host() {
        let mut server = mockito::Server::new_async().await;
        // "admin:secret" base64 encoded
        let _mock = server
            .mock("HEAD", "/private")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .with_status(200)
            .create_async()
            .await;

        let config = CrawlConfig::builder(server.url())
            .with_login("admin")
            .with_password("secret")
            .build()
            .unwrap();
        let client = build_client(&config).unwrap();
        let fetched = fetch_status(&client, &config, &format!("{}/private", server.url())).await;

        assert_eq!(fetched.status_code, 200);
    }
}

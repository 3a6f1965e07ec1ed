// src/config.rs
// =============================================================================
// Configuration for one verification run.
//
// A CrawlConfig is built once (through CrawlConfigBuilder), validated, and
// then only read. It is passed by reference into the crawler and the asset
// verifier - there is no global state.
//
// Rust concepts:
// - Builder pattern: with_* methods that take and return `self`
// - Private fields + getters: nobody can change a config after it is built
// - Custom Debug: so the password never shows up in logs
// =============================================================================

use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Settings for the HTTP client, passed through to the collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Maximum number of requests in flight at once
    pub http_threads: usize,
    /// Total time allowed for one request
    pub socket_timeout: Duration,
    /// Time allowed to establish a connection
    pub connection_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            http_threads: 10,
            socket_timeout: Duration::from_secs(10),
            connection_timeout: Duration::from_secs(5),
            max_redirects: 5,
            user_agent: concat!("site-verifier/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP basic auth credentials, used only for the start URL's host
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Everything the crawler and asset verifier need to know about a run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    start_url: Url,
    max_levels: usize,
    only_on_path: Option<String>,
    not_on_path: Option<String>,
    verify_urls: bool,
    http: HttpSettings,
    auth: Option<Credentials>,
}

impl CrawlConfig {
    pub fn builder(start_url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder::new(start_url)
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn only_on_path(&self) -> Option<&str> {
        self.only_on_path.as_deref()
    }

    pub fn not_on_path(&self) -> Option<&str> {
        self.not_on_path.as_deref()
    }

    pub fn verify_urls(&self) -> bool {
        self.verify_urls
    }

    pub fn http(&self) -> &HttpSettings {
        &self.http
    }

    pub fn auth(&self) -> Option<&Credentials> {
        self.auth.as_ref()
    }

    /// "host:port" of the start URL; credentials are only sent there
    pub fn auth_host(&self) -> String {
        let host = self.start_url.host_str().unwrap_or_default();
        match self.start_url.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    // Returns true if a URL path passes the include/exclude filters
    //
    // Examples with only_on_path = "/docs", not_on_path = "/docs/old":
    //   "/docs/intro"   -> true
    //   "/docs/old/v1"  -> false
    //   "/blog"         -> false
    pub fn allows_path(&self, path: &str) -> bool {
        if let Some(prefix) = self.only_on_path() {
            if !path.starts_with(prefix) {
                return false;
            }
        }
        if let Some(prefix) = self.not_on_path() {
            if path.starts_with(prefix) {
                return false;
            }
        }
        true
    }
}

/// Builder for CrawlConfig; `build()` validates everything
#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    start_url: String,
    max_levels: usize,
    only_on_path: Option<String>,
    not_on_path: Option<String>,
    http: HttpSettings,
    login: Option<String>,
    password: Option<String>,
}

impl CrawlConfigBuilder {
    pub fn new(start_url: impl Into<String>) -> Self {
        CrawlConfigBuilder {
            start_url: start_url.into(),
            max_levels: 1,
            only_on_path: None,
            not_on_path: None,
            http: HttpSettings::default(),
            login: None,
            password: None,
        }
    }

    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    pub fn with_only_on_path(mut self, path: impl Into<String>) -> Self {
        self.only_on_path = Some(path.into());
        self
    }

    pub fn with_not_on_path(mut self, path: impl Into<String>) -> Self {
        self.not_on_path = Some(path.into());
        self
    }

    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }

    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn build(self) -> Result<CrawlConfig, ConfigError> {
        let raw = self.start_url.trim();
        if raw.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(ConfigError::UnsupportedScheme(raw.to_string()));
        }
        let start_url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        if self.max_levels == 0 {
            return Err(ConfigError::ZeroLevel);
        }
        if self.http.http_threads == 0 {
            return Err(ConfigError::ZeroSetting("HTTP threads"));
        }
        if self.http.socket_timeout.is_zero() {
            return Err(ConfigError::ZeroSetting("Socket timeout"));
        }
        if self.http.connection_timeout.is_zero() {
            return Err(ConfigError::ZeroSetting("Connection timeout"));
        }

        // Empty strings mean "not set"
        let only_on_path = non_empty(self.only_on_path);
        let not_on_path = non_empty(self.not_on_path);
        if let (Some(only), Some(not)) = (&only_on_path, &not_on_path) {
            if only == not {
                return Err(ConfigError::ConflictingPaths(only.clone()));
            }
        }

        let auth = match (non_empty(self.login), non_empty(self.password)) {
            (Some(login), Some(password)) => Some(Credentials::new(login, password)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        Ok(CrawlConfig {
            start_url,
            max_levels: self.max_levels,
            only_on_path,
            not_on_path,
            verify_urls: true,
            http: self.http,
            auth,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::builder("http://site.test/").build().unwrap();
        assert_eq!(config.max_levels(), 1);
        assert!(config.verify_urls());
        assert!(config.auth().is_none());
        assert_eq!(config.http().http_threads, 10);
    }

    #[test]
    fn test_rejects_empty_and_non_http_urls() {
        assert!(matches!(CrawlConfig::builder("  ").build(), Err(ConfigError::EmptyUrl)));
        assert!(matches!(
            CrawlConfig::builder("ftp://site.test").build(),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            CrawlConfig::builder("http://").build(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_level_and_threads() {
        assert!(matches!(
            CrawlConfig::builder("http://site.test").with_max_levels(0).build(),
            Err(ConfigError::ZeroLevel)
        ));

        let http = HttpSettings {
            http_threads: 0,
            ..HttpSettings::default()
        };
        assert!(matches!(
            CrawlConfig::builder("http://site.test").with_http(http).build(),
            Err(ConfigError::ZeroSetting(_))
        ));
    }

    #[test]
    fn test_conflicting_paths() {
        let result = CrawlConfig::builder("http://site.test")
            .with_only_on_path("/docs")
            .with_not_on_path("/docs")
            .build();
        assert!(matches!(result, Err(ConfigError::ConflictingPaths(_))));
    }

    #[test]
    fn test_path_filters() {
        let config = CrawlConfig::builder("http://site.test")
            .with_only_on_path("/docs")
            .with_not_on_path("/docs/old")
            .build()
            .unwrap();

        assert!(config.allows_path("/docs/intro"));
        assert!(!config.allows_path("/docs/old/v1"));
        assert!(!config.allows_path("/blog"));
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let config = CrawlConfig::builder("http://site.test")
            .with_only_on_path("")
            .with_not_on_path("")
            .build()
            .unwrap();
        assert!(config.only_on_path().is_none());
        assert!(config.allows_path("/anything"));
    }

    #[test]
    fn test_credentials() {
        let config = CrawlConfig::builder("http://site.test:8080/")
            .with_login("admin")
            .with_password("hunter2")
            .build()
            .unwrap();

        assert_eq!(config.auth_host(), "site.test:8080");
        assert_eq!(config.auth().unwrap().password(), "hunter2");

        let printed = format!("{:?}", config);
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_login_without_password_is_rejected() {
        let result = CrawlConfig::builder("http://site.test").with_login("admin").build();
        assert!(matches!(result, Err(ConfigError::IncompleteCredentials)));
    }

    #[test]
    fn test_auth_host_uses_default_port() {
        let config = CrawlConfig::builder("https://site.test/").build().unwrap();
        assert_eq!(config.auth_host(), "site.test:443");
    }
}

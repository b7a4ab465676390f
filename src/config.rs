//! Centralized configuration management for the reporting console

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Page sizes offered by the table pager
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Which CRUD backend the console talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process canned data with simulated latency
    Mock,
    /// JSON REST API
    Http,
}

impl BackendKind {
    pub fn as_str(&self) -> &str {
        match self {
            BackendKind::Mock => "mock",
            BackendKind::Http => "http",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(BackendKind::Mock),
            "http" => Ok(BackendKind::Http),
            other => Err(format!("unknown backend '{}': expected 'mock' or 'http'", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend implementation
    pub backend: BackendKind,
    /// Base URL of the reporting API
    pub api_base_url: String,
    /// Simulated latency of the mock backend (milliseconds)
    pub mock_latency_ms: u64,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Log file written by the TUI
    pub log_file: PathBuf,
    /// Rows per table page
    pub page_size: usize,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "reporting-console/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mock,
            api_base_url: "http://localhost:8080/api/v1/core".to_string(),
            mock_latency_ms: 500,
            http: HttpConfig::default(),
            log_file: PathBuf::from("reporting_console.log"),
            page_size: PAGE_SIZE_OPTIONS[0],
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let backend = parse_var(&lookup, "REPORTING_BACKEND")?.unwrap_or(defaults.backend);

        let api_base_url = lookup("REPORTING_API_BASE_URL")
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();

        let http = HttpConfig {
            timeout_seconds: parse_var(&lookup, "REPORTING_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: lookup("REPORTING_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            backend,
            api_base_url,
            mock_latency_ms: parse_var(&lookup, "REPORTING_MOCK_LATENCY_MS")?
                .unwrap_or(defaults.mock_latency_ms),
            http,
            log_file: lookup("REPORTING_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            page_size: parse_var(&lookup, "REPORTING_PAGE_SIZE")?.unwrap_or(defaults.page_size),
        })
    }

    /// Get mock latency as Duration
    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::Http {
            reqwest::Url::parse(&self.api_base_url)
                .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;
        }

        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(anyhow::anyhow!(
                "Unsupported page size {} (expected one of {:?})",
                self.page_size,
                PAGE_SIZE_OPTIONS
            ));
        }

        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

/// Helper function to parse a variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var_name) {
        Some(val) => val.parse().map(Some).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse environment variable {} = '{}': {}",
                var_name,
                val,
                e
            )
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend, BackendKind::Mock);
        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1/core");
        assert_eq!(config.mock_latency_ms, 500);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("REPORTING_BACKEND", "HTTP"),
            ("REPORTING_API_BASE_URL", "https://api.example.com/v1/"),
            ("REPORTING_MOCK_LATENCY_MS", "0"),
            ("REPORTING_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
        assert_eq!(config.mock_latency(), Duration::ZERO);
        assert_eq!(config.page_size, 25);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_rejects_unparseable_values() {
        let result = Config::from_lookup(lookup_from(&[("REPORTING_MOCK_LATENCY_MS", "soon")]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[("REPORTING_BACKEND", "sqlite")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.log_file = temp_dir.path().join("console.log");
        config.validate().unwrap();

        config.page_size = 7;
        assert!(config.validate().is_err());

        config.page_size = 50;
        config.log_file = temp_dir.path().join("missing").join("console.log");
        assert!(config.validate().is_err());

        config.log_file = temp_dir.path().join("console.log");
        config.backend = BackendKind::Http;
        config.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}

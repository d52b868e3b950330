use crate::{Error, ErrorContext, Result};
use reqwest::Proxy;
use std::env;
use std::time::Duration;

/// Connection settings shared by the catalog and generation clients.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy_url: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            proxy_url: None,
        }
    }
}

impl HttpSettings {
    /// Defaults overridden by `POEMS_HTTP_*` environment knobs.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_secs = env::var("POEMS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.timeout.as_secs());

        Self {
            timeout: Duration::from_secs(timeout_secs),
            pool_max_idle_per_host: env::var("POEMS_HTTP_POOL_MAX_IDLE_PER_HOST")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(defaults.pool_max_idle_per_host),
            pool_idle_timeout: env::var("POEMS_HTTP_POOL_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool_idle_timeout),
            proxy_url: env::var("POEMS_PROXY_URL").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a pooled client. Construct once and share; `reqwest::Client` is
    /// reference counted internally.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(Some(self.pool_idle_timeout));

        if let Some(ref proxy_url) = self.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy url: {}", e),
                    ErrorContext::new()
                        .with_field_path("POEMS_PROXY_URL")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })
    }
}

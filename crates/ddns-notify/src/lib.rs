// # Monitoring adapters
//
// Outbound signals for the DDNS updater:
// - `HttpHealthcheck`: healthchecks.io style pinger (`{url}/start`, `{url}/fail`)
// - `SentryReporter`: forwards terminal errors to Sentry
//
// Both are best-effort. Transport failures are logged at warn and never
// change the outcome of a run.

use async_trait::async_trait;
use ddns_core::{Error, ErrorReporter, HealthcheckNotifier, MonitoringConfig};
use std::time::Duration;

/// Default timeout for healthcheck pings (10 seconds)
const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on the Sentry flush before the process exits
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Healthcheck pinger for healthchecks.io compatible endpoints
///
/// With no URL configured the pinger is disabled and sends nothing.
#[derive(Debug, Clone)]
pub struct HttpHealthcheck {
    /// Base URL without trailing slash; `None` when disabled
    base_url: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpHealthcheck {
    /// Create a pinger for `url` with the default timeout
    ///
    /// An absent or blank URL yields a disabled pinger.
    pub fn new(url: Option<&str>) -> Self {
        Self::with_timeout(url, DEFAULT_PING_TIMEOUT)
    }

    /// Create a pinger with a custom request timeout
    pub fn with_timeout(url: Option<&str>, timeout: Duration) -> Self {
        let base_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| u.trim_end_matches('/').to_string());

        Self {
            base_url,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a pinger from configuration
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::with_timeout(
            config.healthcheck_url(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Whether pings are actually sent
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    async fn ping(&self, suffix: &str) {
        let Some(base) = &self.base_url else {
            return;
        };
        let url = format!("{}/{}", base, suffix);
        tracing::debug!("Pinging healthcheck {}", url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                tracing::warn!("Healthcheck ping {} returned HTTP {}", url, response.status());
            }
            Err(e) => tracing::warn!("Healthcheck ping {} failed: {}", url, e),
        }
    }
}

#[async_trait]
impl HealthcheckNotifier for HttpHealthcheck {
    async fn ping_start(&self) {
        self.ping("start").await;
    }

    async fn ping_failure(&self) {
        self.ping("fail").await;
    }
}

/// Error reporter backed by the Sentry SDK
///
/// Holds the client guard for the lifetime of the process; dropping the
/// reporter shuts the client down.
pub struct SentryReporter {
    guard: Option<sentry::ClientInitGuard>,
    flush_timeout: Duration,
}

impl SentryReporter {
    /// Initialise Sentry from `dsn`
    ///
    /// An absent, blank or unparsable DSN yields a disabled reporter. The
    /// last case is logged, since it is almost certainly a typo.
    pub fn new(dsn: Option<&str>, flush_timeout: Duration) -> Self {
        let dsn = match dsn.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => match raw.parse::<sentry::types::Dsn>() {
                Ok(dsn) => Some(dsn),
                Err(e) => {
                    tracing::warn!("Ignoring invalid Sentry DSN: {}", e);
                    None
                }
            },
            None => None,
        };

        let guard = dsn.map(|dsn| {
            tracing::debug!("Error tracking enabled");
            sentry::init(sentry::ClientOptions {
                dsn: Some(dsn),
                release: sentry::release_name!(),
                ..Default::default()
            })
        });

        Self {
            guard,
            flush_timeout,
        }
    }

    /// Create a reporter from configuration
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(config.sentry_dsn(), DEFAULT_FLUSH_TIMEOUT)
    }

    /// Whether errors are actually sent
    pub fn is_enabled(&self) -> bool {
        self.guard.as_ref().is_some_and(|g| g.is_enabled())
    }
}

impl std::fmt::Debug for SentryReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryReporter")
            .field("enabled", &self.is_enabled())
            .field("flush_timeout", &self.flush_timeout)
            .finish()
    }
}

impl ErrorReporter for SentryReporter {
    fn capture(&self, error: &Error) {
        let Some(guard) = &self.guard else {
            return;
        };

        let event_id = sentry::capture_error(error);
        if !guard.flush(Some(self.flush_timeout)) {
            tracing::warn!(
                "Sentry event {} not flushed within {:?}",
                event_id,
                self.flush_timeout
            );
        }
    }
}

// # Monitoring Traits
//
// Best-effort outbound signals: the healthcheck "dead man's switch" and the
// error tracking sink. Neither can fail from the caller's point of view;
// implementations log and swallow their own transport errors.
//
// ## Implementations
//
// - HTTP healthcheck pinger and Sentry reporter: `ddns-notify` crate
// - `DisabledHealthcheck` / `NoopReporter`: here, for unconfigured endpoints

use async_trait::async_trait;

/// Healthcheck pinger
///
/// The start ping is sent at the beginning of every run, the failure ping
/// only on the terminal failure path. Monitoring alerts on the absence of
/// start pings as well as on failure pings.
#[async_trait]
pub trait HealthcheckNotifier: Send + Sync {
    /// Signal that a run has started
    async fn ping_start(&self);

    /// Signal that a run has failed
    async fn ping_failure(&self);
}

/// Error tracking sink
///
/// Only used on the terminal failure path.
pub trait ErrorReporter: Send + Sync {
    /// Forward an error to the sink
    fn capture(&self, error: &crate::Error);
}

/// Healthcheck used when no URL is configured; never sends anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledHealthcheck;

#[async_trait]
impl HealthcheckNotifier for DisabledHealthcheck {
    async fn ping_start(&self) {}

    async fn ping_failure(&self) {}
}

/// Error reporter used when no sink is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn capture(&self, error: &crate::Error) {
        tracing::debug!("Error tracking disabled, not reporting: {}", error);
    }
}

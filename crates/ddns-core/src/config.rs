//! Configuration types for the DDNS system
//!
//! This module defines all configuration structures used throughout the
//! workspace. Loading them from the environment is the job of the binary;
//! this module only describes and validates them.

use crate::types::{DEFAULT_TTL_SECS, DnsRecordTarget};

/// Default IP echo service
pub const DEFAULT_IP_ECHO_URL: &str = "http://checkip.amazonaws.com/";

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default timeout for IP echo and healthcheck requests (in seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Main DDNS configuration
#[derive(Debug, Clone, Default)]
pub struct DdnsConfig {
    /// Credentials for the DNS provider
    pub credentials: Credentials,

    /// The record to keep in sync
    pub record: RecordConfig,

    /// Public IP echo service
    pub ip_echo: IpEchoConfig,

    /// Healthcheck and error tracking endpoints
    pub monitoring: MonitoringConfig,
}

impl DdnsConfig {
    /// Create a new configuration for the given record with defaults elsewhere
    pub fn new(zone_id: impl Into<String>, record_name: impl Into<String>) -> Self {
        Self {
            record: RecordConfig::new(zone_id, record_name),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;
        self.record.validate()?;
        self.ip_echo.validate()?;
        self.monitoring.validate()?;

        Ok(())
    }

    /// The record target described by this configuration
    pub fn target(&self) -> DnsRecordTarget {
        self.record.target()
    }
}

/// Provider credentials
///
/// Opaque to the engine; passed straight to the record store's transport.
/// When both keys are absent the transport falls back to its default
/// credential chain.
#[derive(Clone)]
pub struct Credentials {
    /// Access key ID
    pub access_key: Option<String>,

    /// Secret access key
    /// ⚠️ NEVER log this value
    pub secret_key: Option<String>,

    /// Provider region
    pub region: String,
}

// Custom Debug implementation that hides the secret key
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<REDACTED>"))
            .field("region", &self.region)
            .finish()
    }
}

impl Credentials {
    /// Create static credentials
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key: Some(access_key.into()),
            secret_key: Some(secret_key.into()),
            region: region.into(),
        }
    }

    /// Both keys, if statically configured
    pub fn static_keys(&self) -> Option<(&str, &str)> {
        match (self.access_key.as_deref(), self.secret_key.as_deref()) {
            (Some(access), Some(secret)) => Some((access, secret)),
            _ => None,
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.region.trim().is_empty() {
            return Err(crate::Error::config("Region cannot be empty"));
        }

        match (&self.access_key, &self.secret_key) {
            (Some(_), None) => Err(crate::Error::config(
                "Access key is set but secret key is missing",
            )),
            (None, Some(_)) => Err(crate::Error::config(
                "Secret key is set but access key is missing",
            )),
            (Some(access), Some(secret)) if access.is_empty() || secret.is_empty() => Err(
                crate::Error::config("Access key and secret key cannot be empty"),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            access_key: None,
            secret_key: None,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

/// DNS record configuration
#[derive(Debug, Clone, Default)]
pub struct RecordConfig {
    /// Hosted zone ID
    pub zone_id: String,

    /// DNS record name (e.g., "example.com" or "home.example.com")
    pub name: String,

    /// TTL written on update
    pub ttl_secs: u32,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl_secs: u32) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Hosted zone ID cannot be empty"));
        }
        if self.ttl_secs == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }

        validate_domain_name(&self.name)
    }

    /// The record target described by this configuration
    pub fn target(&self) -> DnsRecordTarget {
        DnsRecordTarget::new(self.zone_id.trim(), self.name.trim()).with_ttl(self.ttl_secs)
    }
}

/// Public IP echo service configuration
#[derive(Debug, Clone)]
pub struct IpEchoConfig {
    /// URL returning the caller's IP as plain text
    pub url: String,

    /// Request timeout (in seconds)
    pub timeout_secs: u64,
}

impl IpEchoConfig {
    /// Validate the IP echo configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_http_url("IP echo URL", &self.url)?;
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("IP echo timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for IpEchoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_IP_ECHO_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Monitoring configuration
///
/// Both endpoints are optional; an unset or empty value disables the
/// corresponding notifier.
#[derive(Clone)]
pub struct MonitoringConfig {
    /// Healthcheck base URL (start and failure pings are sent below it)
    pub healthcheck_url: Option<String>,

    /// Error tracking DSN
    /// ⚠️ NEVER log this value
    pub sentry_dsn: Option<String>,

    /// Healthcheck request timeout (in seconds)
    pub timeout_secs: u64,
}

// Custom Debug implementation that hides the DSN (it embeds a key)
impl std::fmt::Debug for MonitoringConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringConfig")
            .field("healthcheck_url", &self.healthcheck_url)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "<REDACTED>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MonitoringConfig {
    /// Healthcheck URL, if one is configured
    pub fn healthcheck_url(&self) -> Option<&str> {
        non_empty(self.healthcheck_url.as_deref())
    }

    /// Error tracking DSN, if one is configured
    pub fn sentry_dsn(&self) -> Option<&str> {
        non_empty(self.sentry_dsn.as_deref())
    }

    /// Validate the monitoring configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Some(url) = self.healthcheck_url() {
            validate_http_url("Healthcheck URL", url)?;
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Healthcheck timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            healthcheck_url: None,
            sentry_dsn: None,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Validate that a string is a valid domain name
///
/// This implements basic DNS domain name validation per RFC 1035.
/// A single trailing dot is accepted, as is a leading `*` wildcard label.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    let domain = domain.trim();
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() {
        return Err(crate::Error::config("Record name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Record name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for (index, label) in domain.split('.').enumerate() {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Record name has empty label: '{}'",
                domain
            )));
        }

        if index == 0 && label == "*" {
            continue;
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Record label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(crate::Error::config(format!(
                "Record label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Record label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn validate_http_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.trim().is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

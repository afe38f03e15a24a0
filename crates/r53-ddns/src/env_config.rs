// Configuration is via environment variables only:
//
// ### Credentials
// - `DDNS_AWS_ACCESS_KEY` / `DDNS_AWS_SECRET_KEY`: static keys (optional;
//   the default AWS credential chain is used when both are unset)
// - `DDNS_AWS_REGION`: region (default: us-east-1)
//
// ### Record
// - `DDNS_HOSTED_ZONE_ID`: Route53 hosted zone ID
// - `DDNS_RECORD_NAME`: record to keep in sync
// - `DDNS_RECORD_TTL`: TTL written on update (default: 3600)
//
// ### Public IP
// - `DDNS_IP_ECHO_URL`: IP echo service (default: http://checkip.amazonaws.com/;
//   https://api.ipify.org and https://ipv4.icanhazip.com also return a bare address)
//
// ### Monitoring
// - `DDNS_HEALTHCHECK_URL`: healthcheck base URL (optional)
// - `DDNS_SENTRY_DSN`: Sentry DSN (optional)
// - `DDNS_HTTP_TIMEOUT_SECS`: echo and healthcheck timeout (default: 10)

use anyhow::{Context, Result};
use ddns_core::config::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_IP_ECHO_URL, DEFAULT_REGION};
use ddns_core::types::DEFAULT_TTL_SECS;
use ddns_core::{Credentials, DdnsConfig, IpEchoConfig, MonitoringConfig, RecordConfig};
use std::str::FromStr;

/// Build the configuration from a variable lookup
///
/// Blank values count as unset. Only the format of numeric values is checked
/// here; each command validates the sections it needs.
pub fn load_config(lookup: impl Fn(&str) -> Option<String>) -> Result<DdnsConfig> {
    let var = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let timeout_secs =
        parse_var(&var, "DDNS_HTTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

    Ok(DdnsConfig {
        credentials: Credentials {
            access_key: var("DDNS_AWS_ACCESS_KEY"),
            secret_key: var("DDNS_AWS_SECRET_KEY"),
            region: var("DDNS_AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        },
        record: RecordConfig {
            zone_id: var("DDNS_HOSTED_ZONE_ID").unwrap_or_default(),
            name: var("DDNS_RECORD_NAME").unwrap_or_default(),
            ttl_secs: parse_var(&var, "DDNS_RECORD_TTL")?.unwrap_or(DEFAULT_TTL_SECS),
        },
        ip_echo: IpEchoConfig {
            url: var("DDNS_IP_ECHO_URL").unwrap_or_else(|| DEFAULT_IP_ECHO_URL.to_string()),
            timeout_secs,
        },
        monitoring: MonitoringConfig {
            healthcheck_url: var("DDNS_HEALTHCHECK_URL"),
            sentry_dsn: var("DDNS_SENTRY_DSN"),
            timeout_secs,
        },
    })
}

/// Variables a command needs before its section can validate
pub fn require(config: &DdnsConfig) -> Result<()> {
    if config.record.zone_id.is_empty() {
        anyhow::bail!(
            "DDNS_HOSTED_ZONE_ID is required. \
            Set it via: export DDNS_HOSTED_ZONE_ID=Z0123456789ABC"
        );
    }
    if config.record.name.is_empty() {
        anyhow::bail!(
            "DDNS_RECORD_NAME is required. \
            Set it via: export DDNS_RECORD_NAME=home.example.com"
        );
    }
    Ok(())
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("{} must be a non-negative integer. Got: {}", name, raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = load_config(lookup(&[
            ("DDNS_HOSTED_ZONE_ID", "Z0123456789ABC"),
            ("DDNS_RECORD_NAME", "home.example.com"),
        ]))
        .unwrap();

        assert!(config.validate().is_ok());
        assert!(require(&config).is_ok());
        assert_eq!(config.credentials.region, "us-east-1");
        assert!(config.credentials.static_keys().is_none());
        assert_eq!(config.record.ttl_secs, 3600);
        assert_eq!(config.ip_echo.url, "http://checkip.amazonaws.com/");
        assert_eq!(config.ip_echo.timeout_secs, 10);
        assert!(config.monitoring.healthcheck_url().is_none());
        assert!(config.monitoring.sentry_dsn().is_none());
    }

    #[test]
    fn test_all_variables() {
        let config = load_config(lookup(&[
            ("DDNS_AWS_ACCESS_KEY", "AKIAEXAMPLE"),
            ("DDNS_AWS_SECRET_KEY", "secret"),
            ("DDNS_AWS_REGION", "eu-west-1"),
            ("DDNS_HOSTED_ZONE_ID", "Z0123456789ABC"),
            ("DDNS_RECORD_NAME", "home.example.com"),
            ("DDNS_RECORD_TTL", "300"),
            ("DDNS_IP_ECHO_URL", "https://api.ipify.org"),
            ("DDNS_HEALTHCHECK_URL", "https://hc-ping.com/uuid"),
            ("DDNS_SENTRY_DSN", "https://key@o0.ingest.sentry.io/1"),
            ("DDNS_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(
            config.credentials.static_keys(),
            Some(("AKIAEXAMPLE", "secret"))
        );
        assert_eq!(config.credentials.region, "eu-west-1");
        assert_eq!(config.target().ttl_secs, 300);
        assert_eq!(config.ip_echo.url, "https://api.ipify.org");
        assert_eq!(config.ip_echo.timeout_secs, 5);
        assert_eq!(config.monitoring.timeout_secs, 5);
        assert_eq!(
            config.monitoring.healthcheck_url(),
            Some("https://hc-ping.com/uuid")
        );
        assert!(!format!("{:?}", config).contains("key@o0"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load_config(lookup(&[
            ("DDNS_HOSTED_ZONE_ID", "Z0123456789ABC"),
            ("DDNS_RECORD_NAME", "home.example.com"),
            ("DDNS_AWS_ACCESS_KEY", "  "),
            ("DDNS_HEALTHCHECK_URL", ""),
            ("DDNS_RECORD_TTL", ""),
        ]))
        .unwrap();

        assert!(config.credentials.access_key.is_none());
        assert!(config.monitoring.healthcheck_url.is_none());
        assert_eq!(config.record.ttl_secs, 3600);
    }

    #[test]
    fn test_missing_record_is_reported_by_name() {
        let config = load_config(lookup(&[("DDNS_RECORD_NAME", "home.example.com")])).unwrap();
        let err = require(&config).unwrap_err();
        assert!(err.to_string().contains("DDNS_HOSTED_ZONE_ID"));

        let config = load_config(lookup(&[("DDNS_HOSTED_ZONE_ID", "Z0123456789ABC")])).unwrap();
        let err = require(&config).unwrap_err();
        assert!(err.to_string().contains("DDNS_RECORD_NAME"));

        // The IP echo section stands on its own
        assert!(config.ip_echo.validate().is_ok());
    }

    #[test]
    fn test_malformed_numbers() {
        let err = load_config(lookup(&[("DDNS_RECORD_TTL", "an hour")])).unwrap_err();
        assert!(err.to_string().contains("DDNS_RECORD_TTL"));

        let err = load_config(lookup(&[("DDNS_HTTP_TIMEOUT_SECS", "-1")])).unwrap_err();
        assert!(err.to_string().contains("DDNS_HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_half_configured_keys_fail_validation() {
        let config = load_config(lookup(&[
            ("DDNS_HOSTED_ZONE_ID", "Z0123456789ABC"),
            ("DDNS_RECORD_NAME", "home.example.com"),
            ("DDNS_AWS_ACCESS_KEY", "AKIAEXAMPLE"),
        ]))
        .unwrap();

        assert!(config.validate().is_err());
    }
}

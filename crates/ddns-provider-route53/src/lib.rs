// # Route53 DNS Record Store
//
// This crate provides the AWS Route53 implementation of `DnsRecordStore`.
//
// ## Behavior
//
// - Read: `ListResourceRecordSets` starting at the record name, type A,
//   one result; the result is accepted only if its name is the requested
//   name (Route53 returns the next record in sort order when the requested
//   one does not exist)
// - Write: `ChangeResourceRecordSets` with one UPSERT change, type A, the
//   target's TTL and a single value
// - ❌ NO retry logic beyond the SDK's own transport retries
// - ❌ NO decision about whether to write (owned by ReconciliationEngine)
// - ❌ NO caching between calls
//
// ## Security
//
// - The secret key NEVER appears in logs (see `ddns_core::Credentials`)
//
// ## API Reference
//
// - ListResourceRecordSets: https://docs.aws.amazon.com/Route53/latest/APIReference/API_ListResourceRecordSets.html
// - ChangeResourceRecordSets: https://docs.aws.amazon.com/Route53/latest/APIReference/API_ChangeResourceRecordSets.html

mod api;

pub use api::{DEFAULT_OPERATION_TIMEOUT, RecordSet, Route53Api, SdkRoute53Api};

use async_trait::async_trait;
use ddns_core::{Credentials, DnsRecordStore, DnsRecordTarget, Error, IpAddress, Result};
use std::time::Duration;

/// Route53-backed DNS record store
///
/// Generic over the transport so the name matching and value handling can be
/// tested against an in-memory zone.
#[derive(Debug, Clone)]
pub struct Route53RecordStore<A = SdkRoute53Api> {
    api: A,
}

impl Route53RecordStore<SdkRoute53Api> {
    /// Create a store talking to AWS with the given credentials
    ///
    /// # Parameters
    ///
    /// - `credentials`: Static keys (or none, for the default chain) and region
    /// - `operation_timeout`: Upper bound for each Route53 call
    pub async fn connect(credentials: &Credentials, operation_timeout: Duration) -> Self {
        Self::new(SdkRoute53Api::connect(credentials, operation_timeout).await)
    }
}

impl<A: Route53Api> Route53RecordStore<A> {
    /// Create a store over an arbitrary transport
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: Route53Api> DnsRecordStore for Route53RecordStore<A> {
    async fn read_current_value(&self, target: &DnsRecordTarget) -> Result<IpAddress> {
        let record_type = target.record_type.as_str();
        tracing::debug!(
            "Looking up {} record {} in zone {}",
            record_type,
            target.record_name,
            target.zone_id
        );

        let record_set = self
            .api
            .list_first_record_set(&target.zone_id, &target.record_name, record_type)
            .await
            .map_err(|e| Error::lookup(e.to_string()))?
            .ok_or_else(|| {
                Error::lookup(format!(
                    "No record sets at or after {} in zone {}",
                    target.record_name, target.zone_id
                ))
            })?;

        if !record_name_matches(&target.record_name, &record_set.name)
            || record_set.record_type != record_type
        {
            tracing::warn!(
                "Route53 returned {} {} when asked for {} {}",
                record_set.record_type,
                record_set.name,
                record_type,
                target.record_name
            );
            return Err(Error::lookup(format!(
                "{} record {} not found in zone {} (first match was {} {})",
                record_type,
                target.record_name,
                target.zone_id,
                record_set.record_type,
                record_set.name
            )));
        }

        let value = record_set.values.first().ok_or_else(|| {
            Error::lookup(format!(
                "{} record {} has no values",
                record_type, target.record_name
            ))
        })?;

        value.parse::<IpAddress>().map_err(|e| {
            Error::lookup(format!(
                "{} record {} holds an invalid value: {}",
                record_type, target.record_name, e
            ))
        })
    }

    async fn upsert(&self, target: &DnsRecordTarget, value: IpAddress) -> Result<()> {
        tracing::info!(
            "Upserting {} record {} -> {} (ttl {}s)",
            target.record_type,
            target.record_name,
            value,
            target.ttl_secs
        );

        let record_set = RecordSet {
            name: target.record_name.clone(),
            record_type: target.record_type.as_str().to_string(),
            ttl: Some(i64::from(target.ttl_secs)),
            values: vec![value.to_string()],
        };

        self.api
            .upsert_record_set(&target.zone_id, &record_set)
            .await
            .map_err(|e| Error::update(e.to_string()))?;

        tracing::info!("DNS record updated successfully: {} -> {}", target.record_name, value);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "route53"
    }
}

/// Whether a name returned by Route53 is the name that was requested
///
/// Route53 answers with fully qualified names (trailing dot), lowercase, and
/// escapes `*` as `\052`. Comparison ignores those differences and nothing
/// else.
pub fn record_name_matches(requested: &str, returned: &str) -> bool {
    normalize_record_name(requested) == normalize_record_name(returned)
}

fn normalize_record_name(name: &str) -> String {
    let name = name.trim();
    name.strip_suffix('.')
        .unwrap_or(name)
        .replace("\\052", "*")
        .to_ascii_lowercase()
}

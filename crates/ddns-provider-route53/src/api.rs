//! Thin transport over the Route53 API
//!
//! The record store only needs two calls: a start-at-name listing limited to
//! one record set, and a single-change UPSERT batch. [`Route53Api`] captures
//! exactly those so the matching logic in the store can be exercised without
//! AWS.

use async_trait::async_trait;
use aws_sdk_route53::config::{Credentials as AwsCredentials, Region};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use ddns_core::{Credentials, Error, Result};
use std::time::Duration;

/// Provider name used in errors and logs
pub(crate) const PROVIDER: &str = "route53";

/// Default timeout for a Route53 operation, retries included (30 seconds)
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// A resource record set as returned by (or sent to) Route53
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    /// Record name as Route53 spells it (usually with a trailing dot)
    pub name: String,
    /// Record type (e.g. "A")
    pub record_type: String,
    /// TTL in seconds
    pub ttl: Option<i64>,
    /// Resource record values
    pub values: Vec<String>,
}

/// The two Route53 calls the record store makes
#[async_trait]
pub trait Route53Api: Send + Sync {
    /// `ListResourceRecordSets` starting at `(start_name, record_type)` with
    /// `MaxItems = 1`; returns the first record set, whatever its name
    async fn list_first_record_set(
        &self,
        zone_id: &str,
        start_name: &str,
        record_type: &str,
    ) -> Result<Option<RecordSet>>;

    /// `ChangeResourceRecordSets` with a single UPSERT of `record_set`
    async fn upsert_record_set(&self, zone_id: &str, record_set: &RecordSet) -> Result<()>;
}

/// [`Route53Api`] backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct SdkRoute53Api {
    client: aws_sdk_route53::Client,
}

impl SdkRoute53Api {
    /// Wrap an existing SDK client
    pub fn from_client(client: aws_sdk_route53::Client) -> Self {
        Self { client }
    }

    /// Build a client from configured credentials
    ///
    /// Static keys are used when both are present; otherwise the SDK's
    /// default credential chain (environment, profile, instance role) applies.
    /// `operation_timeout` bounds each call including SDK-internal retries.
    pub async fn connect(credentials: &Credentials, operation_timeout: Duration) -> Self {
        let timeouts = aws_config::timeout::TimeoutConfig::builder()
            .operation_timeout(operation_timeout)
            .build();

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .timeout_config(timeouts);

        if let Some((access_key, secret_key)) = credentials.static_keys() {
            tracing::debug!("Using static Route53 credentials");
            loader = loader.credentials_provider(AwsCredentials::new(
                access_key,
                secret_key,
                None,
                None,
                "ddns-config",
            ));
        } else {
            tracing::debug!("Using default AWS credential chain");
        }

        let shared = loader.load().await;
        Self::from_client(aws_sdk_route53::Client::new(&shared))
    }
}

#[async_trait]
impl Route53Api for SdkRoute53Api {
    async fn list_first_record_set(
        &self,
        zone_id: &str,
        start_name: &str,
        record_type: &str,
    ) -> Result<Option<RecordSet>> {
        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .start_record_name(start_name)
            .start_record_type(RrType::from(record_type))
            .max_items(1)
            .send()
            .await
            .map_err(|e| {
                Error::provider(
                    PROVIDER,
                    format!("ListResourceRecordSets failed: {}", DisplayErrorContext(&e)),
                )
            })?;

        Ok(output
            .resource_record_sets()
            .first()
            .map(|set| RecordSet {
                name: set.name().to_string(),
                record_type: set.r#type().as_str().to_string(),
                ttl: set.ttl(),
                values: set
                    .resource_records()
                    .iter()
                    .map(|record| record.value().to_string())
                    .collect(),
            }))
    }

    async fn upsert_record_set(&self, zone_id: &str, record_set: &RecordSet) -> Result<()> {
        let batch = build_upsert_batch(record_set)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                Error::provider(
                    PROVIDER,
                    format!(
                        "ChangeResourceRecordSets failed: {}",
                        DisplayErrorContext(&e)
                    ),
                )
            })?;

        tracing::debug!("Route53 accepted change: {:?}", output.change_info());

        Ok(())
    }
}

/// One-change UPSERT batch for `record_set`
fn build_upsert_batch(record_set: &RecordSet) -> Result<ChangeBatch> {
    let build_error = |e: aws_sdk_route53::error::BuildError| {
        Error::provider(PROVIDER, format!("Invalid change batch: {}", e))
    };

    let records = record_set
        .values
        .iter()
        .map(|value| ResourceRecord::builder().value(value).build())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(build_error)?;

    let mut set = ResourceRecordSet::builder()
        .name(&record_set.name)
        .r#type(RrType::from(record_set.record_type.as_str()))
        .set_resource_records(Some(records));
    if let Some(ttl) = record_set.ttl {
        set = set.ttl(ttl);
    }

    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(set.build().map_err(build_error)?)
        .build()
        .map_err(build_error)?;

    ChangeBatch::builder()
        .comment("ddns: sync A record with public IP")
        .changes(change)
        .build()
        .map_err(build_error)
}

// # DNS Record Store Trait
//
// Defines the interface for reading and writing the managed DNS record.
//
// ## Implementations
//
// - AWS Route53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsRecordStore, DnsRecordTarget};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* DnsRecordStore implementation */;
//     let target = DnsRecordTarget::new("Z0123456789", "home.example.com");
//
//     let registered = store.read_current_value(&target).await?;
//     store.upsert(&target, "203.0.113.9".parse()?).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::types::{DnsRecordTarget, IpAddress};

/// Trait for DNS record store implementations
///
/// A store is scoped to the hosted zone named by the target and reads or
/// writes exactly the record the target identifies.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform API calls to the DNS provider only
/// - ✅ Parse provider-specific responses
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff
/// - ❌ Decide whether an update is needed (owned by `ReconciliationEngine`)
/// - ❌ Terminate the process (return an error instead)
/// - ❌ Cache state beyond a single call
#[async_trait]
pub trait DnsRecordStore: Send + Sync {
    /// Read the value currently published for the target record
    ///
    /// Implementations must verify that the record they read is the one the
    /// target names; a listing that returns a neighbouring record counts as
    /// "not found".
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddress)`: The record's (first) value
    /// - `Err(Error::Lookup)`: Zone or record not found, provider error, or
    ///   the record carries no values
    async fn read_current_value(&self, target: &DnsRecordTarget)
    -> Result<IpAddress, crate::Error>;

    /// Create or replace the target record with a single value
    ///
    /// # Idempotency
    ///
    /// Calling this twice with the same value must leave the provider in the
    /// same state as calling it once: no error, no duplicate record.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the change
    /// - `Err(Error::Update)`: The provider rejected it
    async fn upsert(&self, target: &DnsRecordTarget, value: IpAddress)
    -> Result<(), crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}

// # Public IP Resolver Trait
//
// Defines the interface for discovering the machine's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::PublicIpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* PublicIpResolver implementation */;
//
//     let ip = resolver.resolve().await?;
//     println!("Public IP: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::types::IpAddress;

/// Trait for public IP resolver implementations
///
/// # Trust Level: Semi-Trusted
///
/// ## Allowed Capabilities
/// - ✅ One outbound, read-only network call per `resolve()`
/// - ✅ Parse and validate the response
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (a failed run is simply tried again next cycle)
/// - ❌ Cache results across calls
/// - ❌ Terminate the process (return an error instead)
/// - ❌ Touch DNS state
#[async_trait]
pub trait PublicIpResolver: Send + Sync {
    /// Resolve the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddress)`: The validated public address
    /// - `Err(Error::Resolution)`: The call failed, timed out, or returned
    ///   something that is not an IPv4 address
    async fn resolve(&self) -> Result<IpAddress, crate::Error>;

    /// Get the resolver name (for logging/debugging)
    fn resolver_name(&self) -> &str;
}

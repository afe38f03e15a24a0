//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces the engine is built against.
//!
//! - [`PublicIpResolver`]: Discover the current public IP
//! - [`DnsRecordStore`]: Read and upsert the managed DNS record
//! - [`HealthcheckNotifier`]: Best-effort liveness pings
//! - [`ErrorReporter`]: Best-effort error tracking

pub mod ip_resolver;
pub mod monitoring;
pub mod record_store;

pub use ip_resolver::PublicIpResolver;
pub use monitoring::{DisabledHealthcheck, ErrorReporter, HealthcheckNotifier, NoopReporter};
pub use record_store::DnsRecordStore;

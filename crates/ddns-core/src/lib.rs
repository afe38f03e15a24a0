// # ddns-core
//
// Core library for the Route53 dynamic-DNS updater.
//
// ## Architecture Overview
//
// This library provides the decision logic of one reconciliation run:
// - **PublicIpResolver**: Trait for discovering the current public IPv4
// - **DnsRecordStore**: Trait for reading and upserting the managed record
// - **HealthcheckNotifier**: Trait for best-effort start/failure pings
// - **ErrorReporter**: Trait for best-effort error tracking
// - **ReconciliationEngine**: Orchestrates resolve → read → compare → upsert
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from transports
// 2. **Injected Collaborators**: No global state; fakes drive the tests
// 3. **Compare Before Write**: The record is only written when it differs
// 4. **Explicit Outcomes**: Errors are values; only the binary exits

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::{Credentials, DdnsConfig, IpEchoConfig, MonitoringConfig, RecordConfig};
pub use engine::{ReconciliationEngine, ReconciliationOutcome, Stage};
pub use error::{Error, Result};
pub use traits::{
    DisabledHealthcheck, DnsRecordStore, ErrorReporter, HealthcheckNotifier, NoopReporter,
    PublicIpResolver,
};
pub use types::{DnsRecordTarget, IpAddress, RecordType};

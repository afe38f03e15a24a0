//! Core reconciliation engine
//!
//! The ReconciliationEngine is responsible for:
//! - Resolving the current public IP via PublicIpResolver
//! - Reading the registered IP via DnsRecordStore
//! - Upserting the record only when the two differ
//! - Signalling start/failure to the healthcheck and error reporter
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────────────┐
//!                      │ ReconciliationEngine │
//!                      └──────────────────────┘
//!                                 │
//!     ┌───────────────────┬───────┴───────────┬───────────────────┐
//!     │                   │                   │                   │
//!     ▼                   ▼                   ▼                   ▼
//! ┌─────────────┐ ┌────────────────┐ ┌────────────────┐ ┌───────────────┐
//! │ Healthcheck │ │ PublicIp       │ │ DnsRecordStore │ │ ErrorReporter │
//! │ (ping)      │ │ Resolver       │ │ (read/upsert)  │ │ (capture)     │
//! └─────────────┘ └────────────────┘ └────────────────┘ └───────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Start ping (always, result ignored)
//! 2. Resolve the public IP
//! 3. Read the registered IP
//! 4. Compare; upsert only if they differ
//! 5. On any failure: failure ping, capture, `Failed` outcome
//!
//! The engine never retries and never exits the process. The caller maps
//! the returned [`ReconciliationOutcome`] to an exit status.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{Instrument, debug, error, info, info_span};

use crate::error::Error;
use crate::traits::{DnsRecordStore, ErrorReporter, HealthcheckNotifier, PublicIpResolver};
use crate::types::{DnsRecordTarget, IpAddress};

/// Reconciliation stage in which a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Discovering the public IP
    ResolvingPublicIp,
    /// Reading the IP currently published in DNS
    ResolvingRegisteredIp,
    /// Writing the new IP to DNS
    Updating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingPublicIp => "resolving public IP",
            Stage::ResolvingRegisteredIp => "resolving registered IP",
            Stage::Updating => "updating record",
        };
        f.write_str(name)
    }
}

/// Result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconciliationOutcome {
    /// The record already points at the public IP; nothing was written
    NoChangeNeeded {
        /// The shared IP
        ip: IpAddress,
    },

    /// The record was upserted
    Updated {
        /// Value the record held before
        old_ip: IpAddress,
        /// Value written
        new_ip: IpAddress,
    },

    /// The run was abandoned
    Failed {
        /// Where it failed
        stage: Stage,
        /// Rendered cause
        cause: String,
    },
}

impl ReconciliationOutcome {
    /// Whether the run ended in a confirmed state
    pub fn is_success(&self) -> bool {
        !matches!(self, ReconciliationOutcome::Failed { .. })
    }
}

impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationOutcome::NoChangeNeeded { ip } => {
                write!(f, "no change needed (record already {})", ip)
            }
            ReconciliationOutcome::Updated { old_ip, new_ip } => {
                write!(f, "updated {} -> {}", old_ip, new_ip)
            }
            ReconciliationOutcome::Failed { stage, cause } => {
                write!(f, "failed while {}: {}", stage, cause)
            }
        }
    }
}

/// Core reconciliation engine
///
/// All collaborators are injected at construction so the engine can be
/// driven by fakes in tests.
///
/// ## Lifecycle
///
/// 1. Create with [`ReconciliationEngine::new()`]
/// 2. Call [`ReconciliationEngine::reconcile()`] once
/// 3. Map the outcome to an exit status and drop the engine
pub struct ReconciliationEngine {
    /// Public IP resolver
    resolver: Box<dyn PublicIpResolver>,

    /// DNS record store
    store: Box<dyn DnsRecordStore>,

    /// Healthcheck pinger
    healthcheck: Box<dyn HealthcheckNotifier>,

    /// Error tracking sink
    reporter: Box<dyn ErrorReporter>,

    /// The record to reconcile
    target: DnsRecordTarget,
}

impl ReconciliationEngine {
    /// Create a new reconciliation engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: Public IP resolver
    /// - `store`: DNS record store
    /// - `healthcheck`: Healthcheck pinger (use `DisabledHealthcheck` when unconfigured)
    /// - `reporter`: Error reporter (use `NoopReporter` when unconfigured)
    /// - `target`: The record to keep in sync
    pub fn new(
        resolver: Box<dyn PublicIpResolver>,
        store: Box<dyn DnsRecordStore>,
        healthcheck: Box<dyn HealthcheckNotifier>,
        reporter: Box<dyn ErrorReporter>,
        target: DnsRecordTarget,
    ) -> Self {
        Self {
            resolver,
            store,
            healthcheck,
            reporter,
            target,
        }
    }

    /// The record this engine reconciles
    pub fn target(&self) -> &DnsRecordTarget {
        &self.target
    }

    /// Run one reconciliation
    ///
    /// Never panics and never returns an error: failures are reported to the
    /// healthcheck and error reporter and surface as
    /// [`ReconciliationOutcome::Failed`].
    pub async fn reconcile(&self) -> ReconciliationOutcome {
        let span = info_span!(
            "reconcile",
            record = %self.target.record_name,
            zone = %self.target.zone_id,
        );

        async {
            self.healthcheck.ping_start().await;

            match self.run_stages().await {
                Ok(outcome) => {
                    info!("Reconciliation finished: {}", outcome);
                    outcome
                }
                Err(err) => self.handle_failure(err).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Resolve, read, compare and (maybe) write
    async fn run_stages(&self) -> Result<ReconciliationOutcome, Error> {
        let public_ip = self.resolve_public_ip().await?;
        debug!(
            "Public IP: {} (via {})",
            public_ip,
            self.resolver.resolver_name()
        );

        let registered_ip = self.resolve_registered_ip().await?;
        debug!(
            "Registered IP: {} (via {})",
            registered_ip,
            self.store.store_name()
        );

        if public_ip == registered_ip {
            debug!("Record already has IP {}, skipping update", public_ip);
            return Ok(ReconciliationOutcome::NoChangeNeeded { ip: public_ip });
        }

        info!(
            "Updating {} -> {} (was: {})",
            self.target.record_name, public_ip, registered_ip
        );
        self.store
            .upsert(&self.target, public_ip)
            .await
            .map_err(|e| into_stage_error(e, Stage::Updating, Error::update))?;

        Ok(ReconciliationOutcome::Updated {
            old_ip: registered_ip,
            new_ip: public_ip,
        })
    }

    async fn resolve_public_ip(&self) -> Result<IpAddress, Error> {
        self.resolver
            .resolve()
            .await
            .map_err(|e| into_stage_error(e, Stage::ResolvingPublicIp, Error::resolution))
    }

    async fn resolve_registered_ip(&self) -> Result<IpAddress, Error> {
        self.store
            .read_current_value(&self.target)
            .await
            .map_err(|e| into_stage_error(e, Stage::ResolvingRegisteredIp, Error::lookup))
    }

    /// Failure ping, capture, then build the `Failed` outcome
    async fn handle_failure(&self, err: Error) -> ReconciliationOutcome {
        let stage = err.stage().unwrap_or(Stage::ResolvingPublicIp);
        error!("Reconciliation failed while {}: {}", stage, err);

        self.healthcheck.ping_failure().await;
        self.reporter.capture(&err);

        ReconciliationOutcome::Failed {
            stage,
            cause: err.to_string(),
        }
    }
}

/// Keep errors that already belong to `stage`; wrap anything else
fn into_stage_error(err: Error, stage: Stage, wrap: fn(String) -> Error) -> Error {
    if err.stage() == Some(stage) {
        err
    } else {
        wrap(err.to_string())
    }
}

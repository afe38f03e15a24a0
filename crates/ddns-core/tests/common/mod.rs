//! Test doubles and common utilities for reconciliation contract tests
//!
//! Every fake records its calls in a shared [`CallLog`] so tests can assert
//! both how often and in which order collaborators were used.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsRecordStore, ErrorReporter, HealthcheckNotifier, PublicIpResolver};
use ddns_core::{DnsRecordTarget, IpAddress, ReconciliationEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered record of collaborator calls, shared between fakes
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls with the given name
    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }
}

/// Parse a test address
pub fn ip(s: &str) -> IpAddress {
    s.parse().expect("valid test address")
}

/// The record every contract test reconciles
pub fn test_target() -> DnsRecordTarget {
    DnsRecordTarget::new("Z0TESTZONE", "home.example.com")
}

/// A resolver that returns a scripted echo body
///
/// The body goes through the same parsing as a real echo response, so
/// `"not-an-ip"` fails with a resolution error.
#[derive(Clone)]
pub struct ScriptedResolver {
    body: std::result::Result<String, String>,
    log: CallLog,
}

impl ScriptedResolver {
    pub fn returning(body: &str, log: &CallLog) -> Self {
        Self {
            body: Ok(body.to_string()),
            log: log.clone(),
        }
    }

    pub fn failing(message: &str, log: &CallLog) -> Self {
        Self {
            body: Err(message.to_string()),
            log: log.clone(),
        }
    }
}

#[async_trait::async_trait]
impl PublicIpResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<IpAddress> {
        self.log.push("resolve");
        match &self.body {
            Ok(body) => body
                .parse::<IpAddress>()
                .map_err(|e: Error| Error::resolution(e.to_string())),
            Err(message) => Err(Error::resolution(message.clone())),
        }
    }

    fn resolver_name(&self) -> &str {
        "scripted"
    }
}

/// An in-memory record store that counts reads and upserts
///
/// Upserts replace the stored value, so repeated upserts with the same value
/// leave exactly one record behind.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    record: Arc<Mutex<Option<IpAddress>>>,
    fail_read: bool,
    fail_upsert: bool,
    read_count: Arc<AtomicUsize>,
    upsert_count: Arc<AtomicUsize>,
    upserts: Arc<Mutex<Vec<(DnsRecordTarget, IpAddress)>>>,
    log: CallLog,
}

impl InMemoryRecordStore {
    /// A store whose record currently holds `value`
    pub fn with_value(value: IpAddress, log: &CallLog) -> Self {
        Self::new(Some(value), log)
    }

    /// A store with no record at all
    pub fn empty(log: &CallLog) -> Self {
        Self::new(None, log)
    }

    fn new(record: Option<IpAddress>, log: &CallLog) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
            fail_read: false,
            fail_upsert: false,
            read_count: Arc::new(AtomicUsize::new(0)),
            upsert_count: Arc::new(AtomicUsize::new(0)),
            upserts: Arc::new(Mutex::new(Vec::new())),
            log: log.clone(),
        }
    }

    /// Make every read fail with a provider error
    pub fn failing_reads(mut self) -> Self {
        self.fail_read = true;
        self
    }

    /// Make every upsert fail with a provider error
    pub fn failing_upserts(mut self) -> Self {
        self.fail_upsert = true;
        self
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn upsert_count(&self) -> usize {
        self.upsert_count.load(Ordering::SeqCst)
    }

    /// Every (target, value) pair passed to upsert
    pub fn upserts(&self) -> Vec<(DnsRecordTarget, IpAddress)> {
        self.upserts.lock().unwrap().clone()
    }

    /// Current stored value
    pub fn value(&self) -> Option<IpAddress> {
        *self.record.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DnsRecordStore for InMemoryRecordStore {
    async fn read_current_value(&self, target: &DnsRecordTarget) -> Result<IpAddress> {
        self.log.push("read");
        self.read_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_read {
            return Err(Error::provider("memory", "ListResourceRecordSets throttled"));
        }

        self.record
            .lock()
            .unwrap()
            .ok_or_else(|| Error::lookup(format!("no record named {}", target.record_name)))
    }

    async fn upsert(&self, target: &DnsRecordTarget, value: IpAddress) -> Result<()> {
        self.log.push("upsert");
        self.upsert_count.fetch_add(1, Ordering::SeqCst);
        self.upserts.lock().unwrap().push((target.clone(), value));

        if self.fail_upsert {
            return Err(Error::update("InvalidChangeBatch"));
        }

        *self.record.lock().unwrap() = Some(value);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// A healthcheck that only counts pings
#[derive(Clone)]
pub struct RecordingHealthcheck {
    log: CallLog,
}

impl RecordingHealthcheck {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

#[async_trait::async_trait]
impl HealthcheckNotifier for RecordingHealthcheck {
    async fn ping_start(&self) {
        self.log.push("ping_start");
    }

    async fn ping_failure(&self) {
        self.log.push("ping_failure");
    }
}

/// An error reporter that keeps what it was given
#[derive(Clone)]
pub struct RecordingReporter {
    captured: Arc<Mutex<Vec<String>>>,
    log: CallLog,
}

impl RecordingReporter {
    pub fn new(log: &CallLog) -> Self {
        Self {
            captured: Arc::new(Mutex::new(Vec::new())),
            log: log.clone(),
        }
    }

    /// Rendered errors passed to capture
    pub fn captured(&self) -> Vec<String> {
        self.captured.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn capture(&self, error: &Error) {
        self.log.push("capture");
        self.captured.lock().unwrap().push(error.to_string());
    }
}

/// Fakes wired into an engine, with handles kept for assertions
pub struct Harness {
    pub engine: ReconciliationEngine,
    pub store: InMemoryRecordStore,
    pub reporter: RecordingReporter,
    pub log: CallLog,
}

impl Harness {
    /// Engine wired to the given resolver and store
    pub fn build(
        resolver: ScriptedResolver,
        store: InMemoryRecordStore,
        log: &CallLog,
    ) -> Self {
        let reporter = RecordingReporter::new(log);
        let engine = ReconciliationEngine::new(
            Box::new(resolver),
            Box::new(store.clone()),
            Box::new(RecordingHealthcheck::new(log)),
            Box::new(reporter.clone()),
            test_target(),
        );

        Self {
            engine,
            store,
            reporter,
            log: log.clone(),
        }
    }

    /// Public IP `public`, registered IP `registered`
    pub fn with_ips(public: &str, registered: &str) -> Self {
        let log = CallLog::new();
        Self::build(
            ScriptedResolver::returning(public, &log),
            InMemoryRecordStore::with_value(ip(registered), &log),
            &log,
        )
    }
}

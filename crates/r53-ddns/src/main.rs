// # r53-ddns
//
// One-shot updater that keeps a Route53 A record pointed at this host's
// public IPv4 address. Meant to be run periodically by cron or a systemd
// timer; it never loops and never retries within a run.
//
// This binary is a thin integration layer:
// 1. Parse the command line and read configuration from the environment
// 2. Initialize logging and the runtime
// 3. Wire the resolver, record store and monitoring adapters
// 4. Run the requested command and map the result to an exit status
//
// All reconciliation logic lives in `ddns-core`.
//
// ## Example
//
// ```bash
// export DDNS_HOSTED_ZONE_ID=Z0123456789ABC
// export DDNS_RECORD_NAME=home.example.com
// export DDNS_HEALTHCHECK_URL=https://hc-ping.com/your-uuid
//
// r53-ddns              # same as `r53-ddns run`
// r53-ddns whats-my-ip
// r53-ddns registered-ip
// ```

mod cli;
mod env_config;

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::{
    DdnsConfig, DisabledHealthcheck, DnsRecordStore, ErrorReporter, HealthcheckNotifier,
    NoopReporter, PublicIpResolver, ReconciliationEngine, ReconciliationOutcome,
};
use ddns_ip_http::HttpIpResolver;
use ddns_notify::{HttpHealthcheck, SentryReporter};
use ddns_provider_route53::{DEFAULT_OPERATION_TIMEOUT, Route53RecordStore};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command};

/// Exit codes for different termination scenarios
///
/// - 0: The command completed (record in sync, IP printed)
/// - 1: Configuration or startup error
/// - 2: Runtime error (the run failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Normal exit
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The command failed at runtime
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&ReconciliationOutcome> for DdnsExitCode {
    fn from(outcome: &ReconciliationOutcome) -> Self {
        if outcome.is_success() {
            DdnsExitCode::Success
        } else {
            DdnsExitCode::RuntimeError
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match env_config::load_config(|name| std::env::var(name).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let code = rt.block_on(async {
        match cli.selected_command() {
            Command::Run { json } => run(config, json).await,
            Command::WhatsMyIp => whats_my_ip(config).await,
            Command::RegisteredIp => registered_ip(config).await,
        }
    });

    code.into()
}

/// Reconcile the record once
async fn run(config: DdnsConfig, json: bool) -> DdnsExitCode {
    if let Err(e) = validate_all(&config) {
        error!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError;
    }

    let engine = build_engine(&config).await;
    info!("Reconciling {}", engine.target());

    let outcome = engine.reconcile().await;

    if json {
        match serde_json::to_string(&outcome) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => error!("Failed to render outcome: {}", e),
        }
    }

    DdnsExitCode::from(&outcome)
}

/// Print the current public IP
async fn whats_my_ip(config: DdnsConfig) -> DdnsExitCode {
    if let Err(e) = config.ip_echo.validate() {
        error!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError;
    }

    let resolver = HttpIpResolver::from_config(&config.ip_echo);
    match resolver.resolve().await {
        Ok(ip) => {
            println!("Your public IP address is: {}", ip);
            DdnsExitCode::Success
        }
        Err(e) => {
            error!("{}", e);
            DdnsExitCode::RuntimeError
        }
    }
}

/// Print the IP currently published in the record
async fn registered_ip(config: DdnsConfig) -> DdnsExitCode {
    let validated = env_config::require(&config)
        .and_then(|_| config.credentials.validate().context("Invalid credentials"))
        .and_then(|_| config.record.validate().context("Invalid record"));
    if let Err(e) = validated {
        error!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError;
    }

    let target = config.target();
    let store = Route53RecordStore::connect(&config.credentials, DEFAULT_OPERATION_TIMEOUT).await;
    match store.read_current_value(&target).await {
        Ok(ip) => {
            println!("Registered IP address for {} is: {}", target.record_name, ip);
            DdnsExitCode::Success
        }
        Err(e) => {
            error!("{}", e);
            DdnsExitCode::RuntimeError
        }
    }
}

fn validate_all(config: &DdnsConfig) -> Result<()> {
    env_config::require(config)?;
    config.validate()?;
    Ok(())
}

/// Wire the adapters selected by `config` into an engine
async fn build_engine(config: &DdnsConfig) -> ReconciliationEngine {
    let resolver = HttpIpResolver::from_config(&config.ip_echo);
    let store = Route53RecordStore::connect(&config.credentials, DEFAULT_OPERATION_TIMEOUT).await;

    let healthcheck: Box<dyn HealthcheckNotifier> = match config.monitoring.healthcheck_url() {
        Some(_) => Box::new(HttpHealthcheck::from_config(&config.monitoring)),
        None => {
            info!("No healthcheck URL configured, pings disabled");
            Box::new(DisabledHealthcheck)
        }
    };

    let sentry = SentryReporter::from_config(&config.monitoring);
    let reporter: Box<dyn ErrorReporter> = if sentry.is_enabled() {
        Box::new(sentry)
    } else {
        Box::new(NoopReporter)
    };

    ReconciliationEngine::new(
        Box::new(resolver),
        Box::new(store),
        healthcheck,
        reporter,
        config.target(),
    )
}

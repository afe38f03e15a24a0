//! Error types for the DDNS system
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

use crate::engine::Stage;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// The public IP could not be obtained or did not parse
    #[error("Public IP resolution failed: {0}")]
    Resolution(String),

    /// The registered DNS record could not be read
    #[error("DNS record lookup failed: {0}")]
    Lookup(String),

    /// The DNS record write was rejected
    #[error("DNS record update failed: {0}")]
    Update(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a public IP resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a DNS record lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a DNS record update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::Update(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// The reconciliation stage this error belongs to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Resolution(_) => Some(Stage::ResolvingPublicIp),
            Error::Lookup(_) => Some(Stage::ResolvingRegisteredIp),
            Error::Update(_) => Some(Stage::Updating),
            _ => None,
        }
    }
}

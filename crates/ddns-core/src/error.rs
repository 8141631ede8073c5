//! Error types for the DDNS synchronizer
//!
//! The first four variants are the run-level taxonomy: each one ends the
//! current invocation with its own exit status. The remaining variants are
//! raised inside clients and are wrapped into a run-level variant by the
//! reconciler or resolver.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// Missing, malformed or placeholder configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every IP detection service failed
    #[error("IP resolution failed: {0}")]
    Resolution(String),

    /// DNS record lookup failed
    #[error("DNS record lookup failed: {0}")]
    Lookup(String),

    /// DNS record create or update failed
    #[error("DNS record write failed: {0}")]
    Write(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider-reported error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a write error
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

//! One-shot run orchestration
//!
//! `Runner::run` is the whole job: validate configuration, resolve the
//! public IP, reconcile the record. Each step either succeeds or ends the run
//! with a typed error, which [`ExitStatus`] maps to the process exit code.

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::reconciler::{ReconciliationResult, Reconciler};
use crate::traits::{DnsProvider, IpResolver};
use tracing::{error, info, warn};

/// Process exit codes
///
/// - 0: Record unchanged, updated or created
/// - 1: Configuration invalid (no network calls made)
/// - 2: No IP detection service answered
/// - 3: Provider lookup failed (nothing written)
/// - 4: Provider rejected the create or update
/// - 5: Setup or runtime error outside the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    ConfigError = 1,
    ResolutionError = 2,
    LookupError = 3,
    WriteError = 4,
    RuntimeError = 5,
}

impl ExitStatus {
    /// Map a run outcome to its exit status
    pub fn from_outcome(outcome: &Result<ReconciliationResult>) -> Self {
        match outcome {
            Ok(_) => ExitStatus::Success,
            Err(e) => ExitStatus::from(e),
        }
    }

    /// Numeric exit code
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<&Error> for ExitStatus {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) => ExitStatus::ConfigError,
            Error::Resolution(_) => ExitStatus::ResolutionError,
            Error::Lookup(_) => ExitStatus::LookupError,
            Error::Write(_) => ExitStatus::WriteError,
            Error::Http(_) | Error::Provider { .. } => ExitStatus::RuntimeError,
        }
    }
}

/// Runs a single synchronization pass
pub struct Runner {
    config: SyncConfig,
    resolver: Box<dyn IpResolver>,
    reconciler: Reconciler,
}

impl Runner {
    /// Create a runner
    ///
    /// Construction performs no validation and no I/O; both happen in
    /// [`Runner::run`].
    pub fn new(
        config: SyncConfig,
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
    ) -> Self {
        let reconciler = Reconciler::new(
            provider,
            config.provider.zone_id.clone(),
            config.record.clone(),
        )
        .with_mode(config.mode);

        Self {
            config,
            resolver,
            reconciler,
        }
    }

    /// Execute the run
    ///
    /// # Returns
    ///
    /// - `Ok(ReconciliationResult)`: The record is in sync
    /// - `Err(Error)`: The first failing step's error, already logged
    pub async fn run(&self) -> Result<ReconciliationResult> {
        info!("Starting Cloudflare Dynamic DNS update check");

        if let Err(e) = self.config.validate() {
            error!("{}", e);
            return Err(e);
        }

        info!(
            "Target record: {} ({}, ttl={}, proxied={}) via {}",
            self.config.record.name,
            self.config.record.record_type,
            self.config.record.ttl,
            self.config.record.proxied,
            self.reconciler.provider_name()
        );

        if self.config.is_dry_run() {
            warn!("Running in DRY-RUN mode - no DNS changes will be made");
        }

        let resolved = self.resolver.resolve().await.inspect_err(|e| {
            error!("Failed to get current public IP address from any service: {}", e);
        })?;

        info!(
            "Current public IP address: {} (via {})",
            resolved.address, resolved.source
        );

        let result = self.reconciler.reconcile(&resolved).await.inspect_err(|e| {
            error!("Dynamic DNS update failed: {}", e);
        })?;

        let action = match &result {
            ReconciliationResult::Unchanged { .. } => "unchanged",
            ReconciliationResult::Updated { .. } => "updated",
            ReconciliationResult::Created { .. } => "created",
        };

        if self.config.is_dry_run() && result.wrote() {
            info!(
                "Dynamic DNS update process completed: {} (dry-run, nothing written)",
                action
            );
        } else {
            info!("Dynamic DNS update process completed: {}", action);
        }

        Ok(result)
    }
}

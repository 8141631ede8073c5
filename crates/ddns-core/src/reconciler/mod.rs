//! Single-pass record reconciliation
//!
//! The Reconciler is responsible for:
//! - Looking up the provider's current record
//! - Deciding between no-op, update and create
//! - Issuing at most one write
//!
//! ## Decision Flow
//!
//! ```text
//!                  ┌──────────────┐
//!   ResolvedIp ───▶│  Reconciler  │
//!                  └──────┬───────┘
//!                         │ lookup_record()
//!                         ▼
//!        ┌────────────────┼─────────────────┐
//!        │                │                 │
//!  same content     other content       no record
//!        │                │                 │
//!        ▼                ▼                 ▼
//!    Unchanged     update_record()   create_record()
//! ```
//!
//! A failed lookup ends the pass before any write. A failed write is
//! reported once; the next scheduled run is the retry.

use crate::config::{RecordConfig, RunMode};
use crate::error::{Error, Result};
use crate::traits::{DesiredRecord, DnsProvider, ResolvedIp};
use tracing::{error, info, warn};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationResult {
    /// Record content already equals the resolved address
    Unchanged {
        /// The current content
        content: String,
    },

    /// Existing record rewritten
    Updated {
        /// Provider ID of the rewritten record
        record_id: String,
        /// Content before the update
        previous: String,
        /// Content after the update
        current: String,
    },

    /// New record inserted
    Created {
        /// Content of the new record
        content: String,
    },
}

impl ReconciliationResult {
    /// Whether a write was issued
    pub fn wrote(&self) -> bool {
        !matches!(self, ReconciliationResult::Unchanged { .. })
    }
}

/// Compares a resolved address with the provider's record and applies the
/// minimal write
pub struct Reconciler {
    /// DNS provider for reading and writing the record
    provider: Box<dyn DnsProvider>,

    /// Zone holding the record
    zone_id: String,

    /// The record kept in sync
    record: RecordConfig,

    /// Live or dry-run; only affects what is logged after a write
    mode: RunMode,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `provider`: DNS provider implementation
    /// - `zone_id`: Zone identifier
    /// - `record`: Record name, type, TTL and proxy flag
    pub fn new(provider: Box<dyn DnsProvider>, zone_id: impl Into<String>, record: RecordConfig) -> Self {
        Self {
            provider,
            zone_id: zone_id.into(),
            record,
            mode: RunMode::Live,
        }
    }

    /// Report writes as skipped when the provider runs in dry-run mode
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(ReconciliationResult)`: No-op, update or create succeeded
    /// - `Err(Error::Lookup)`: Lookup failed, nothing was written
    /// - `Err(Error::Write)`: The create or update was rejected
    pub async fn reconcile(&self, resolved: &ResolvedIp) -> Result<ReconciliationResult> {
        let record_type = self.record.record_type;

        if let Some(ip) = resolved.parsed()
            && !record_type.accepts(&ip)
        {
            warn!(
                "Resolved address {} does not match record type {} of {}",
                ip, record_type, self.record.name
            );
        }

        let existing = self
            .provider
            .lookup_record(&self.zone_id, &self.record.name, record_type)
            .await
            .map_err(|e| {
                error!("Error getting DNS record {}: {}", self.record.name, e);
                Error::lookup(format!("{} ({}): {}", self.record.name, record_type, e))
            })?;

        let desired = DesiredRecord::from_config(&self.record, resolved.address.clone());

        match existing {
            Some(record) if record.content == resolved.address => {
                info!(
                    "Found existing DNS record: {} ({})",
                    record.name, record.content
                );
                info!("IP address hasn't changed, no update needed");
                Ok(ReconciliationResult::Unchanged {
                    content: record.content,
                })
            }
            Some(record) => {
                info!(
                    "Found existing DNS record: {} ({})",
                    record.name, record.content
                );
                info!(
                    "Updating {} -> {} (was: {})",
                    self.record.name, resolved.address, record.content
                );

                self.provider
                    .update_record(&self.zone_id, &record.id, &desired)
                    .await
                    .map_err(|e| {
                        error!("Error updating DNS record {}: {}", self.record.name, e);
                        Error::write(format!("update of {} ({}): {}", self.record.name, record.id, e))
                    })?;

                if self.mode == RunMode::DryRun {
                    info!(
                        "[DRY-RUN] Update of {} to {} skipped, no change sent",
                        self.record.name, resolved.address
                    );
                } else {
                    info!("Successfully updated DNS record to {}", resolved.address);
                }
                Ok(ReconciliationResult::Updated {
                    record_id: record.id,
                    previous: record.content,
                    current: resolved.address.clone(),
                })
            }
            None => {
                info!("No existing DNS record found for {}", self.record.name);

                self.provider
                    .create_record(&self.zone_id, &desired)
                    .await
                    .map_err(|e| {
                        error!("Error creating DNS record {}: {}", self.record.name, e);
                        Error::write(format!("create of {}: {}", self.record.name, e))
                    })?;

                if self.mode == RunMode::DryRun {
                    info!(
                        "[DRY-RUN] Creation of {} with IP {} skipped, no change sent",
                        self.record.name, resolved.address
                    );
                } else {
                    info!(
                        "Successfully created DNS record for {} with IP {}",
                        self.record.name, resolved.address
                    );
                }
                Ok(ReconciliationResult::Created {
                    content: resolved.address.clone(),
                })
            }
        }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }
}

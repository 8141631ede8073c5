// # DNS Provider Trait
//
// Defines the interface for reading and writing a DNS record via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
// use ddns_core::config::RecordType;
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     match provider.lookup_record("zone", "home.example.com", RecordType::A).await? {
//         Some(record) => println!("{} -> {}", record.name, record.content),
//         None => println!("no record"),
//     }
//
//     Ok(())
// }
// ```

use crate::config::{RecordConfig, RecordType};
use async_trait::async_trait;

/// A DNS record as currently stored by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record name
    pub name: String,
    /// The record type as reported by the provider
    pub record_type: String,
    /// Record content (the address string)
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether the record is proxied
    pub proxied: bool,
}

/// The record state a create or update should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecord {
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl DesiredRecord {
    /// Build the write payload for a configured record and a new address
    pub fn from_config(record: &RecordConfig, content: impl Into<String>) -> Self {
        Self {
            record_type: record.record_type,
            name: record.name.clone(),
            content: content.into(),
            ttl: record.ttl,
            proxied: record.proxied,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Each operation is independent and stateless across calls.
///
/// # Rules
///
/// - ✅ One API call per operation
/// - ✅ Convert transport errors and provider-reported errors into `Err`
/// - ❌ No retry logic or backoff (the scheduler re-runs the job)
/// - ❌ No caching between calls
/// - ❌ No decision on whether a write is needed (owned by `Reconciler`)
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up a record by name and type
    ///
    /// # Returns
    ///
    /// - `Ok(Some(DnsRecord))`: The first matching record
    /// - `Ok(None)`: The provider reported zero matches
    /// - `Err(Error)`: Transport error, non-2xx status or unsuccessful payload
    async fn lookup_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<DnsRecord>, crate::Error>;

    /// Create a new record
    ///
    /// Not idempotent: calling this while a matching record exists may
    /// create a duplicate. Callers must look up first.
    async fn create_record(
        &self,
        zone_id: &str,
        record: &DesiredRecord,
    ) -> Result<(), crate::Error>;

    /// Replace the record identified by `record_id`
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DesiredRecord,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

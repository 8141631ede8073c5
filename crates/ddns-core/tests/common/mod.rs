//! Test doubles and common utilities for contract tests
//!
//! The doubles count every call so tests can assert on exactly which
//! network operations a run would have performed.

#![allow(dead_code)]

use ddns_core::config::{
    Credentials, IpDetectionConfig, LoggingConfig, ProviderConfig, RecordConfig, RecordType,
    RunMode, SyncConfig,
};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DesiredRecord, DnsProvider, DnsRecord, IpResolver, ResolvedIp};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpResolver that returns a scripted answer
pub struct ScriptedResolver {
    /// Address to return, or None to fail
    answer: Option<String>,
    /// Call counter for resolve()
    resolve_call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    /// Resolver that always answers with `address`
    pub fn answering(address: &str) -> Self {
        Self {
            answer: Some(address.to_string()),
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver whose every source fails
    pub fn failing() -> Self {
        Self {
            answer: None,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }

    /// Create a new ScriptedResolver that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answer: other.answer.clone(),
            resolve_call_count: Arc::clone(&other.resolve_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<ResolvedIp> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(address) => Ok(ResolvedIp::new(address, "https://ip.test")),
            None => Err(Error::resolution("all IP detection services failed")),
        }
    }
}

/// A write issued against the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Create {
        content: String,
    },
    Update {
        record_id: String,
        content: String,
    },
}

/// A mock DnsProvider backed by an in-memory record list
pub struct MockDnsProvider {
    /// Records the provider "stores"; lookup returns the first match
    records: Arc<Mutex<Vec<DnsRecord>>>,
    /// Call counter for lookup_record()
    lookup_call_count: Arc<AtomicUsize>,
    /// Recorded create/update calls
    writes: Arc<Mutex<Vec<WriteCall>>>,
    /// Fail every lookup
    fail_lookup: bool,
    /// Fail every create/update
    fail_writes: bool,
    /// Counter used to mint record IDs on create
    next_id: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    /// Provider with no records
    pub fn empty() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            lookup_call_count: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(Mutex::new(Vec::new())),
            fail_lookup: false,
            fail_writes: false,
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Provider holding one A record for `name`
    pub fn with_record(id: &str, name: &str, content: &str) -> Self {
        let provider = Self::empty();
        provider.records.lock().unwrap().push(DnsRecord {
            id: id.to_string(),
            name: name.to_string(),
            record_type: "A".to_string(),
            content: content.to_string(),
            ttl: 120,
            proxied: true,
        });
        provider
    }

    /// Make every lookup fail
    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    /// Make every create/update fail
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Get the number of times lookup_record() was called
    pub fn lookup_call_count(&self) -> usize {
        self.lookup_call_count.load(Ordering::SeqCst)
    }

    /// Get every create/update call in order
    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    /// Get the current stored records
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Total number of provider calls of any kind
    pub fn total_call_count(&self) -> usize {
        self.lookup_call_count() + self.writes().len()
    }

    /// Create a new MockDnsProvider that shares state and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            lookup_call_count: Arc::clone(&other.lookup_call_count),
            writes: Arc::clone(&other.writes),
            fail_lookup: other.fail_lookup,
            fail_writes: other.fail_writes,
            next_id: Arc::clone(&other.next_id),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn lookup_record(
        &self,
        _zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<DnsRecord>> {
        self.lookup_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(Error::provider("mock", "Authentication failed. Status: 403"));
        }

        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name && r.record_type == record_type.as_str())
            .cloned())
    }

    async fn create_record(&self, _zone_id: &str, record: &DesiredRecord) -> Result<()> {
        self.writes.lock().unwrap().push(WriteCall::Create {
            content: record.content.clone(),
        });
        if self.fail_writes {
            return Err(Error::provider("mock", "Record already exists. Status: 400"));
        }

        let id = format!("rec{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.records.lock().unwrap().push(DnsRecord {
            id,
            name: record.name.clone(),
            record_type: record.record_type.as_str().to_string(),
            content: record.content.clone(),
            ttl: record.ttl,
            proxied: record.proxied,
        });
        Ok(())
    }

    async fn update_record(
        &self,
        _zone_id: &str,
        record_id: &str,
        record: &DesiredRecord,
    ) -> Result<()> {
        self.writes.lock().unwrap().push(WriteCall::Update {
            record_id: record_id.to_string(),
            content: record.content.clone(),
        });
        if self.fail_writes {
            return Err(Error::provider("mock", "Conflict. Status: 409"));
        }

        let mut records = self.records.lock().unwrap();
        let stored = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::provider("mock", "Record not found. Status: 404"))?;
        stored.content = record.content.clone();
        stored.ttl = record.ttl;
        stored.proxied = record.proxied;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a valid SyncConfig for testing
pub fn minimal_config(record_name: &str) -> SyncConfig {
    SyncConfig {
        provider: ProviderConfig {
            credentials: Credentials::ApiToken("abcdef0123456789abcdef0123456789abcdef01".to_string()),
            zone_id: "023e105f4ecef8ad9ca31a8372d0c353".to_string(),
            api_base: "https://api.cloudflare.test/client/v4".to_string(),
        },
        record: RecordConfig::new(record_name),
        ip_detection: IpDetectionConfig::default(),
        logging: LoggingConfig::default(),
        mode: RunMode::Live,
    }
}

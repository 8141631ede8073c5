//! Cloudflare API v4 wire types

use ddns_core::config::RecordType;
use ddns_core::traits::{DesiredRecord, DnsRecord};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every v4 endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Render an `errors[]` array as `code: message; ...`
pub(crate) fn describe(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error detail provided".to_string();
    }

    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A DNS record as returned by the list endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct WireRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

impl From<WireRecord> for DnsRecord {
    fn from(record: WireRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            content: record.content,
            ttl: record.ttl,
            proxied: record.proxied,
        }
    }
}

/// Body of POST and PUT requests
#[derive(Debug, Serialize)]
pub(crate) struct RecordPayload<'a> {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
}

impl<'a> From<&'a DesiredRecord> for RecordPayload<'a> {
    fn from(record: &'a DesiredRecord) -> Self {
        Self {
            record_type: record.record_type,
            name: &record.name,
            content: &record.content,
            ttl: record.ttl,
            proxied: record.proxied,
        }
    }
}

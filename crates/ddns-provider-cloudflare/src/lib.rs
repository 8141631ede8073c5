// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the DDNS synchronizer.
//
// ## Implementation Status
//
// - ✅ One HTTP request per operation (lookup, create, update)
// - ✅ Full error propagation (provider `errors[]` detail included)
// - ✅ HTTP timeout configured (bounded by the run configuration)
// - ✅ Specific error messages for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ✅ API token or email + global API key authentication
// - ❌ NO retry logic (the scheduler re-runs the job)
// - ❌ NO caching between calls
// - ❌ NO decision on whether a write is needed (owned by Reconciler)
//
// ## Security Requirements
//
// - Credentials NEVER appear in logs or Debug output
// - Credentials come from configuration only, never from literals
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=...&name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

mod wire;

use async_trait::async_trait;
use ddns_core::config::{Credentials, ProviderConfig, RecordType, RunMode};
use ddns_core::traits::{DesiredRecord, DnsProvider, DnsRecord};
use ddns_core::{Error, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use wire::{ApiEnvelope, RecordPayload, WireRecord};

/// Provider name used in errors and logs
const PROVIDER: &str = "cloudflare";

/// Cloudflare DNS provider
///
/// Stateless and single-shot: every trait method issues exactly one API
/// request and returns its outcome.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform record lookups
/// - Log the intended POST/PUT payload
/// - **NOT** actually modify DNS records
#[derive(Debug)]
pub struct CloudflareProvider {
    /// Authentication material (Debug output is redacted)
    credentials: Credentials,

    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform lookups but skip writes
    dry_run: bool,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: API token with Zone:DNS:Edit permission, or email + global key
    /// - `api_base`: API base URL (e.g., "https://api.cloudflare.com/client/v4")
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform lookups but skip writes
    pub fn new(
        credentials: Credentials,
        api_base: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider from the run configuration
    pub fn from_config(config: &ProviderConfig, mode: RunMode, timeout: Duration) -> Result<Self> {
        if mode == RunMode::DryRun {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(
            config.credentials.clone(),
            config.api_base.clone(),
            timeout,
            mode == RunMode::DryRun,
        )
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.api_base, zone_id)
    }

    /// Attach authentication headers
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Content-Type", "application/json");
        match &self.credentials {
            Credentials::ApiToken(token) => request.bearer_auth(token),
            Credentials::GlobalKey { email, key } => request
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", key),
        }
    }

    /// Send a request and unwrap the Cloudflare response envelope
    ///
    /// # Returns
    ///
    /// - `Ok(Option<T>)`: The `result` field of a successful response
    /// - `Err(Error)`: Transport error, non-2xx status, unparseable body or `success: false`
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<Option<T>> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            let body = body.unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &body, action));
        }

        let body = body
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to read response: {}", e)))?;

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER,
                format!("{} failed: {}", action, wire::describe(&envelope.errors)),
            ));
        }

        Ok(envelope.result)
    }

    /// Log the payload a write would send
    fn log_dry_run(&self, verb: &str, url: &str, payload: &RecordPayload<'_>) {
        tracing::info!(
            "[DRY-RUN] Would send {} request to {} with payload: {}",
            verb,
            url,
            serde_json::to_string(payload).unwrap_or_default()
        );
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Look up a record by name and type
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=home.example.com
    /// ```
    async fn lookup_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<DnsRecord>> {
        tracing::debug!("Looking up record: {} (type: {})", name, record_type);

        let request = self
            .client
            .get(self.records_url(zone_id))
            .query(&[("type", record_type.as_str()), ("name", name)]);

        let records: Vec<WireRecord> = self
            .send(request, "Record lookup")
            .await?
            .ok_or_else(|| {
                Error::provider(PROVIDER, "Invalid response format: result is not an array")
            })?;

        if records.len() > 1 {
            tracing::warn!(
                "Found {} records matching {} (type: {}); using the first (id: {})",
                records.len(),
                name,
                record_type,
                records[0].id
            );
        }

        Ok(records.into_iter().next().map(DnsRecord::from))
    }

    /// Create a new record
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// {"type": "A", "name": "...", "content": "...", "ttl": 120, "proxied": true}
    /// ```
    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<()> {
        let url = self.records_url(zone_id);
        let payload = RecordPayload::from(record);

        if self.dry_run {
            self.log_dry_run("POST", &url, &payload);
            return Ok(());
        }

        let created: Option<serde_json::Value> = self
            .send(self.client.post(&url).json(&payload), "Record create")
            .await?;

        if let Some(id) = created.as_ref().and_then(|r| r["id"].as_str()) {
            tracing::debug!("Created record ID: {}", id);
        }
        Ok(())
    }

    /// Replace an existing record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {"type": "A", "name": "...", "content": "...", "ttl": 120, "proxied": true}
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DesiredRecord,
    ) -> Result<()> {
        let url = format!("{}/{}", self.records_url(zone_id), record_id);
        let payload = RecordPayload::from(record);

        if self.dry_run {
            self.log_dry_run("PUT", &url, &payload);
            return Ok(());
        }

        let _: Option<serde_json::Value> = self
            .send(self.client.put(&url).json(&payload), "Record update")
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Map a non-2xx response to an actionable error
fn status_error(status: StatusCode, body: &str, action: &str) -> Error {
    // Prefer the provider's own error list over the raw body
    let detail = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .filter(|envelope| !envelope.errors.is_empty())
        .map(|envelope| wire::describe(&envelope.errors))
        .unwrap_or_else(|| body.to_string());

    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid credentials or insufficient permissions. Status: {} - {}",
            status, detail
        ),
        404 => format!("{} failed: zone or record not found. Status: {} - {}", action, status, detail),
        409 => format!(
            "Conflict: Record is being updated by another process. Status: {} - {}",
            status, detail
        ),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!("Cloudflare server error (transient): {} - {}", status, detail),
        _ => format!("{} failed: {} - {}", action, status, detail),
    };

    Error::provider(PROVIDER, message)
}

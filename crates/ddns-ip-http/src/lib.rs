// # HTTP IP Resolver
//
// This crate provides the public IP resolver for the DDNS synchronizer.
//
// ## Behavior
//
// Queries a prioritized list of public-IP echo services (e.g., api.ipify.org,
// icanhazip.com) one at a time:
//
// - ✅ First HTTP 200 wins; its trimmed body is the answer
// - ✅ Remaining services are not contacted after a success
// - ✅ Every request is bounded by the client timeout
// - ❌ NO retry of a failed service within a run
// - ❌ NO concurrent fan-out (keeps load on free services minimal)
//
// The body is not required to be an IP literal. A non-literal answer is
// logged as a warning and still returned; the DNS provider is the arbiter.

use ddns_core::config::IpDetectionConfig;
use ddns_core::traits::{IpResolver, ResolvedIp};
use ddns_core::{Error, Result};

use std::time::Duration;

use reqwest::StatusCode;

/// User agent sent to echo services; several return HTML to browser agents
const USER_AGENT: &str = concat!("ddns-ip-http/", env!("CARGO_PKG_VERSION"));

/// HTTP-based public IP resolver with ordered fallback
#[derive(Debug)]
pub struct HttpIpResolver {
    /// Echo service URLs, in priority order
    endpoints: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a new HTTP IP resolver
    ///
    /// # Parameters
    ///
    /// - `endpoints`: Echo service URLs, queried in this order
    /// - `timeout`: Per-request timeout
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { endpoints, client })
    }

    /// Create a resolver from the IP detection configuration
    pub fn from_config(config: &IpDetectionConfig) -> Result<Self> {
        Self::new(
            config.endpoints.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch the address from a single echo service
    async fn fetch(&self, url: &str) -> Result<ResolvedIp> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            return Err(Error::http(format!("HTTP status {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        Ok(ResolvedIp::new(body, url))
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<ResolvedIp> {
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for url in &self.endpoints {
            tracing::debug!("Querying IP detection service {}", url);

            match self.fetch(url).await {
                Ok(resolved) => {
                    if resolved.parsed().is_none() {
                        tracing::warn!(
                            "Response from {} is not an IP literal: '{}'",
                            url,
                            resolved.address
                        );
                    }
                    return Ok(resolved);
                }
                Err(e) => {
                    tracing::warn!("Failed to get IP from {}: {}", url, e);
                    failures.push(format!("{}: {}", url, e));
                }
            }
        }

        Err(Error::resolution(format!(
            "{} service(s) tried [{}]",
            failures.len(),
            failures.join("; ")
        )))
    }
}

// # IP Resolver Trait
//
// Defines the interface for discovering the caller's current public IP.
//
// ## Implementations
//
// - HTTP echo services with fallback: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpResolver;
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let resolved = resolver.resolve().await?;
//     println!("{} (via {})", resolved.address, resolved.source);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// A public IP address as reported by a detection service
///
/// `address` is the trimmed response body. It is compared verbatim with the
/// DNS record content, so no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIp {
    /// Trimmed response body
    pub address: String,
    /// Endpoint that supplied the address
    pub source: String,
}

impl ResolvedIp {
    /// Create a resolved IP from a raw response body
    pub fn new(address: impl AsRef<str>, source: impl Into<String>) -> Self {
        Self {
            address: address.as_ref().trim().to_string(),
            source: source.into(),
        }
    }

    /// Parse the address as an IP literal, if it is one
    pub fn parsed(&self) -> Option<IpAddr> {
        self.address.parse().ok()
    }
}

/// Trait for public IP resolver implementations
///
/// # Contract
///
/// - Query sources sequentially in a fixed priority order
/// - Return on the first success, without touching the remaining sources
/// - Never retry a failed source within the same call
/// - Every outbound request is bounded by a timeout
///
/// Retry across runs is owned by the external scheduler.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedIp)`: The first successful answer
    /// - `Err(Error::Resolution)`: If every source failed
    async fn resolve(&self) -> Result<ResolvedIp, crate::Error>;
}

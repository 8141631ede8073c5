//! Core traits for the DDNS synchronizer
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Discover the current public IP address
//! - [`DnsProvider`]: Look up, create and update DNS records via provider APIs

pub mod ip_resolver;
pub mod dns_provider;

pub use ip_resolver::{IpResolver, ResolvedIp};
pub use dns_provider::{DnsProvider, DnsRecord, DesiredRecord};

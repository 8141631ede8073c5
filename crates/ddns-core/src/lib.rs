// # ddns-core
//
// Core library for the one-shot dynamic DNS synchronizer.
//
// ## Architecture Overview
//
// Each invocation is a single linear pass, started by an external scheduler:
// - **IpResolver**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for looking up, creating and updating a DNS record
// - **Reconciler**: Compares the resolved IP with the record and issues the minimal write
// - **Runner**: Validates configuration, runs resolver and reconciler once, maps the outcome to an exit status
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Stateless**: Nothing is persisted between runs; the provider is the source of truth
// 3. **Idempotent**: Lookup always precedes a write, so re-running is safe
// 4. **Fail Fast**: Invalid configuration stops the run before any network call
// 5. **No In-Process Retry**: The next scheduled run is the retry

pub mod traits;
pub mod reconciler;
pub mod runner;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpResolver, DnsProvider, ResolvedIp, DnsRecord, DesiredRecord};
pub use reconciler::{Reconciler, ReconciliationResult};
pub use runner::{Runner, ExitStatus};
pub use config::{SyncConfig, ProviderConfig, RecordConfig, RecordType, Credentials};
pub use error::{Error, Result};

// # tagdns-core
//
// Core library for the tag-driven dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the reconciliation core:
// - **AddressResolver**: Trait for discovering the public address
// - **DnsProvider**: Trait for listing and patching records at the provider
// - **Logger**: Injected log sink, `TracingLogger` by default
// - **RecordLocator**: Selects the records whose comment carries the management tag
// - **RecordUpdater**: Points the selected records at a new address
// - **Reconciler**: Tracks the last address and drives the flow on a fixed schedule
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic is separate from transports
// 2. **Single Recovery Boundary**: Only `Reconciler::tick` absorbs errors
// 3. **Tag-Scoped Writes**: Only records confirmed tagged in the same pass are patched
// 4. **Library-First**: The daemon is thin wiring around this crate

pub mod traits;
pub mod records;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{Address, AddressResolver, DnsProvider, Logger, TracingLogger};
pub use records::{RecordId, RecordLocator, RecordUpdater};
pub use engine::{Reconciler, TickOutcome};
pub use config::{DdnsConfig, EngineConfig, ProviderConfig, ResolverConfig};
pub use error::{Error, ErrorKind, Result};

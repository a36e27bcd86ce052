//! Core traits for tagdns
//!
//! This module defines the seams between the reconciliation core and the
//! outside world.
//!
//! - [`AddressResolver`]: Discover the public address
//! - [`DnsProvider`]: List and patch records at the provider
//! - [`Logger`]: Injected log sink

pub mod address_resolver;
pub mod dns_provider;
pub mod logger;

pub use address_resolver::{Address, AddressResolver};
pub use dns_provider::{DnsProvider, DnsRecord, PatchResponse, RecordPatch};
pub use logger::{Logger, TracingLogger};

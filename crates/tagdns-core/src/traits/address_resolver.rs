// # Address Resolver Trait
//
// Defines the interface for discovering the host's public IPv4 address.
//
// ## Implementations
//
// - HTTP echo service: `tagdns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use tagdns_core::AddressResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* AddressResolver implementation */;
//
//     let address = resolver.resolve().await?;
//     println!("Public address: {}", address);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A public address as reported by the echo service
///
/// The value is kept as text. Resolvers trim surrounding whitespace but do
/// not otherwise validate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap a resolved address, trimming surrounding whitespace
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Trait for address resolver implementations
///
/// Resolvers are stateless: every call performs exactly one lookup and
/// returns what the service answered. They never retry and never cache;
/// the next scheduled tick is the retry mechanism.
///
/// # Errors
///
/// Connection failures, timeouts and non-2xx statuses are returned as
/// [`crate::Error::Network`].
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolve the current public address
    async fn resolve(&self) -> Result<Address, crate::Error>;
}

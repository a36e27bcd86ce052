// # HTTP Address Resolver
//
// This crate provides the address resolver for tagdns: one GET to an
// IP-echo service per lookup, returning the response body as the address.
//
// ## Behavior
//
// - No caching: every `resolve()` performs a fresh request
// - No retries: the reconciler's next tick is the retry
// - Body is trimmed but otherwise not validated
// - Connection failures, timeouts and non-2xx statuses are network errors

use tagdns_core::config::ResolverConfig;
use tagdns_core::traits::{Address, AddressResolver};
use tagdns_core::{Error, Result};

use std::time::Duration;

/// Default request timeout
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Address resolver backed by an HTTP echo service
#[derive(Debug, Clone)]
pub struct HttpAddressResolver {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAddressResolver {
    /// Create a resolver with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a resolver with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &ResolverConfig, timeout: Duration) -> Result<Self> {
        config.validate()?;
        Self::with_timeout(config.url.clone(), timeout)
    }

    /// The echo service URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self) -> Result<Address> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "Address lookup at {} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        let address = Address::new(body);
        tracing::debug!("Resolved public address {} via {}", address, self.url);
        Ok(address)
    }
}

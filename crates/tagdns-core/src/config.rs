//! Configuration types for tagdns
//!
//! Values are supplied once at startup and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Placeholder shipped in sample deployment files
const PLACEHOLDER: &str = "changeme";

/// Tag used when none is configured
pub const DEFAULT_MANAGEMENT_TAG: &str = "[update]";

/// Echo service used when none is configured
pub const DEFAULT_RESOLVER_URL: &str = "https://api.ipify.org";

/// Main tagdns configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Address resolver configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Create a configuration with default resolver and engine settings
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            provider: ProviderConfig::new(api_token, zone_id),
            resolver: ResolverConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.resolver.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// Credentials and zone for the DNS provider
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Zone whose records are managed
    pub zone_id: String,

    /// Log patches instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Create a live provider configuration
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        check_required("API token", &self.api_token)?;
        check_required("zone ID", &self.zone_id)?;
        Ok(())
    }
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn check_required(name: &str, value: &str) -> Result<(), crate::Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", name)));
    }
    if trimmed.eq_ignore_ascii_case(PLACEHOLDER) {
        return Err(crate::Error::config(format!(
            "{} is still set to the placeholder '{}'",
            name, PLACEHOLDER
        )));
    }
    Ok(())
}

/// Address resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// URL of the IP-echo service
    #[serde(default = "default_resolver_url")]
    pub url: String,
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("Resolver URL cannot be empty"));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Resolver URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            url: default_resolver_url(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Marker selecting which records this process may modify
    #[serde(default = "default_management_tag")]
    pub management_tag: String,

    /// Seconds between reconciliation ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-request timeout for outbound HTTP calls (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.management_tag.is_empty() {
            return Err(crate::Error::config("Management tag cannot be empty"));
        }
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Tick interval must be > 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }
        Ok(())
    }

    /// Tick interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// HTTP timeout as a [`Duration`]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            management_tag: default_management_tag(),
            interval_secs: default_interval_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_resolver_url() -> String {
    DEFAULT_RESOLVER_URL.to_string()
}

fn default_management_tag() -> String {
    DEFAULT_MANAGEMENT_TAG.to_string()
}

fn default_interval_secs() -> u64 {
    60
}

fn default_http_timeout_secs() -> u64 {
    30
}

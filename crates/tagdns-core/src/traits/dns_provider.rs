// # DNS Provider Trait
//
// Defines the interface to the remote DNS provider: listing a zone's records
// and patching a single record.
//
// ## Implementations
//
// - Cloudflare: `tagdns-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use tagdns_core::traits::{DnsProvider, RecordPatch};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     for record in provider.list_records("zone-id").await? {
//         println!("{} -> {}", record.id, record.content);
//     }
//
//     let patch = RecordPatch::new("1.2.3.4", "[update]");
//     let response = provider.patch_record("zone-id", "record-id", &patch).await?;
//     assert!(response.is_success());
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A DNS record as listed by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record content (an address for A records)
    #[serde(default)]
    pub content: String,
    /// Free-text annotation; `None` when the record has none
    #[serde(default)]
    pub comment: Option<String>,
}

impl DnsRecord {
    /// Whether the annotation contains `tag` as a substring
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.comment
            .as_deref()
            .is_some_and(|comment| comment.contains(tag))
    }
}

/// Fields written to a record by a targeted patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    /// New record content
    pub content: String,
    /// New annotation, replacing the previous one entirely
    pub comment: String,
}

impl RecordPatch {
    pub fn new(content: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            comment: comment.into(),
        }
    }
}

/// Body of a transport-successful patch response
///
/// Application-level failures arrive here rather than as an `Err`, so the
/// caller can tell them apart from network failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchResponse {
    /// Application-level errors, flattened to text
    pub errors: Vec<String>,
    /// Informational messages, flattened to text
    pub messages: Vec<String>,
}

impl PatchResponse {
    /// Whether the provider reported no errors
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable failure detail
    ///
    /// Messages joined with a space, or the error texts when the provider
    /// sent no messages.
    pub fn failure_detail(&self) -> String {
        if self.messages.is_empty() {
            self.errors.join(" ")
        } else {
            self.messages.join(" ")
        }
    }
}

/// Trait for DNS provider implementations
///
/// Providers are isolated and stateless: each method performs one logical
/// operation and returns what the provider said. Listing may span several
/// paged requests, bounded by the provider. They never retry, cache, or
/// decide which records to touch. Those decisions belong
/// to the record locator and updater.
///
/// # Errors
///
/// Transport failures, timeouts, non-2xx statuses and undecodable bodies are
/// returned as [`crate::Error::Network`]. A 2xx patch whose body carries
/// errors is NOT an `Err`; it comes back as a [`PatchResponse`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List all DNS records of a zone, in provider order
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Patch the content and comment of one record
    async fn patch_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<PatchResponse, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

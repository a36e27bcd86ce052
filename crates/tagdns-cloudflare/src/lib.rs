// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `DnsProvider` for tagdns.
//
// ## Behavior
//
// - ✅ Lists every record of a zone, following pagination (bounded page count)
// - ✅ Patches `content` and `comment` of one record per call
// - ✅ HTTP timeout configured (30 seconds unless overridden)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (the reconciler's next tick is the retry)
// - ❌ NO decision about which records to touch (owned by the record locator)
// - ❌ NO caching
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider fails fast if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tagdns_core::config::ProviderConfig;
use tagdns_core::traits::{DnsProvider, DnsRecord, PatchResponse, RecordPatch};
use tagdns_core::{Error, Result};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per listing page
const PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched by one listing
const MAX_LIST_PAGES: u32 = 500;

/// Envelope of a record listing
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    result: Vec<DnsRecord>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

/// Paging metadata; only the page count is trusted
#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: u32,
}

/// Envelope of a patch response
///
/// Entries are either bare strings or `{ "code": .., "message": .. }` objects.
#[derive(Debug, Default, Deserialize)]
struct PatchEnvelope {
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    messages: Vec<Value>,
}

impl From<PatchEnvelope> for PatchResponse {
    fn from(envelope: PatchEnvelope) -> Self {
        PatchResponse {
            errors: envelope.errors.iter().map(entry_text).collect(),
            messages: envelope.messages.iter().map(entry_text).collect(),
        }
    }
}

fn entry_text(entry: &Value) -> String {
    match entry {
        Value::String(text) => text.clone(),
        Value::Object(fields) => {
            let message = fields.get("message").and_then(Value::as_str);
            let code = fields.get("code").and_then(Value::as_i64);
            match (code, message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (None, Some(message)) => message.to_string(),
                _ => entry.to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// Map an unsuccessful HTTP status to a network error
fn status_error(status: StatusCode, body: &str, action: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::network(format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        )),
        429 => Error::network(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::network(format!(
            "Cloudflare server error (transient): {} - {}",
            status, body
        )),
        _ => Error::network(format!("{} failed: {} - {}", action, status, body)),
    }
}

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform listing requests
/// - Log the intended PATCH payload
/// - **NOT** actually modify DNS records
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, overridable for testing
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip PATCH updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `dry_run`: If true, list records but skip PATCH updates
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the token is empty or the HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        Self::with_timeout(api_token, dry_run, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a provider with a custom request timeout
    pub fn with_timeout(
        api_token: impl Into<String>,
        dry_run: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        config.validate()?;

        if config.dry_run {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Self::with_timeout(config.api_token.clone(), config.dry_run, timeout)
    }

    /// Point the provider at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the HTTP client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    /// Fetch one listing page
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=1&per_page=100
    /// Authorization: Bearer <token>
    /// ```
    async fn list_page(&self, zone_id: &str, page: u32) -> Result<ListEnvelope> {
        let response = self
            .client
            .get(self.records_url(zone_id))
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &error_text, "Record listing"));
        }

        response
            .json()
            .await
            .map_err(|e| Error::network(format!("Failed to parse listing response: {}", e)))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        tracing::debug!("Listing DNS records of zone {}", zone_id);

        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let envelope = self.list_page(zone_id, page).await?;
            records.extend(envelope.result);

            let total_pages = envelope.result_info.map_or(0, |info| info.total_pages);
            if total_pages > MAX_LIST_PAGES {
                return Err(Error::network(format!(
                    "Zone {} reports {} listing pages, more than the {} allowed",
                    zone_id, total_pages, MAX_LIST_PAGES
                )));
            }
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!("Zone {} has {} record(s)", zone_id, records.len());
        Ok(records)
    }

    /// Patch content and comment of one record
    ///
    /// A response body that carries errors is returned as a `PatchResponse`
    /// even when the status is not 2xx; only responses without a readable
    /// error envelope become network errors.
    ///
    /// # API Call
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// Content-Type: application/json
    ///
    /// { "content": "1.2.3.4", "comment": "[update] [Updated at ...]" }
    /// ```
    async fn patch_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<PatchResponse> {
        let url = format!("{}/{}", self.records_url(zone_id), record_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::json!(patch)
            );
            return Ok(PatchResponse::default());
        }

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read patch response: {}", e)))?;

        match serde_json::from_str::<PatchEnvelope>(&body) {
            Ok(envelope) if status.is_success() || !envelope.errors.is_empty() => {
                Ok(envelope.into())
            }
            Ok(_) => Err(status_error(status, &body, "Record update")),
            Err(_) if !status.is_success() => Err(status_error(status, &body, "Record update")),
            Err(e) => Err(Error::network(format!(
                "Failed to parse patch response: {}",
                e
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

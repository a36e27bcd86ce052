use std::sync::Arc;
use tracing::Level;

use super::RecordId;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, Logger};

/// Finds the records a process instance is allowed to manage
///
/// A record is managed when its comment contains the management tag as a
/// plain substring.
pub struct RecordLocator {
    provider: Arc<dyn DnsProvider>,
    logger: Arc<dyn Logger>,
}

impl RecordLocator {
    pub fn new(provider: Arc<dyn DnsProvider>, logger: Arc<dyn Logger>) -> Self {
        Self { provider, logger }
    }

    /// List the zone and keep the IDs of tagged records, in listing order
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] if the listing call fails
    /// - [`Error::RecordNotFound`] if no record carries `tag`
    pub async fn locate(&self, zone_id: &str, tag: &str) -> Result<Vec<RecordId>> {
        let records = self.provider.list_records(zone_id).await?;

        let mut matched = Vec::new();
        for record in records {
            if record.is_tagged(tag) {
                self.logger.log(
                    Level::INFO,
                    &format!("Record {} matches the comment {}", record.id, tag),
                );
                matched.push(record.id);
            }
        }

        if matched.is_empty() {
            return Err(Error::record_not_found(format!(
                "No record in zone {} has a comment containing {}. \
                Add it to the comment of every record that should follow this host.",
                zone_id, tag
            )));
        }

        Ok(matched)
    }
}

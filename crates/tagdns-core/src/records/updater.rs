use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::Level;

use super::RecordId;
use crate::error::{Error, Result};
use crate::traits::{Address, DnsProvider, Logger, RecordPatch};

/// Timestamp layout written into record comments
const STAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Build the comment written on every update
///
/// The previous comment is not preserved.
pub fn stamp_comment(tag: &str, at: DateTime<Local>) -> String {
    format!("{} [Updated at {}]", tag, at.format(STAMP_FORMAT))
}

/// Points located records at a new address
pub struct RecordUpdater {
    provider: Arc<dyn DnsProvider>,
    logger: Arc<dyn Logger>,
}

impl RecordUpdater {
    pub fn new(provider: Arc<dyn DnsProvider>, logger: Arc<dyn Logger>) -> Self {
        Self { provider, logger }
    }

    /// Patch each record in order, stopping at the first failure
    ///
    /// Records patched before a failure stay patched.
    ///
    /// # Returns
    ///
    /// The number of records updated, equal to `record_ids.len()`.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] if a patch call fails in transport
    /// - [`Error::RecordUpdateFailed`] if the provider reports errors for a record
    pub async fn update(
        &self,
        zone_id: &str,
        tag: &str,
        record_ids: &[RecordId],
        new_address: &Address,
    ) -> Result<usize> {
        let mut updated = 0;

        for record_id in record_ids {
            let patch = RecordPatch::new(new_address.as_str(), stamp_comment(tag, Local::now()));

            let response = self
                .provider
                .patch_record(zone_id, record_id, &patch)
                .await?;

            if !response.is_success() {
                self.logger.log(
                    Level::ERROR,
                    &format!("Could not update record {}", record_id),
                );
                return Err(Error::record_update_failed(response.failure_detail()));
            }

            self.logger.log(
                Level::INFO,
                &format!("Record {} now points to {}", record_id, new_address),
            );
            updated += 1;
        }

        Ok(updated)
    }
}

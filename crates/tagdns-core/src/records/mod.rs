//! Record selection and mutation
//!
//! - [`RecordLocator`]: finds the records carrying the management tag
//! - [`RecordUpdater`]: points those records at a new address
//!
//! Both let every error propagate to the caller unmodified.

pub mod locator;
pub mod updater;

pub use locator::RecordLocator;
pub use updater::{RecordUpdater, stamp_comment};

/// Provider-specific record identifier
pub type RecordId = String;

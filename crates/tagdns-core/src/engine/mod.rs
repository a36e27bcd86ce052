//! Reconciliation loop and scheduler
//!
//! The [`Reconciler`] is responsible for:
//! - Tracking the last address it acted on
//! - Detecting a change on each tick
//! - Locating the tagged records and pointing them at the new address
//! - Absorbing and logging every failure so the schedule keeps running
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   tick    ┌──────────────┐  resolve  ┌─────────────────┐
//! │  Scheduler  │──────────▶│  Reconciler  │──────────▶│ AddressResolver │
//! └─────────────┘           └──────────────┘           └─────────────────┘
//!                                  │ changed?
//!                   ┌──────────────┴──────────────┐
//!                   ▼                             ▼
//!           ┌───────────────┐            ┌───────────────┐
//!           │ RecordLocator │── ids ────▶│ RecordUpdater │
//!           └───────────────┘            └───────────────┘
//!                   │                             │
//!                   └──────────┬──────────────────┘
//!                              ▼
//!                       ┌─────────────┐
//!                       │ DnsProvider │
//!                       └─────────────┘
//! ```
//!
//! ## Tick Flow
//!
//! 1. Resolve the current address
//! 2. If it equals the tracked address, stop
//! 3. Advance the tracked address
//! 4. Locate tagged records
//! 5. Patch them
//!
//! The tracked address advances before the update is attempted and is never
//! rolled back. A failed update is therefore not retried until the address
//! changes again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::Level;

use crate::config::DdnsConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::records::{RecordLocator, RecordUpdater};
use crate::traits::{Address, AddressResolver, DnsProvider, Logger};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Resolved address equals the tracked one
    Unchanged,

    /// Address changed and every tagged record was patched
    Updated {
        /// Number of records patched
        count: usize,
    },

    /// The tick failed; the error was logged and absorbed
    Failed {
        /// Kind of the absorbed error
        kind: ErrorKind,
    },
}

/// Reconciliation loop
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::initialize()`], which resolves the address once
/// 2. Drive with [`Reconciler::run()`] or [`Reconciler::run_until()`]
/// 3. Returns once the shutdown signal is observed
///
/// ## Threading
///
/// Ticks run one at a time on the caller's task. The tracked address has a
/// single mutator; observers get read-only access through
/// [`Reconciler::watch_address()`].
pub struct Reconciler {
    /// Public address lookup
    resolver: Box<dyn AddressResolver>,

    /// Finds tagged records
    locator: RecordLocator,

    /// Patches located records
    updater: RecordUpdater,

    /// Injected log sink
    logger: Arc<dyn Logger>,

    /// Zone whose records are managed
    zone_id: String,

    /// Management tag
    tag: String,

    /// Last address acted on
    tracked: watch::Sender<Address>,
}

impl Reconciler {
    /// Validate the configuration and resolve the starting address
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the configuration is invalid
    /// - [`Error::Initialization`] if the first resolve fails
    pub async fn initialize(
        resolver: Box<dyn AddressResolver>,
        provider: Arc<dyn DnsProvider>,
        logger: Arc<dyn Logger>,
        config: &DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        let initial = resolver.resolve().await.map_err(Error::initialization)?;
        logger.log(Level::INFO, &format!("Initial address: {}", initial));

        let (tracked, _) = watch::channel(initial);

        Ok(Self {
            resolver,
            locator: RecordLocator::new(Arc::clone(&provider), Arc::clone(&logger)),
            updater: RecordUpdater::new(provider, Arc::clone(&logger)),
            logger,
            zone_id: config.provider.zone_id.clone(),
            tag: config.engine.management_tag.clone(),
            tracked,
        })
    }

    /// The last address this loop acted on
    pub fn tracked_address(&self) -> Address {
        self.tracked.borrow().clone()
    }

    /// Subscribe to changes of the tracked address
    pub fn watch_address(&self) -> watch::Receiver<Address> {
        self.tracked.subscribe()
    }

    /// Run one reconciliation pass
    ///
    /// Never fails: every error is logged with its kind and reported in the
    /// returned [`TickOutcome`].
    pub async fn tick(&mut self) -> TickOutcome {
        self.logger.log(Level::INFO, "Checking for address changes...");

        let current = match self.resolver.resolve().await {
            Ok(address) => address,
            Err(e) => return self.absorb(e),
        };

        let unchanged = current == *self.tracked.borrow();
        if unchanged {
            self.logger
                .log(Level::INFO, "No changes detected, continuing...");
            return TickOutcome::Unchanged;
        }

        let previous = self.tracked.send_replace(current.clone());
        self.logger.log(
            Level::INFO,
            &format!(
                "Address changed {} -> {}, trying to update records...",
                previous, current
            ),
        );

        match self.propagate(&current).await {
            Ok(count) => {
                self.logger.log(
                    Level::INFO,
                    &format!("Successfully updated ({}) records.", count),
                );
                TickOutcome::Updated { count }
            }
            Err(e) => self.absorb(e),
        }
    }

    async fn propagate(&self, address: &Address) -> Result<usize> {
        let record_ids = self.locator.locate(&self.zone_id, &self.tag).await?;
        self.updater
            .update(&self.zone_id, &self.tag, &record_ids, address)
            .await
    }

    fn absorb(&self, error: Error) -> TickOutcome {
        let kind = error.kind();
        self.logger
            .log(Level::ERROR, &format!("{}: {}", kind, error));
        TickOutcome::Failed { kind }
    }

    /// Run ticks every `interval` until Ctrl-C
    pub async fn run(&mut self, interval: Duration) -> Result<()> {
        let logger = Arc::clone(&self.logger);
        self.run_until(interval, async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                logger.log(
                    Level::ERROR,
                    &format!("Failed to listen for Ctrl-C: {}", e),
                );
            }
        })
        .await
    }

    /// Run ticks every `interval` until `shutdown` completes
    ///
    /// The first tick fires one full interval after start. Shutdown is
    /// observed whenever no tick is running; a tick in flight completes
    /// before the loop exits.
    pub async fn run_until<F>(&mut self, interval: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        if interval.is_zero() {
            return Err(Error::config("Tick interval must be > 0"));
        }

        let mut timer = tokio::time::interval_at(Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(timer);

        tokio::pin!(shutdown);

        self.logger.log(
            Level::INFO,
            &format!("Service started, checking every {:?}", interval),
        );

        loop {
            tokio::select! {
                Some(_) = ticks.next() => {
                    self.tick().await;
                }

                _ = &mut shutdown => {
                    self.logger.log(Level::INFO, "Shutting down application...");
                    break;
                }
            }
        }

        Ok(())
    }
}

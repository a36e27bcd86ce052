//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides minimal test doubles that record every call so the
//! tests can assert exactly what the core asked of the outside world.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tagdns_core::error::{Error, Result};
use tagdns_core::traits::{
    Address, AddressResolver, DnsProvider, DnsRecord, Logger, PatchResponse, RecordPatch,
};
use tagdns_core::{DdnsConfig, Reconciler};
use tokio::sync::watch;
use tracing::Level;

pub const ZONE: &str = "zone-123";
pub const TAG: &str = "[update]";

/// An AddressResolver that replays scripted answers
///
/// The first answer is consumed by the reconciler's eager resolve. Once the
/// script is exhausted the last answer repeats.
pub struct ScriptedResolver {
    script: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    last: Arc<Mutex<std::result::Result<String, String>>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new(initial: &str) -> Self {
        Self::starting_with(Ok(initial.to_string()))
    }

    /// A resolver whose first lookup fails
    pub fn unreachable(message: &str) -> Self {
        Self::starting_with(Err(message.to_string()))
    }

    fn starting_with(first: std::result::Result<String, String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from([first.clone()]))),
            last: Arc::new(Mutex::new(first)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue an address for a future resolve
    pub fn then(&self, address: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(address.to_string()));
        self
    }

    /// Queue a network failure for a future resolve
    pub fn then_fail(&self, message: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Get the number of times resolve() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a resolver that shares script and counters with an existing one
    pub fn sharing_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            last: Arc::clone(&other.last),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl AddressResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<Address> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let answer = match self.script.lock().unwrap().pop_front() {
            Some(answer) => {
                *self.last.lock().unwrap() = answer.clone();
                answer
            }
            None => self.last.lock().unwrap().clone(),
        };

        answer.map(Address::new).map_err(Error::network)
    }
}

/// One recorded patch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchCall {
    pub zone_id: String,
    pub record_id: String,
    pub patch: RecordPatch,
}

/// A mock DnsProvider that serves a fixed listing and records patches
pub struct MockDnsProvider {
    records: Vec<DnsRecord>,
    /// Fail the listing with a network error
    list_fails: bool,
    /// Patch responses by call index; missing entries succeed
    patch_responses: Vec<std::result::Result<PatchResponse, String>>,
    list_call_count: Arc<AtomicUsize>,
    patches: Arc<Mutex<Vec<PatchCall>>>,
    /// Tracked address observed at each listing, when watching
    observed: Arc<Mutex<Vec<Address>>>,
    watched: Mutex<Option<watch::Receiver<Address>>>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            list_fails: false,
            patch_responses: Vec::new(),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            patches: Arc::new(Mutex::new(Vec::new())),
            observed: Arc::new(Mutex::new(Vec::new())),
            watched: Mutex::new(None),
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    pub fn with_patch_responses(
        mut self,
        responses: Vec<std::result::Result<PatchResponse, String>>,
    ) -> Self {
        self.patch_responses = responses;
        self
    }

    /// Record the value of `rx` every time the zone is listed
    pub fn observing(&self, rx: watch::Receiver<Address>) {
        *self.watched.lock().unwrap() = Some(rx);
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the patch calls in the order they were made
    pub fn patches(&self) -> Vec<PatchCall> {
        self.patches.lock().unwrap().clone()
    }

    /// Tracked addresses seen at listing time
    pub fn observed(&self) -> Vec<Address> {
        self.observed.lock().unwrap().clone()
    }

    /// Total outbound calls made to the provider
    pub fn total_calls(&self) -> usize {
        self.list_call_count() + self.patches.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(rx) = self.watched.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(rx.borrow().clone());
        }

        if self.list_fails {
            return Err(Error::network("connection reset by peer"));
        }
        Ok(self.records.clone())
    }

    async fn patch_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<PatchResponse> {
        let index = {
            let mut patches = self.patches.lock().unwrap();
            patches.push(PatchCall {
                zone_id: zone_id.to_string(),
                record_id: record_id.to_string(),
                patch: patch.clone(),
            });
            patches.len() - 1
        };

        match self.patch_responses.get(index) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(Error::network(message.clone())),
            None => Ok(PatchResponse::default()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A Logger that keeps every line
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// Messages logged at ERROR
    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Build a listed record
pub fn record(id: &str, comment: Option<&str>) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        content: "1.2.3.4".to_string(),
        comment: comment.map(str::to_string),
    }
}

/// A patch response carrying application-level errors
pub fn rejected(messages: &[&str]) -> PatchResponse {
    PatchResponse {
        errors: vec!["1004: DNS Validation Error".to_string()],
        messages: messages.iter().map(|m| m.to_string()).collect(),
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config() -> DdnsConfig {
    let mut config = DdnsConfig::new("test-token", ZONE);
    config.engine.management_tag = TAG.to_string();
    config
}

/// Initialize a reconciler over shared doubles
pub async fn reconciler(
    resolver: &ScriptedResolver,
    provider: Arc<MockDnsProvider>,
    logger: Arc<RecordingLogger>,
) -> Reconciler {
    Reconciler::initialize(
        Box::new(ScriptedResolver::sharing_with(resolver)),
        provider,
        logger,
        &minimal_config(),
    )
    .await
    .expect("reconciler initializes")
}

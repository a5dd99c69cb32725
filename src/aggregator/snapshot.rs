// src/aggregator/snapshot.rs
use crate::probe::{CheckResult, ProbeId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

/// Results collected by one round, ordered by probe id.
///
/// Probes whose check did not finish inside the budget are absent.
#[derive(Debug, Clone)]
pub struct Snapshot {
    round: u64,
    expected: Vec<ProbeId>,
    results: BTreeMap<ProbeId, CheckResult>,
    started_at: Instant,
    closed_at: Instant,
    taken_at: DateTime<Utc>,
}

impl Snapshot {
    pub(crate) fn new(round: u64, expected: Vec<ProbeId>, started_at: Instant) -> Self {
        Self {
            round,
            expected,
            results: BTreeMap::new(),
            started_at,
            closed_at: started_at,
            taken_at: Utc::now(),
        }
    }

    /// Record a result; a second result for the same probe replaces the first.
    pub(crate) fn insert(&mut self, result: CheckResult) {
        self.results.insert(result.probe_id, result);
    }

    pub(crate) fn close(&mut self, closed_at: Instant) {
        self.closed_at = closed_at;
        self.taken_at = Utc::now();
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn get(&self, id: ProbeId) -> Option<&CheckResult> {
        self.results.get(&id)
    }

    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn expected(&self) -> usize {
        self.expected.len()
    }

    pub fn is_complete(&self) -> bool {
        self.expected.iter().all(|id| self.results.contains_key(id))
    }

    /// Probes that did not report before the round closed.
    pub fn missing(&self) -> Vec<ProbeId> {
        self.expected
            .iter()
            .copied()
            .filter(|id| !self.results.contains_key(id))
            .collect()
    }

    pub fn healthy_count(&self) -> usize {
        self.results.values().filter(|r| r.healthy).count()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn closed_at(&self) -> Instant {
        self.closed_at
    }

    pub fn elapsed(&self) -> Duration {
        self.closed_at.duration_since(self.started_at)
    }

    /// Wall-clock time the round closed.
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

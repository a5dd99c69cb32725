// src/probe/probe.rs
use super::{CheckError, CheckResult, Monitor, ProbeId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

/// One monitored endpoint and its last-known state.
///
/// The state is only written through [`Probe::apply`], which the aggregator
/// calls after receiving this probe's result from the round channel. Rounds
/// never overlap, so a probe has at most one check in flight and needs no
/// lock.
pub struct Probe {
    id: ProbeId,
    monitor: Arc<dyn Monitor>,

    health_status: HealthStatus,
    last_duration: Option<Duration>,
    last_error: Option<CheckError>,
    last_check: Option<DateTime<Utc>>,
    consecutive_failures: usize,
    consecutive_successes: usize,
}

impl Probe {
    pub fn new(id: ProbeId, monitor: Arc<dyn Monitor>) -> Self {
        Self {
            id,
            monitor,
            health_status: HealthStatus::Unknown,
            last_duration: None,
            last_error: None,
            last_check: None,
            consecutive_failures: 0,
            consecutive_successes: 0,
        }
    }

    pub fn id(&self) -> ProbeId {
        self.id
    }

    pub fn source(&self) -> &str {
        self.monitor.source()
    }

    pub fn kind(&self) -> &'static str {
        self.monitor.kind()
    }

    pub fn monitor(&self) -> Arc<dyn Monitor> {
        self.monitor.clone()
    }

    pub fn health_status(&self) -> HealthStatus {
        self.health_status
    }

    /// `None` until a check has completed.
    pub fn last_healthy(&self) -> Option<bool> {
        match self.health_status {
            HealthStatus::Healthy => Some(true),
            HealthStatus::Unhealthy => Some(false),
            HealthStatus::Unknown => None,
        }
    }

    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    pub fn last_error(&self) -> Option<&CheckError> {
        self.last_error.as_ref()
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.last_check
    }

    pub fn consecutive_failures(&self) -> usize {
        self.consecutive_failures
    }

    pub fn consecutive_successes(&self) -> usize {
        self.consecutive_successes
    }

    /// Record a completed check. Results for other probes and cancelled
    /// checks leave the state untouched.
    pub fn apply(&mut self, result: &CheckResult) {
        if result.probe_id != self.id || result.is_cancelled() {
            return;
        }

        if result.healthy {
            self.consecutive_failures = 0;
            self.consecutive_successes += 1;
            self.health_status = HealthStatus::Healthy;
        } else {
            self.consecutive_successes = 0;
            self.consecutive_failures += 1;
            self.health_status = HealthStatus::Unhealthy;
        }
        self.last_duration = Some(result.duration);
        self.last_error = result.error.clone();
        self.last_check = Some(Utc::now());
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("id", &self.id)
            .field("source", &self.source())
            .field("health_status", &self.health_status)
            .field("last_duration", &self.last_duration)
            .field("last_error", &self.last_error)
            .finish()
    }
}

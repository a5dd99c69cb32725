// src/probe/result.rs
use std::time::Duration;

pub type ProbeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status code {0}")]
    UnexpectedStatus(u16),

    #[error("Check cancelled")]
    Cancelled,
}

/// What a single check observed, before it is tied to a probe.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub healthy: bool,
    pub duration: Duration,
    pub status: Option<u16>,
    pub error: Option<CheckError>,
}

impl CheckOutcome {
    pub fn success(status: u16, duration: Duration) -> Self {
        Self {
            healthy: true,
            duration,
            status: Some(status),
            error: None,
        }
    }

    pub fn failure(error: CheckError, duration: Duration) -> Self {
        let status = match error {
            CheckError::UnexpectedStatus(code) => Some(code),
            _ => None,
        };
        Self {
            healthy: false,
            duration,
            status,
            error: Some(error),
        }
    }

    pub fn cancelled(duration: Duration) -> Self {
        Self::failure(CheckError::Cancelled, duration)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.error, Some(CheckError::Cancelled))
    }
}

/// One completed check, sent to the aggregator over the round channel.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub probe_id: ProbeId,
    pub healthy: bool,
    pub duration: Duration,
    pub status: Option<u16>,
    pub error: Option<CheckError>,
}

impl CheckResult {
    pub fn new(probe_id: ProbeId, outcome: CheckOutcome) -> Self {
        Self {
            probe_id,
            healthy: outcome.healthy,
            duration: outcome.duration,
            status: outcome.status,
            error: outcome.error,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.error, Some(CheckError::Cancelled))
    }
}

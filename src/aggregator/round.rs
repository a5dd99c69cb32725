// src/aggregator/round.rs
use super::Snapshot;
use crate::metrics::MetricsCollector;
use crate::probe::{CheckResult, Probe, ProbeId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Dispatches one check per probe and collects the results within a budget.
pub struct Aggregator {
    budget: Duration,
    metrics: Option<Arc<MetricsCollector>>,
    rounds: u64,
}

impl Aggregator {
    pub fn new(budget: Duration, metrics: Option<Arc<MetricsCollector>>) -> Self {
        Self {
            budget,
            metrics,
            rounds: 0,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run one round over `probes`.
    ///
    /// Every probe gets its own task and all tasks share a channel sized to
    /// the probe count, so no send ever waits. Collection stops when every
    /// probe has reported or the budget runs out, whichever comes first.
    /// Checks still running at that point are cancelled and their tasks
    /// aborted before this returns; their probes keep the previous state.
    pub async fn run_round(&mut self, probes: &mut [Probe]) -> Snapshot {
        self.rounds += 1;
        let round = self.rounds;
        let expected: Vec<ProbeId> = probes.iter().map(|p| p.id()).collect();
        let started_at = Instant::now();
        let mut snapshot = Snapshot::new(round, expected, started_at);

        if probes.is_empty() {
            snapshot.close(Instant::now());
            return snapshot;
        }

        let (tx, mut rx) = mpsc::channel(probes.len());
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for probe in probes.iter() {
            let id = probe.id();
            let monitor = probe.monitor();
            let token = cancel.child_token();
            let tx = tx.clone();

            tasks.spawn(async move {
                let outcome = monitor.check(token).await;
                // Fails only once the round has closed; the result is stale then.
                let _ = tx.send(CheckResult::new(id, outcome)).await;
            });
        }
        drop(tx);

        let deadline = sleep(self.budget);
        tokio::pin!(deadline);

        while !snapshot.is_complete() {
            tokio::select! {
                received = rx.recv() => match received {
                    Some(result) => self.record(probes, &mut snapshot, result),
                    None => break,
                },
                _ = &mut deadline => break,
            }
        }

        cancel.cancel();
        rx.close();
        tasks.shutdown().await;

        snapshot.close(Instant::now());
        self.report(probes, &snapshot);
        snapshot
    }

    fn record(&self, probes: &mut [Probe], snapshot: &mut Snapshot, result: CheckResult) {
        if result.is_cancelled() {
            return;
        }
        let Some(probe) = probes.iter_mut().find(|p| p.id() == result.probe_id) else {
            warn!("Dropping result for unknown probe {}", result.probe_id);
            return;
        };

        probe.apply(&result);
        debug!(
            "Probe {} ({}) healthy={} in {:?}",
            probe.id(),
            probe.source(),
            result.healthy,
            result.duration
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_check(probe.source(), result.healthy, result.duration);
        }

        snapshot.insert(result);
    }

    fn report(&self, probes: &[Probe], snapshot: &Snapshot) {
        let complete = snapshot.is_complete();

        if complete {
            info!(
                "Round {} complete in {:?}: {}/{} healthy",
                snapshot.round(),
                snapshot.elapsed(),
                snapshot.healthy_count(),
                snapshot.expected()
            );
        } else {
            warn!(
                "Round {} closed after {:?} with {}/{} results, missing probes {:?}",
                snapshot.round(),
                snapshot.elapsed(),
                snapshot.len(),
                snapshot.expected(),
                snapshot.missing()
            );
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_round(complete, snapshot.elapsed());
            let healthy = probes
                .iter()
                .filter(|p| p.last_healthy() == Some(true))
                .count();
            metrics.update_probe_counts(healthy, probes.len());
        }
    }
}

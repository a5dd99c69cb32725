// src/scheduler/mod.rs
use crate::aggregator::Aggregator;
use crate::config::ScheduleConfig;
use crate::display::Presenter;
use crate::probe::Probe;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RoundInFlight,
    Stopped,
}

/// Drives rounds on a fixed heartbeat and hands each snapshot to the
/// presenter.
///
/// One round runs at startup, then one on every `round_every`th tick.
/// Rounds are awaited inline, so round N+1 cannot start before round N
/// has closed; ticks missed during a slow round are delayed, not burst.
pub struct Scheduler {
    aggregator: Aggregator,
    probes: Vec<Probe>,
    presenter: Box<dyn Presenter>,
    tick: Duration,
    round_every: u64,
    state: SchedulerState,
    rounds: u64,
}

impl Scheduler {
    pub fn new(
        config: &ScheduleConfig,
        aggregator: Aggregator,
        probes: Vec<Probe>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        Self {
            aggregator,
            probes,
            presenter,
            tick: config.tick_interval(),
            round_every: u64::from(config.round_every_ticks.max(1)),
            state: SchedulerState::Idle,
            rounds: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Run until `shutdown` turns true or its sender is dropped.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting scheduler for {} probes: round every {} x {:?}, budget {:?}",
            self.probes.len(),
            self.round_every,
            self.tick,
            self.aggregator.budget()
        );

        if *shutdown.borrow() {
            self.state = SchedulerState::Stopped;
            return;
        }

        self.round().await;

        let mut heartbeat = interval(self.tick);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial round covered it.
        heartbeat.tick().await;
        let mut ticks: u64 = 0;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    ticks += 1;
                    if ticks % self.round_every == 0 {
                        self.round().await;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler shutting down after {} rounds", self.rounds);
                        break;
                    }
                }
            }
        }

        self.state = SchedulerState::Stopped;
    }

    async fn round(&mut self) {
        self.state = SchedulerState::RoundInFlight;
        let snapshot = self.aggregator.run_round(&mut self.probes).await;
        self.rounds += 1;
        self.state = SchedulerState::Idle;

        debug!("Presenting round {}", snapshot.round());
        self.presenter.present(&snapshot, &self.probes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Snapshot;
    use crate::probe::{CheckOutcome, Monitor};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio::time::{sleep, Instant};
    use tokio_util::sync::CancellationToken;

    struct DelayMonitor(Duration);

    #[async_trait]
    impl Monitor for DelayMonitor {
        async fn check(&self, cancel: CancellationToken) -> CheckOutcome {
            tokio::select! {
                _ = cancel.cancelled() => CheckOutcome::cancelled(Duration::ZERO),
                _ = sleep(self.0) => CheckOutcome::success(200, self.0),
            }
        }

        fn source(&self) -> &str {
            "delay://"
        }

        fn kind(&self) -> &'static str {
            "delay"
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Presented {
        round: u64,
        started_at: Instant,
        closed_at: Instant,
        entries: usize,
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Presented>>>);

    impl Presenter for Recorder {
        fn present(&mut self, snapshot: &Snapshot, _probes: &[Probe]) {
            self.0.lock().unwrap().push(Presented {
                round: snapshot.round(),
                started_at: snapshot.started_at(),
                closed_at: snapshot.closed_at(),
                entries: snapshot.len(),
            });
        }
    }

    fn scheduler(delays_ms: &[u64], round_every_ticks: u32, recorder: Recorder) -> Scheduler {
        let config = ScheduleConfig {
            tick_interval_ms: 1000,
            round_every_ticks,
            round_budget_ms: 2000,
        };
        let probes = delays_ms
            .iter()
            .enumerate()
            .map(|(id, ms)| {
                Probe::new(id, Arc::new(DelayMonitor(Duration::from_millis(*ms))) as Arc<dyn Monitor>)
            })
            .collect();
        Scheduler::new(
            &config,
            Aggregator::new(config.round_budget(), None),
            probes,
            Box::new(recorder),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_round_then_every_fifth_tick() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler(&[10, 30], 5, recorder.clone());
        let (tx, rx) = watch::channel(false);

        let start = Instant::now();
        let handle = tokio::spawn(async move {
            scheduler.run(rx).await;
            scheduler
        });

        sleep(Duration::from_millis(12_500)).await;
        tx.send(true).unwrap();
        let scheduler = handle.await.unwrap();

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.rounds(), 3);
        assert!(scheduler.probes().iter().all(|p| p.last_healthy() == Some(true)));

        let presented = recorder.0.lock().unwrap().clone();
        assert_eq!(
            presented.iter().map(|p| p.round).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(presented.iter().all(|p| p.entries == 2));
        assert!(presented[0].started_at - start < Duration::from_millis(10));

        let gap = presented[1].started_at - presented[0].started_at;
        assert!(gap >= Duration::from_secs(5) && gap < Duration::from_millis(5_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_rounds_never_overlap() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler(&[10, 60_000], 1, recorder.clone());
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            scheduler.run(rx).await;
            scheduler
        });

        sleep(Duration::from_secs(20)).await;
        drop(tx);
        handle.await.unwrap();

        let presented = recorder.0.lock().unwrap().clone();
        assert!(presented.len() >= 5);
        for pair in presented.windows(2) {
            assert!(pair[1].started_at >= pair[0].closed_at);
            assert_eq!(pair[1].round, pair[0].round + 1);
        }
        assert!(presented.iter().all(|p| p.entries == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_start_runs_nothing() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler(&[10], 5, recorder.clone());
        let (_tx, rx) = watch::channel(true);

        scheduler.run(rx).await;

        assert_eq!(scheduler.rounds(), 0);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(recorder.0.lock().unwrap().is_empty());
    }
}

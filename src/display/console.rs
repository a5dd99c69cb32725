// src/display/console.rs
use super::{History, Presenter};
use crate::aggregator::Snapshot;
use crate::probe::Probe;
use std::io::{self, Stdout, Write};
use tracing::warn;

/// Plain-text status list with a response-time sparkline per probe.
pub struct ConsolePresenter<W: Write + Send> {
    out: W,
    histories: Vec<History>,
    history: usize,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout(probe_count: usize, history: usize) -> Self {
        Self::new(io::stdout(), probe_count, history)
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W, probe_count: usize, history: usize) -> Self {
        Self {
            out,
            histories: vec![History::new(history); probe_count],
            history,
        }
    }

    pub fn history(&self, id: usize) -> Option<&History> {
        self.histories.get(id)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, snapshot: &Snapshot, probes: &[Probe]) -> io::Result<()> {
        let width = probes.iter().map(|p| p.source().len()).max().unwrap_or(0);

        writeln!(
            self.out,
            "round {} at {} ({}/{} healthy)",
            snapshot.round(),
            snapshot.taken_at().format("%H:%M:%S"),
            snapshot.healthy_count(),
            snapshot.expected()
        )?;

        for probe in probes {
            let status = match probe.last_healthy() {
                Some(true) => "UP",
                Some(false) => "DOWN",
                None => "--",
            };
            let latency = probe
                .last_duration()
                .map(|d| format!("{}ms", d.as_millis()))
                .unwrap_or_else(|| "-".to_string());
            let stale = if snapshot.get(probe.id()).is_none() {
                " (stale)"
            } else {
                ""
            };
            let sparkline = self
                .histories
                .get(probe.id())
                .map(History::sparkline)
                .unwrap_or_default();

            writeln!(
                self.out,
                "[{}] {:<width$}  {:<4}  {:>7}  {}{}",
                probe.id(),
                probe.source(),
                status,
                latency,
                sparkline,
                stale,
                width = width
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn present(&mut self, snapshot: &Snapshot, probes: &[Probe]) {
        for result in snapshot.results() {
            if result.probe_id >= self.histories.len() {
                self.histories
                    .resize(result.probe_id + 1, History::new(self.history));
            }
            self.histories[result.probe_id].push(result.duration);
        }

        if let Err(e) = self.render(snapshot, probes) {
            warn!("Failed to write status: {}", e);
        }
    }
}

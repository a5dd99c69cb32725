// src/display/mod.rs
mod console;
mod history;

pub use console::ConsolePresenter;
pub use history::History;

use crate::aggregator::Snapshot;
use crate::config::{DisplayConfig, DisplayMode};
use crate::probe::Probe;
use tracing::info;

/// Receives every round's snapshot. Rendering lives entirely behind this
/// trait; the scheduler runs the same with or without a display.
pub trait Presenter: Send {
    fn present(&mut self, snapshot: &Snapshot, probes: &[Probe]);
}

/// Headless presenter: one log line per probe.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &Snapshot, probes: &[Probe]) {
        for probe in probes {
            match snapshot.get(probe.id()) {
                Some(result) => match &result.error {
                    None => info!(
                        "[{}] {} healthy in {:?}",
                        probe.id(),
                        probe.source(),
                        result.duration
                    ),
                    Some(e) => info!(
                        "[{}] {} unhealthy after {:?}: {}",
                        probe.id(),
                        probe.source(),
                        result.duration,
                        e
                    ),
                },
                None => info!(
                    "[{}] {} no result in round {}, last known healthy={:?}",
                    probe.id(),
                    probe.source(),
                    snapshot.round(),
                    probe.last_healthy()
                ),
            }
        }
    }
}

pub fn create_presenter(config: &DisplayConfig, probe_count: usize) -> Box<dyn Presenter> {
    match config.mode {
        DisplayMode::Console => Box::new(ConsolePresenter::stdout(probe_count, config.history)),
        DisplayMode::Log => Box::new(LogPresenter),
    }
}

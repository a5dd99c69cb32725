// src/probe/mod.rs
mod http;
mod monitor;
#[allow(clippy::module_inception)]
mod probe;
mod result;

pub use http::HttpMonitor;
pub use monitor::Monitor;
pub use probe::{HealthStatus, Probe};
pub use result::{CheckError, CheckOutcome, CheckResult, ProbeId};

use crate::config::Config;
use std::sync::Arc;

/// Build one HTTP probe per configured monitor; list order assigns ids.
pub fn probes_from_config(config: &Config) -> Vec<Probe> {
    config
        .monitors
        .iter()
        .enumerate()
        .map(|(id, entry)| {
            let monitor = HttpMonitor::new(entry.url.clone(), &config.probe);
            Probe::new(id, Arc::new(monitor))
        })
        .collect()
}

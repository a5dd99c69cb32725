// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub monitors: Vec<MonitorConfig>,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(alias = "URL", alias = "Url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// A round is started on every Nth heartbeat tick.
    #[serde(default = "default_round_every_ticks")]
    pub round_every_ticks: u32,

    /// How long a round waits for results before closing with partial data.
    #[serde(default = "default_round_budget_ms")]
    pub round_budget_ms: u64,
}

impl ScheduleConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn round_budget(&self) -> Duration {
        Duration::from_millis(self.round_budget_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            round_every_ticks: default_round_every_ticks(),
            round_budget_ms: default_round_budget_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Monitored endpoints may present self-signed certificates.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl ProbeConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Console,
    Log,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_display_mode")]
    pub mode: DisplayMode,

    /// Response-time samples kept per probe.
    #[serde(default = "default_history")]
    pub history: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: default_display_mode(),
            history: default_history(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_metrics_port")]
    pub port: u16,

    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
            path: default_metrics_path(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No monitors configured")]
    NoMonitors,

    #[error("Tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("round_every_ticks must be at least 1")]
    ZeroRoundEvery,

    #[error("Round budget must be greater than zero")]
    ZeroRoundBudget,

    #[error("Display history must hold at least one sample")]
    ZeroHistory,

    #[error("Metrics path must start with '/': {0}")]
    InvalidMetricsPath(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitors.is_empty() {
            return Err(ConfigError::NoMonitors);
        }
        if self.schedule.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.schedule.round_every_ticks == 0 {
            return Err(ConfigError::ZeroRoundEvery);
        }
        if self.schedule.round_budget_ms == 0 {
            return Err(ConfigError::ZeroRoundBudget);
        }
        if self.display.history == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidMetricsPath(self.metrics.path.clone()));
        }
        Ok(())
    }

    /// False when a probe can still be connecting after its round has closed.
    pub fn budget_covers_connect_timeout(&self) -> bool {
        self.schedule.round_budget() >= self.probe.connect_timeout()
    }
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_round_every_ticks() -> u32 {
    5
}

fn default_round_budget_ms() -> u64 {
    2000
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_display_mode() -> DisplayMode {
    DisplayMode::Console
}

fn default_history() -> usize {
    60
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

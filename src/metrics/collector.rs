// src/metrics/collector.rs
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Check metrics
    pub checks_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,
    pub probe_health_status: IntGaugeVec,

    // Round metrics
    pub rounds_total: IntCounterVec,
    pub round_duration_seconds: Histogram,

    // Probe set
    pub probes_total: IntGauge,
    pub healthy_probes: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("monitor_checks_total", "Total completed checks"),
            &["probe", "outcome"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "monitor_check_duration_seconds",
                "Check duration in seconds",
            ),
            &["probe"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let probe_health_status = IntGaugeVec::new(
            Opts::new(
                "monitor_probe_health_status",
                "Probe health status (1=healthy, 0=unhealthy)",
            ),
            &["probe"],
        )?;
        registry.register(Box::new(probe_health_status.clone()))?;

        let rounds_total = IntCounterVec::new(
            Opts::new("monitor_rounds_total", "Total check rounds"),
            &["outcome"],
        )?;
        registry.register(Box::new(rounds_total.clone()))?;

        let round_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "monitor_round_duration_seconds",
            "Time from dispatch to collection close",
        ))?;
        registry.register(Box::new(round_duration_seconds.clone()))?;

        let probes_total = IntGauge::new("monitor_probes_total", "Number of probes")?;
        registry.register(Box::new(probes_total.clone()))?;

        let healthy_probes =
            IntGauge::new("monitor_healthy_probes", "Number of healthy probes")?;
        registry.register(Box::new(healthy_probes.clone()))?;

        Ok(Self {
            checks_total,
            check_duration_seconds,
            probe_health_status,
            rounds_total,
            round_duration_seconds,
            probes_total,
            healthy_probes,
        })
    }

    pub fn record_check(&self, probe: &str, healthy: bool, duration: Duration) {
        let outcome = if healthy { "healthy" } else { "unhealthy" };
        self.checks_total
            .with_label_values(&[probe, outcome])
            .inc();

        self.check_duration_seconds
            .with_label_values(&[probe])
            .observe(duration.as_secs_f64());

        self.probe_health_status
            .with_label_values(&[probe])
            .set(if healthy { 1 } else { 0 });
    }

    pub fn record_round(&self, complete: bool, duration: Duration) {
        let outcome = if complete { "complete" } else { "partial" };
        self.rounds_total.with_label_values(&[outcome]).inc();
        self.round_duration_seconds.observe(duration.as_secs_f64());
    }

    pub fn update_probe_counts(&self, healthy: usize, total: usize) {
        self.healthy_probes.set(healthy as i64);
        self.probes_total.set(total as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_exposes_recorded_values() {
        let registry = MetricsRegistry::new().unwrap();
        let metrics = registry.collector();

        metrics.record_check("0", true, Duration::from_millis(50));
        metrics.record_check("1", false, Duration::from_millis(10));
        metrics.record_round(false, Duration::from_secs(2));
        metrics.update_probe_counts(1, 2);

        let text = String::from_utf8(registry.gather().unwrap()).unwrap();
        assert!(text.contains(r#"monitor_checks_total{outcome="healthy",probe="0"} 1"#));
        assert!(text.contains(r#"monitor_probe_health_status{probe="1"} 0"#));
        assert!(text.contains(r#"monitor_rounds_total{outcome="partial"} 1"#));
        assert!(text.contains("monitor_healthy_probes 1"));
        assert!(text.contains("monitor_probes_total 2"));
    }
}

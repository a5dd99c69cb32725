// src/main.rs
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use rust_http_monitor::{
    aggregator::Aggregator,
    config,
    display::create_presenter,
    metrics::{start_metrics_server, MetricsRegistry},
    probe::probes_from_config,
    scheduler::Scheduler,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the status list on stdout stays readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rust_http_monitor=info".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    if !config.budget_covers_connect_timeout() {
        warn!(
            "Round budget {:?} is shorter than the probe connect timeout {:?}; \
             probes still connecting when a round closes are cancelled and reported missing",
            config.schedule.round_budget(),
            config.probe.connect_timeout()
        );
    }

    // Metrics are optional
    let metrics = if config.metrics.enabled {
        let registry = Arc::new(MetricsRegistry::new()?);
        let collector = registry.collector();
        let metrics_addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        start_metrics_server(metrics_addr, registry, config.metrics.path.clone()).await?;
        Some(collector)
    } else {
        None
    };

    let probes = probes_from_config(&config);
    for probe in &probes {
        info!("Monitoring [{}] {} ({})", probe.id(), probe.source(), probe.kind());
    }

    let presenter = create_presenter(&config.display, probes.len());
    let aggregator = Aggregator::new(config.schedule.round_budget(), metrics);
    let mut scheduler = Scheduler::new(&config.schedule, aggregator, probes, presenter);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    scheduler.run(shutdown_rx).await;

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

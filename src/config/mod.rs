// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(&contents, is_yaml(path))?;
    config.validate()?;
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_config(contents: &str, yaml: bool) -> Result<Config> {
    let config = if yaml {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_legacy_json_uses_defaults() {
        let config = parse_config(
            r#"{"monitors": [{"URL": "https://ok.example/"}, {"url": "https://down.example/"}]}"#,
            false,
        )
        .unwrap();

        assert_eq!(config.monitors.len(), 2);
        assert_eq!(config.monitors[0].url, "https://ok.example/");
        assert_eq!(config.monitors[1].url, "https://down.example/");
        assert_eq!(config.schedule.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.schedule.round_every_ticks, 5);
        assert_eq!(config.schedule.round_budget(), Duration::from_secs(2));
        assert_eq!(config.probe.connect_timeout(), Duration::from_secs(5));
        assert!(config.probe.accept_invalid_certs);
        assert_eq!(config.display.mode, DisplayMode::Console);
        assert!(!config.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
monitors:
  - url: http://localhost:8080/health
schedule:
  round_budget_ms: 6000
  round_every_ticks: 3
display:
  mode: log
metrics:
  enabled: true
  port: 9100
"#;
        let config = parse_config(yaml, true).unwrap();

        assert_eq!(config.schedule.round_budget_ms, 6000);
        assert_eq!(config.schedule.round_every_ticks, 3);
        assert_eq!(config.schedule.tick_interval_ms, 1000);
        assert_eq!(config.display.mode, DisplayMode::Log);
        assert_eq!(config.metrics.port, 9100);
        assert_eq!(config.metrics.path, "/metrics");
        assert!(config.budget_covers_connect_timeout());
    }

    #[test]
    fn test_default_budget_is_shorter_than_connect_timeout() {
        let config = parse_config(r#"{"monitors": [{"url": "http://a/"}]}"#, false).unwrap();
        assert!(!config.budget_covers_connect_timeout());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = parse_config(r#"{"monitors": []}"#, false).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::NoMonitors));

        config.monitors.push(MonitorConfig {
            url: "http://a/".to_string(),
        });
        config.schedule.round_every_ticks = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRoundEvery));

        config.schedule.round_every_ticks = 5;
        config.schedule.round_budget_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRoundBudget));

        config.schedule.round_budget_ms = 2000;
        config.metrics.path = "metrics".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMetricsPath(_))
        ));
    }

    #[test]
    fn test_malformed_url_is_not_a_config_error() {
        let config = parse_config(r#"{"monitors": [{"url": "not a url"}]}"#, false).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(parse_config(r#"{"monitors": "#, false).is_err());
        assert!(parse_config(r#"{"targets": []}"#, false).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let path = std::env::temp_dir().join("rust-http-monitor-missing-config.json");
        let _ = tokio::fs::remove_file(&path).await;
        assert!(load_config(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "rust-http-monitor-config-{}.yml",
            std::process::id()
        ));
        tokio::fs::write(&path, "monitors:\n  - url: https://ok.example/\n")
            .await
            .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.monitors.len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}

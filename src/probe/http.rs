// src/probe/http.rs
use super::{CheckError, CheckOutcome, Monitor};
use crate::config::ProbeConfig;
use async_trait::async_trait;
use reqwest::header::CONNECTION;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Probes an endpoint with a single GET.
///
/// Every check builds its own client with idle pooling disabled, so the
/// connection is torn down when the check returns and nothing carries over
/// between rounds. Certificate verification is off when
/// `accept_invalid_certs` is set: this only decides whether an endpoint
/// answers, it never trusts the response content.
#[derive(Debug, Clone)]
pub struct HttpMonitor {
    url: String,
    connect_timeout: Duration,
    accept_invalid_certs: bool,
}

impl HttpMonitor {
    pub fn new(url: impl Into<String>, config: &ProbeConfig) -> Self {
        Self {
            url: url.into(),
            connect_timeout: config.connect_timeout(),
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }

    fn build_client(&self) -> Result<Client, CheckError> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| CheckError::InvalidRequest(describe(&e)))
    }

    async fn run(&self, cancel: CancellationToken) -> CheckOutcome {
        let url = match Url::parse(&self.url) {
            Ok(url) => url,
            Err(e) => {
                return CheckOutcome::failure(
                    CheckError::InvalidRequest(e.to_string()),
                    Duration::ZERO,
                )
            }
        };
        let client = match self.build_client() {
            Ok(client) => client,
            Err(e) => return CheckOutcome::failure(e, Duration::ZERO),
        };

        let request = client.get(url).header(CONNECTION, "close");
        let start = Instant::now();

        // Dropping the send future on cancel closes the connection.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return CheckOutcome::cancelled(start.elapsed()),
            response = request.send() => response,
        };
        let duration = start.elapsed();

        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                if (200..400).contains(&status) {
                    debug!("{} answered {} in {:?}", self.url, status, duration);
                    CheckOutcome::success(status, duration)
                } else {
                    CheckOutcome::failure(CheckError::UnexpectedStatus(status), duration)
                }
            }
            Err(e) if e.is_builder() => {
                CheckOutcome::failure(CheckError::InvalidRequest(describe(&e)), duration)
            }
            Err(e) => CheckOutcome::failure(CheckError::Transport(describe(&e)), duration),
        }
    }
}

#[async_trait]
impl Monitor for HttpMonitor {
    async fn check(&self, cancel: CancellationToken) -> CheckOutcome {
        let outcome = self.run(cancel).await;
        match &outcome.error {
            None | Some(CheckError::Cancelled) => {}
            Some(e) => warn!("Check of {} failed: {}", self.url, e),
        }
        outcome
    }

    fn source(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}

// reqwest's top-level message rarely names the cause (refused, DNS, TLS).
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

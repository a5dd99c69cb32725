// src/probe/monitor.rs
use super::CheckOutcome;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A check strategy for one endpoint.
///
/// Implementations never fail: every failure mode is encoded in the
/// returned [`CheckOutcome`]. When `cancel` fires the check should give up
/// and return [`CheckOutcome::cancelled`]; the outcome is discarded anyway.
#[async_trait]
pub trait Monitor: Send + Sync {
    async fn check(&self, cancel: CancellationToken) -> CheckOutcome;

    fn source(&self) -> &str;

    fn kind(&self) -> &'static str;
}

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::stats::TargetStats;
use crate::target::Target;
use crate::transport::Transport;
use crate::urlgen;

/// The per-target request loop: pace, generate, request, classify, record.
///
/// A prober never exits on its own; failures become stats and the loop keeps
/// going. The only way out is the cancellation token, which is checked ahead
/// of both the in-flight request and the pacing nap so shutdown never waits
/// on either.
pub struct Prober {
    target: Target,
    stats: Arc<TargetStats>,
    transport: Arc<dyn Transport>,
}

impl Prober {
    pub fn new(target: Target, stats: Arc<TargetStats>, transport: Arc<dyn Transport>) -> Self {
        Self {
            target,
            stats,
            transport,
        }
    }

    /// Drives the loop until `token` fires.
    ///
    /// A cancellation landing mid-request abandons that attempt without
    /// recording it; only completed attempts reach the stats. The orchestrator
    /// rejects targets without a usable pacing period up front; a prober
    /// handed one anyway idles until cancellation instead of probing.
    pub async fn run(self, token: CancellationToken) {
        let Some(period) = self.target.pacing_period() else {
            warn!(
                name = %self.target.identifier,
                hz = self.target.max_frequency_hz,
                "no usable pacing period, idling until cancelled"
            );
            token.cancelled().await;
            return;
        };
        debug!(
            name = %self.target.identifier,
            period_ms = period.as_millis() as u64,
            "prober started"
        );

        loop {
            let cycle_start = Instant::now();
            let url = urlgen::generate(&self.target.url_template);

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                outcome = self.transport.fetch(&url) => outcome,
            };

            let latency = cycle_start.elapsed();
            debug!(
                name = %self.target.identifier,
                url = %url,
                latency_ms = latency.as_millis() as u64,
                message = %outcome.message(),
                "attempt completed"
            );
            self.stats.record(&url, &outcome, latency);

            // back-to-back when behind schedule, no catch-up burst
            if let Some(nap) = period.checked_sub(cycle_start.elapsed()) {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(nap) => {}
                }
            }
        }

        debug!(name = %self.target.identifier, "prober stopped");
    }
}

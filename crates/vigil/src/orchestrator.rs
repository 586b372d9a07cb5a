use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ProbeConfig;
use crate::error::EngineError;
use crate::prober::Prober;
use crate::stats::{StatsSnapshot, TargetStats};
use crate::target::Target;
use crate::transport::{self, HttpTransport, Transport};

/// Read-only view of one target for reporting, in catalog order.
#[derive(Debug, Clone)]
pub struct TargetSnapshot {
    pub identifier: String,
    pub stats: StatsSnapshot,
}

struct ProbeEntry {
    target: Target,
    stats: Arc<TargetStats>,
}

/// Owns the shared transport and one prober per catalog entry.
///
/// Construction wires everything up; [`run`](Self::run) drives the probers
/// until the token fires, then drains them. Probers never exit on their own,
/// so the only supervisory duty is cancellation propagation, never restart.
/// At most one prober set exists at a time: while a run is in flight, further
/// [`run`](Self::run) calls return without spawning anything.
pub struct Orchestrator {
    entries: Vec<ProbeEntry>,
    transport: Arc<dyn Transport>,
    probers: Mutex<Option<JoinSet<()>>>,
}

impl Orchestrator {
    /// Builds the shared HTTP client and one stats slot per target.
    pub fn new(catalog: Vec<Target>, config: &ProbeConfig) -> Result<Self, EngineError> {
        let client = transport::build_client(config)?;
        let transport = Arc::new(HttpTransport::new(client, config.request_timeout));
        Self::with_transport(catalog, transport)
    }

    /// Same wiring over a caller-supplied transport.
    pub fn with_transport(
        catalog: Vec<Target>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, EngineError> {
        for target in &catalog {
            if target.pacing_period().is_none() {
                return Err(EngineError::invalid_target(
                    &target.identifier,
                    format!(
                        "max frequency {} does not yield a usable pacing period",
                        target.max_frequency_hz
                    ),
                ));
            }
        }

        let entries = catalog
            .into_iter()
            .map(|target| ProbeEntry {
                stats: Arc::new(TargetStats::new()),
                target,
            })
            .collect();

        Ok(Self {
            entries,
            transport,
            probers: Mutex::new(None),
        })
    }

    /// Number of catalog entries under probing.
    pub fn target_count(&self) -> usize {
        self.entries.len()
    }

    /// Runs every prober until `token` fires, then drains them all.
    ///
    /// Cancellation is the expected way out, not an error: in-flight requests
    /// are abandoned and recorded stats stay as they were. A second call while
    /// probers are in flight returns immediately so each target keeps exactly
    /// one loop writing its stats.
    pub async fn run(&self, token: CancellationToken) {
        {
            let mut slot = self.probers.lock();
            if slot.is_some() {
                warn!("probers already running, second start ignored");
                return;
            }
            let mut joins = JoinSet::new();
            for entry in &self.entries {
                let prober = Prober::new(
                    entry.target.clone(),
                    entry.stats.clone(),
                    self.transport.clone(),
                );
                joins.spawn(prober.run(token.clone()));
            }
            *slot = Some(joins);
        }
        info!(targets = self.entries.len(), "probing started");

        token.cancelled().await;
        info!("shutdown requested, draining probers");
        let joins = self.probers.lock().take();
        if let Some(mut joins) = joins {
            while let Some(result) = joins.join_next().await {
                // probers only stop via cancellation, so a failure here is a bug
                if let Err(error) = result {
                    warn!("prober task failed: {error}");
                }
            }
        }
        info!("all probers stopped");
    }

    /// Coherent per-target views in catalog order. Cheap enough to call on
    /// every display refresh.
    pub fn snapshot(&self) -> Vec<TargetSnapshot> {
        self.entries
            .iter()
            .map(|entry| TargetSnapshot {
                identifier: entry.target.identifier.clone(),
                stats: entry.stats.snapshot(),
            })
            .collect()
    }
}

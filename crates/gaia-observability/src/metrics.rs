//! Prometheus gauges for GAIA engine snapshots.
//!
//! Registers the exported gauge set on a caller-supplied registry and
//! maps each [`MetricsSnapshot`] onto it. The gauge names are part of the
//! scraping contract and must not change.

use gaia_core::MetricsSnapshot;
use prometheus::{Gauge, IntGauge, Registry};
use tracing::debug;

use crate::error::ObservabilityResult;

/// The exported gauge set.
pub struct GaiaMetrics {
    /// Accepted ingestion cycles.
    pub cycles_total: IntGauge,

    /// Consciousness-equivalent score.
    pub consciousness: Gauge,

    /// Mean threat score over the rolling window.
    pub threat_mean: Gauge,

    /// Latency of the most recent cycle, milliseconds.
    pub latency_ms_last: Gauge,

    /// 95th percentile of cycle latency, milliseconds.
    pub latency_p95_ms: Gauge,

    /// Emergence indicator.
    pub emergence: Gauge,

    /// Estimated rolling-state memory, MiB.
    pub memory_mb: Gauge,
}

impl GaiaMetrics {
    /// Create and register the gauge set.
    pub fn new(registry: &Registry) -> ObservabilityResult<Self> {
        let cycles_total =
            IntGauge::new("gaia_cycles_total", "Accepted ingestion cycles")?;
        registry.register(Box::new(cycles_total.clone()))?;

        let consciousness = Gauge::new(
            "gaia_consciousness",
            "Consciousness-equivalent score of the system",
        )?;
        registry.register(Box::new(consciousness.clone()))?;

        let threat_mean = Gauge::new("gaia_threat_mean", "Mean of the threat score")?;
        registry.register(Box::new(threat_mean.clone()))?;

        let latency_ms_last = Gauge::new(
            "gaia_latency_ms_last",
            "Latency of the most recent ingestion cycle in milliseconds",
        )?;
        registry.register(Box::new(latency_ms_last.clone()))?;

        let latency_p95_ms = Gauge::new(
            "gaia_latency_p95_ms",
            "95th percentile of event latency in milliseconds",
        )?;
        registry.register(Box::new(latency_p95_ms.clone()))?;

        let emergence = Gauge::new("gaia_emergence", "Emergence score of the system")?;
        registry.register(Box::new(emergence.clone()))?;

        let memory_mb = Gauge::new("gaia_memory_mb", "Memory usage in MB")?;
        registry.register(Box::new(memory_mb.clone()))?;

        Ok(Self {
            cycles_total,
            consciousness,
            threat_mean,
            latency_ms_last,
            latency_p95_ms,
            emergence,
            memory_mb,
        })
    }

    /// Map a snapshot onto the gauges.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        debug!(
            cycles = snapshot.cycles_total,
            threat_mean = snapshot.threat_mean,
            breaker = %snapshot.breaker_state,
            "updating exported gauges"
        );

        self.cycles_total.set(snapshot.cycles_total as i64);
        self.consciousness.set(snapshot.consciousness);
        self.threat_mean.set(snapshot.threat_mean);
        self.latency_ms_last.set(snapshot.latency_last_ms);
        self.latency_p95_ms.set(snapshot.latency_p95_ms);
        self.emergence.set(snapshot.emergence);
        self.memory_mb.set(snapshot.memory_mb);
    }
}

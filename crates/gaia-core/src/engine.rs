//! The GAIA engine.
//!
//! Owns all mutable state behind one exclusive boundary and runs the
//! validate -> aggregate -> score -> emergence -> breaker pipeline for
//! each accepted event. Ingestion is the single mutating operation;
//! snapshot and health reads copy state out by value. Multiple engines
//! are independently constructible; there is no process-wide state.

use std::sync::Mutex;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GaiaConfig;
use crate::emergence::EmergenceEstimator;
use crate::error::GaiaResult;
use crate::event::{Event, EventValidator, RawEvent};
use crate::resilience::{CircuitBreaker, CircuitState};
use crate::scoring::ThreatScorer;
use crate::snapshot::{HealthReport, HealthStatus, MetricsSnapshot};
use crate::window::{Channel, ChannelWindows};

/// Returned to the caller after an accepted ingestion cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// The new cycle id.
    pub cycle: u64,

    /// Smoothed threat score computed this cycle.
    pub threat: f64,

    /// Breaker state after this cycle.
    pub breaker_state: CircuitState,
}

/// All mutable engine state, guarded as one cohesive unit.
struct EngineState {
    windows: ChannelWindows,
    scorer: ThreatScorer,
    estimator: EmergenceEstimator,
    breaker: CircuitBreaker,
    cycles_total: u64,
    last_accepted_at: Option<DateTime<Utc>>,
    last_raw_score: f64,
}

/// Evidence-aggregation and self-healing engine.
///
/// Concurrent callers may submit events; they are processed strictly one
/// at a time in lock-acquisition order, each cycle doing bounded
/// O(window) work with no I/O under the lock.
pub struct GaiaEngine {
    config: GaiaConfig,
    validator: EventValidator,
    inner: Mutex<EngineState>,
}

impl GaiaEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: GaiaConfig) -> Self {
        let state = EngineState {
            windows: ChannelWindows::new(config.window.capacity),
            scorer: ThreatScorer::default(),
            estimator: EmergenceEstimator::default(),
            breaker: CircuitBreaker::new(config.breaker.clone()),
            cycles_total: 0,
            last_accepted_at: None,
            last_raw_score: 0.0,
        };

        Self {
            config,
            validator: EventValidator,
            inner: Mutex::new(state),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &GaiaConfig {
        &self.config
    }

    /// Ingest one utilization sample.
    ///
    /// Runs the full pipeline under the exclusive boundary. A rejected
    /// event returns a validation error and leaves every window, score,
    /// and breaker state untouched; `cycles_total` does not advance.
    pub fn ingest(&self, raw: RawEvent) -> GaiaResult<IngestReceipt> {
        let mut guard = self.inner.lock().unwrap();
        let state = &mut *guard;
        let started = Instant::now();

        let event = self.validator.validate(&raw, state.last_accepted_at)?;
        state.last_accepted_at = Some(event.timestamp);

        self.fold_event(state, &event);

        let update = state.scorer.update(
            &event,
            &state.windows,
            &self.config.scoring,
            &self.config.window,
        );
        state.last_raw_score = update.raw;
        state.estimator.update(&update, &self.config.emergence);

        state.cycles_total += 1;
        let cycle = state.cycles_total;

        state.windows.record_threat(update.smoothed);
        let latency_ms = started.elapsed().as_secs_f64() * 1_000.0;
        state.windows.record(Channel::Latency, latency_ms);

        let decision = state.breaker.evaluate(cycle, update.smoothed);
        if decision.reset_evidence {
            debug!(cycle, "autonomous reset: clearing evidence windows");
            state.windows.clear_all();
            state.scorer.reset();
            state.estimator.reset();
            state.last_raw_score = 0.0;
        }

        state.windows.check_invariants()?;

        Ok(IngestReceipt {
            cycle,
            threat: update.smoothed,
            breaker_state: decision.state,
        })
    }

    /// Point-in-time copy of the exported metrics.
    ///
    /// Non-mutating and always succeeds; the lock is released before the
    /// snapshot is returned.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().unwrap();

        let latency = state.windows.channel(Channel::Latency);
        MetricsSnapshot {
            cycles_total: state.cycles_total,
            threat_mean: state.windows.threat().mean(),
            threat_last: state.scorer.state().value,
            emergence: state.estimator.state().value,
            consciousness: state.last_raw_score.clamp(0.0, 1.0),
            latency_p95_ms: latency.percentile(95.0),
            latency_last_ms: latency.last(),
            memory_mb: Self::state_memory_mb(&state),
            breaker_state: state.breaker.state(),
            taken_at: Utc::now(),
        }
    }

    /// Liveness answer: `ok` while the breaker is closed.
    pub fn health(&self) -> HealthReport {
        let state = self.inner.lock().unwrap();
        HealthReport {
            status: HealthStatus::from_breaker(state.breaker.state()),
            cycles_total: state.cycles_total,
        }
    }

    fn fold_event(&self, state: &mut EngineState, event: &Event) {
        let readings = event.readings();
        for (channel, value) in Channel::RESOURCES.iter().zip(readings) {
            state.windows.record(*channel, value);
        }
    }

    /// Estimated resident size of the rolling state, in MiB. The engine
    /// is single-node and in-memory, so this counts buffered samples
    /// rather than inspecting the process.
    fn state_memory_mb(state: &EngineState) -> f64 {
        let bytes = state.windows.total_samples() * std::mem::size_of::<f64>();
        bytes as f64 / (1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaiaConfig;

    #[test]
    fn test_ingest_advances_cycles() {
        let engine = GaiaEngine::new(GaiaConfig::for_testing());

        let receipt = engine.ingest(RawEvent::now(0.1, 0.1, 0.1)).unwrap();
        assert_eq!(receipt.cycle, 1);

        let receipt = engine.ingest(RawEvent::now(0.2, 0.1, 0.1)).unwrap();
        assert_eq!(receipt.cycle, 2);
    }

    #[test]
    fn test_rejected_event_is_a_pure_no_op() {
        let engine = GaiaEngine::new(GaiaConfig::for_testing());
        engine.ingest(RawEvent::now(0.1, 0.1, 0.1)).unwrap();

        let before = engine.snapshot();
        let err = engine.ingest(RawEvent::now(2.0, 0.1, 0.1)).unwrap_err();
        assert!(err.is_validation());

        let after = engine.snapshot();
        assert_eq!(before.cycles_total, after.cycles_total);
        assert_eq!(before.threat_last, after.threat_last);
        assert_eq!(before.memory_mb, after.memory_mb);
    }

    #[test]
    fn test_snapshot_reports_latency() {
        let engine = GaiaEngine::new(GaiaConfig::for_testing());
        engine.ingest(RawEvent::now(0.1, 0.1, 0.1)).unwrap();

        let snapshot = engine.snapshot();
        assert!(snapshot.latency_last_ms >= 0.0);
        // With a single sample the p95 and the last value coincide.
        assert_eq!(snapshot.latency_p95_ms, snapshot.latency_last_ms);
        assert!(snapshot.memory_mb > 0.0);
    }

    #[test]
    fn test_health_is_ok_while_closed() {
        let engine = GaiaEngine::new(GaiaConfig::for_testing());
        let report = engine.health();
        assert_eq!(report.status, HealthStatus::Ok);
        assert_eq!(report.cycles_total, 0);
    }

    #[test]
    fn test_engines_are_independent() {
        let a = GaiaEngine::new(GaiaConfig::for_testing());
        let b = GaiaEngine::new(GaiaConfig::for_testing());
        a.ingest(RawEvent::now(0.1, 0.1, 0.1)).unwrap();
        assert_eq!(a.snapshot().cycles_total, 1);
        assert_eq!(b.snapshot().cycles_total, 0);
    }
}

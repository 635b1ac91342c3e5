//! Read-only views of engine state.
//!
//! A [`MetricsSnapshot`] is a point-in-time copy assembled under the
//! engine's exclusive boundary and handed out by value, so an exporter
//! never observes a half-updated cycle and never holds a reference into
//! live state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resilience::CircuitState;

/// Immutable metrics view consumed by the exposition layer.
///
/// Field names map one-to-one onto the exported gauges
/// (`gaia_cycles_total`, `gaia_threat_mean`, and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Accepted cycles since construction. Monotonically non-decreasing;
    /// untouched by the breaker's autonomous reset.
    pub cycles_total: u64,

    /// Mean of the smoothed threat scores in the rolling window.
    pub threat_mean: f64,

    /// Smoothed threat score of the most recent cycle.
    pub threat_last: f64,

    /// Emergence indicator in [0, 1].
    pub emergence: f64,

    /// Consciousness-equivalent gauge: the latest raw composite threat
    /// clamped to [0, 1].
    pub consciousness: f64,

    /// 95th percentile of cycle latency, milliseconds.
    pub latency_p95_ms: f64,

    /// Latency of the most recent cycle, milliseconds.
    pub latency_last_ms: f64,

    /// Estimated resident size of the engine's rolling state, MiB.
    pub memory_mb: f64,

    /// Breaker state at snapshot time.
    pub breaker_state: CircuitState,

    /// When this snapshot was taken.
    pub taken_at: DateTime<Utc>,
}

/// Health probe answer for the external health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// `ok` while the breaker is closed, `degraded` otherwise.
    pub status: HealthStatus,

    /// Accepted cycles since construction.
    pub cycles_total: u64,
}

/// Two-valued health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Breaker closed, normal evidence accumulation.
    Ok,
    /// Breaker open or half-open; the engine is protecting itself.
    Degraded,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Ok => write!(f, "ok"),
            HealthStatus::Degraded => write!(f, "degraded"),
        }
    }
}

impl HealthStatus {
    /// Derive status from the breaker state.
    pub fn from_breaker(state: CircuitState) -> Self {
        if state == CircuitState::Closed {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        }
    }
}

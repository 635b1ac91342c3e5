//! Emergence estimation.
//!
//! A secondary, slower-moving indicator derived from the threat score's
//! trend and the distribution of channel deviations. High entropy across
//! channels means no single channel dominates, suggesting a systemic
//! rather than local anomaly. Advisory only: this value never feeds back
//! into the circuit breaker.

use serde::{Deserialize, Serialize};

use crate::config::EmergenceConfig;
use crate::scoring::ThreatUpdate;

/// Current emergence indicator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmergenceState {
    /// Emergence score in [0, 1].
    pub value: f64,

    /// Signed threat delta over the last two cycles.
    pub trend: f64,
}

/// Derives the emergence indicator from threat history.
#[derive(Debug, Default)]
pub struct EmergenceEstimator {
    state: EmergenceState,
    previous_threat: f64,
}

impl EmergenceEstimator {
    /// Current emergence state.
    pub fn state(&self) -> EmergenceState {
        self.state
    }

    /// Recompute emergence from this cycle's threat update.
    ///
    /// Two weighted terms, summed and clamped to [0, 1]:
    /// the absolute rate of change of the smoothed threat over the last
    /// two cycles (already bounded since threat is), and the Shannon
    /// entropy of the channel deviations normalized by ln 3.
    pub fn update(&mut self, update: &ThreatUpdate, config: &EmergenceConfig) -> EmergenceState {
        let trend = update.smoothed - self.previous_threat;
        self.previous_threat = update.smoothed;

        let rate_term = trend.abs().min(1.0);
        let entropy_term = Self::deviation_entropy(&update.deviations);

        let value = (config.trend_weight * rate_term + config.entropy_weight * entropy_term)
            .clamp(0.0, 1.0);

        self.state = EmergenceState { value, trend };
        self.state
    }

    /// Drop trend memory. Only the circuit breaker's autonomous reset
    /// calls this.
    pub fn reset(&mut self) {
        self.state = EmergenceState::default();
        self.previous_threat = 0.0;
    }

    /// Normalized Shannon entropy of the deviation distribution. 0 when
    /// all deviations are zero or a single channel carries everything,
    /// 1 when all three channels deviate equally.
    fn deviation_entropy(deviations: &[f64; 3]) -> f64 {
        let total: f64 = deviations.iter().sum();
        if total <= f64::EPSILON {
            return 0.0;
        }

        let mut entropy = 0.0;
        for d in deviations {
            let p = d / total;
            if p > 0.0 {
                entropy -= p * p.ln();
            }
        }
        entropy / 3.0f64.ln()
    }
}

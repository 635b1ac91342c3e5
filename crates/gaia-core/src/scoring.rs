//! Threat scoring.
//!
//! Converts per-channel deviations from the rolling baseline into one
//! composite score in [0, 1], blended over time with exponential
//! smoothing. The worst offending channel dominates: the raw composite is
//! the maximum of the three channel deviations, not their average, so a
//! single saturated channel cannot be diluted by two calm ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, WindowConfig};
use crate::event::Event;
use crate::window::{Channel, ChannelWindows};

/// Current smoothed threat level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThreatState {
    /// Smoothed threat score in [0, 1].
    pub value: f64,

    /// Time of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Default for ThreatState {
    fn default() -> Self {
        Self {
            value: 0.0,
            updated_at: Utc::now(),
        }
    }
}

/// Result of scoring one accepted event.
#[derive(Debug, Clone, Copy)]
pub struct ThreatUpdate {
    /// Unsmoothed composite score (max of the channel deviations).
    pub raw: f64,

    /// Smoothed threat score after blending with the previous value.
    pub smoothed: f64,

    /// Per-channel normalized deviations in (cpu, memory, network) order.
    /// Retained for the emergence estimator's entropy term.
    pub deviations: [f64; 3],
}

/// Stateful threat scorer with exponential smoothing.
#[derive(Debug, Default)]
pub struct ThreatScorer {
    state: ThreatState,
}

impl ThreatScorer {
    /// Current smoothed threat state.
    pub fn state(&self) -> ThreatState {
        self.state
    }

    /// Score one accepted event against the current window statistics.
    ///
    /// Each channel's deviation is `min(1, |value - mean| / (sigma_tol * sd))`
    /// over that channel's window. A channel holding fewer than
    /// `min_samples` contributes 0, which keeps a cold start calm.
    pub fn update(
        &mut self,
        event: &Event,
        windows: &ChannelWindows,
        scoring: &ScoringConfig,
        window_cfg: &WindowConfig,
    ) -> ThreatUpdate {
        let readings = event.readings();
        let mut deviations = [0.0f64; 3];

        for (i, channel) in Channel::RESOURCES.iter().enumerate() {
            let window = windows.channel(*channel);
            if window.len() < window_cfg.min_samples {
                continue;
            }
            let mean = window.mean();
            // Summing n near-identical samples leaves rounding error up to
            // n ulps at the window's scale, so flatness must be judged
            // against that band, not against a bare epsilon. Otherwise a
            // constant baseline scores roundoff / roundoff = 1/3 forever.
            let noise_floor = f64::EPSILON * mean.abs().max(1.0) * window.len() as f64;
            if window.std_dev() <= noise_floor {
                // A flat window has no spread to deviate from; any reading
                // off the mean is maximally anomalous.
                deviations[i] = if (readings[i] - mean).abs() <= noise_floor {
                    0.0
                } else {
                    1.0
                };
                continue;
            }
            let tolerance = scoring.tolerance_sigma * window.std_dev();
            deviations[i] = ((readings[i] - mean).abs() / tolerance).min(1.0);
        }

        let raw = deviations.iter().cloned().fold(0.0f64, f64::max);
        let smoothed = (scoring.smoothing_alpha * raw
            + (1.0 - scoring.smoothing_alpha) * self.state.value)
            .clamp(0.0, 1.0);

        self.state = ThreatState {
            value: smoothed,
            updated_at: event.timestamp,
        };

        ThreatUpdate {
            raw,
            smoothed,
            deviations,
        }
    }

    /// Drop all accumulated threat evidence. Only the circuit breaker's
    /// autonomous reset calls this.
    pub fn reset(&mut self) {
        self.state = ThreatState::default();
    }
}

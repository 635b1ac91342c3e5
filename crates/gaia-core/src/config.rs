//! Engine configuration.
//!
//! All thresholds, window sizes, and backoff constants live here as named
//! fields with documented defaults. Nothing in the engine reads a literal
//! that is not surfaced through this structure.

use serde::{Deserialize, Serialize};

/// Top-level configuration for a [`GaiaEngine`](crate::engine::GaiaEngine).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GaiaConfig {
    /// Rolling-window configuration.
    pub window: WindowConfig,

    /// Threat scoring configuration.
    pub scoring: ScoringConfig,

    /// Circuit breaker configuration.
    pub breaker: BreakerConfig,

    /// Emergence estimator configuration.
    pub emergence: EmergenceConfig,
}

impl GaiaConfig {
    /// Config tuned for unit tests: tiny windows and short breaker timings
    /// so state transitions can be driven in a handful of cycles.
    pub fn for_testing() -> Self {
        Self {
            window: WindowConfig {
                capacity: 16,
                min_samples: 2,
            },
            breaker: BreakerConfig {
                violation_streak: 3,
                cooldown_cycles: 4,
                ..BreakerConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Rolling-window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Maximum number of samples retained per channel.
    pub capacity: usize,

    /// Minimum samples a channel window must hold before its deviation
    /// contributes to the threat score. Below this the deviation is 0,
    /// so a cold-started engine reports a calm baseline.
    pub min_samples: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            min_samples: 8,
        }
    }
}

/// Threat scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Exponential smoothing factor applied to the raw composite score:
    /// `threat = alpha * raw + (1 - alpha) * previous`.
    pub smoothing_alpha: f64,

    /// Deviation tolerance expressed in standard deviations. A channel
    /// saturates its deviation at `tolerance_sigma` standard deviations
    /// from its running mean.
    pub tolerance_sigma: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            tolerance_sigma: 3.0,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Threat level above which a cycle counts as a violation.
    pub high_threshold: f64,

    /// Threat level below which a half-open probe cycle counts as
    /// recovered. Kept well below `high_threshold` for hysteresis.
    pub low_threshold: f64,

    /// Consecutive violating cycles required to open the circuit.
    pub violation_streak: u32,

    /// Cycles to wait in the open state before probing recovery,
    /// multiplied by the current backoff multiplier.
    pub cooldown_cycles: u64,

    /// Upper bound on the backoff multiplier after repeated failed
    /// recovery attempts.
    pub backoff_cap: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.8,
            low_threshold: 0.3,
            violation_streak: 5,
            cooldown_cycles: 10,
            backoff_cap: 8,
        }
    }
}

/// Emergence estimator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergenceConfig {
    /// Weight of the threat rate-of-change term.
    pub trend_weight: f64,

    /// Weight of the channel-deviation entropy term.
    pub entropy_weight: f64,
}

impl Default for EmergenceConfig {
    fn default() -> Self {
        Self {
            trend_weight: 0.5,
            entropy_weight: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = GaiaConfig::default();
        assert_eq!(config.window.capacity, 128);
        assert_eq!(config.scoring.smoothing_alpha, 0.3);
        assert_eq!(config.breaker.high_threshold, 0.8);
        assert_eq!(config.breaker.low_threshold, 0.3);
        assert_eq!(config.breaker.violation_streak, 5);
        assert_eq!(config.breaker.cooldown_cycles, 10);
        assert_eq!(config.breaker.backoff_cap, 8);
    }

    #[test]
    fn test_hysteresis_gap() {
        let config = BreakerConfig::default();
        assert!(config.low_threshold < config.high_threshold);
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = GaiaConfig::for_testing();
        let json = serde_json::to_string(&config).unwrap();
        let back: GaiaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window.capacity, 16);
        assert_eq!(back.breaker.violation_streak, 3);
    }
}

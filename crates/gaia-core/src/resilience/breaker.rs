//! Circuit breaker state machine.
//!
//! Consumes the smoothed threat score once per accepted cycle and applies
//! the transition table: sustained high threat opens the circuit, a
//! cycle-counted cooldown (with exponential backoff on failed recoveries)
//! admits a half-open probe, and a calm probe cycle closes the circuit
//! again, discarding the evidence windows so stale high-variance samples
//! cannot linger. Hysteresis between the high and low thresholds prevents
//! oscillation around a single cutoff.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BreakerConfig;

/// State of the circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation, evidence accumulates.
    Closed,

    /// Sustained abnormal evidence; waiting out the cooldown.
    Open,

    /// Probing whether the fleet has recovered.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Outcome of evaluating one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerDecision {
    /// State after this cycle.
    pub state: CircuitState,

    /// True exactly when the breaker closed from half-open this cycle.
    /// The caller must clear all channel windows and accumulated scores.
    pub reset_evidence: bool,
}

/// The self-healing state machine.
///
/// Owns its state exclusively; the rest of the engine only feeds it the
/// composite threat score and obeys the returned decision.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: CircuitState,
    consecutive_violations: u32,
    opened_at_cycle: u64,
    backoff_multiplier: u64,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            state: CircuitState::Closed,
            consecutive_violations: 0,
            opened_at_cycle: 0,
            backoff_multiplier: 1,
        }
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.state
    }

    /// Violating cycles seen in the current closed streak.
    pub fn consecutive_violations(&self) -> u32 {
        self.consecutive_violations
    }

    /// Current backoff multiplier applied to the cooldown.
    pub fn backoff_multiplier(&self) -> u64 {
        self.backoff_multiplier
    }

    /// Evaluate one accepted cycle.
    ///
    /// `cycle` is the just-completed cycle number; `threat` is the
    /// smoothed composite score for that cycle.
    pub fn evaluate(&mut self, cycle: u64, threat: f64) -> BreakerDecision {
        match self.state {
            CircuitState::Closed => self.evaluate_closed(cycle, threat),
            CircuitState::Open => self.evaluate_open(cycle),
            CircuitState::HalfOpen => self.evaluate_half_open(cycle, threat),
        }
    }

    fn evaluate_closed(&mut self, cycle: u64, threat: f64) -> BreakerDecision {
        if threat > self.config.high_threshold {
            self.consecutive_violations += 1;
            debug!(
                cycle,
                threat,
                violations = self.consecutive_violations,
                "threat above high threshold"
            );

            if self.consecutive_violations >= self.config.violation_streak {
                warn!(
                    cycle,
                    threat,
                    violations = self.consecutive_violations,
                    "circuit opening after sustained high threat"
                );
                self.state = CircuitState::Open;
                self.opened_at_cycle = cycle;
                self.backoff_multiplier = 1;
            }
        } else {
            self.consecutive_violations = 0;
        }

        BreakerDecision {
            state: self.state,
            reset_evidence: false,
        }
    }

    fn evaluate_open(&mut self, cycle: u64) -> BreakerDecision {
        let wait = self.config.cooldown_cycles * self.backoff_multiplier;
        if cycle.saturating_sub(self.opened_at_cycle) >= wait {
            info!(cycle, wait, "circuit half-open, probing recovery");
            self.state = CircuitState::HalfOpen;
        }

        BreakerDecision {
            state: self.state,
            reset_evidence: false,
        }
    }

    fn evaluate_half_open(&mut self, cycle: u64, threat: f64) -> BreakerDecision {
        if threat < self.config.low_threshold {
            info!(cycle, threat, "circuit closing, discarding stale evidence");
            self.state = CircuitState::Closed;
            self.consecutive_violations = 0;
            self.opened_at_cycle = 0;
            return BreakerDecision {
                state: self.state,
                reset_evidence: true,
            };
        }

        self.backoff_multiplier = (self.backoff_multiplier * 2).min(self.config.backoff_cap);
        warn!(
            cycle,
            threat,
            backoff = self.backoff_multiplier,
            "recovery probe failed, circuit re-opening"
        );
        self.state = CircuitState::Open;
        self.opened_at_cycle = cycle;

        BreakerDecision {
            state: self.state,
            reset_evidence: false,
        }
    }
}

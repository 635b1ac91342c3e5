//! Event types and validation.
//!
//! A [`RawEvent`] is what a device connection submits; an [`Event`] is the
//! validated, immutable form the engine folds into its windows. Validation
//! rejects anything that could corrupt shared state before it reaches the
//! aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GaiaError, GaiaResult};

/// An unvalidated utilization sample submitted by a device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawEvent {
    /// Sample timestamp. Must not regress relative to the last accepted
    /// event; out-of-order samples are rejected, not reordered.
    pub timestamp: DateTime<Utc>,

    /// CPU utilization in [0, 1].
    pub cpu: f64,

    /// Memory utilization in [0, 1].
    pub memory: f64,

    /// Network load in [0, 1].
    pub network: f64,
}

impl RawEvent {
    /// Build a sample stamped with the current wall-clock time.
    pub fn now(cpu: f64, memory: f64, network: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            cpu,
            memory,
            network,
        }
    }
}

/// A validated sample. Immutable once accepted; discarded after folding
/// into the per-channel windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Accepted sample timestamp.
    pub timestamp: DateTime<Utc>,
    /// CPU utilization in [0, 1].
    pub cpu: f64,
    /// Memory utilization in [0, 1].
    pub memory: f64,
    /// Network load in [0, 1].
    pub network: f64,
}

impl Event {
    /// The three resource readings in channel order (cpu, memory, network).
    pub fn readings(&self) -> [f64; 3] {
        [self.cpu, self.memory, self.network]
    }
}

/// Normalizes and range-checks incoming samples.
#[derive(Debug, Default)]
pub struct EventValidator;

impl EventValidator {
    /// Validate a raw sample against range and ordering rules.
    ///
    /// Each reading must be a finite number in [0, 1]; the timestamp must
    /// not precede `last_accepted_at`. On failure the returned error names
    /// the offending field and no state is touched.
    pub fn validate(
        &self,
        raw: &RawEvent,
        last_accepted_at: Option<DateTime<Utc>>,
    ) -> GaiaResult<Event> {
        Self::check_reading("cpu", raw.cpu)?;
        Self::check_reading("memory", raw.memory)?;
        Self::check_reading("network", raw.network)?;

        if let Some(last) = last_accepted_at {
            if raw.timestamp < last {
                return Err(GaiaError::validation(
                    "timestamp",
                    format!("sample at {} precedes last accepted event at {}", raw.timestamp, last),
                ));
            }
        }

        Ok(Event {
            timestamp: raw.timestamp,
            cpu: raw.cpu,
            memory: raw.memory,
            network: raw.network,
        })
    }

    fn check_reading(field: &'static str, value: f64) -> GaiaResult<()> {
        if !value.is_finite() {
            return Err(GaiaError::validation(field, format!("value {value} is not finite")));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(GaiaError::validation(
                field,
                format!("value {value} is outside [0, 1]"),
            ));
        }
        Ok(())
    }
}

//! # GAIA Core - Evidence Aggregation and Self-Healing
//!
//! This crate maintains a continuously updated, evidence-based health
//! assessment for a fleet of edge devices submitting periodic resource
//! utilization samples (CPU, memory, network load).
//!
//! ## Overview
//!
//! Each accepted sample runs one ingestion cycle:
//!
//! - **Validation**: range and ordering checks before anything mutates.
//! - **Aggregation**: per-channel rolling windows of the last N samples
//!   with mean, variance, and rank-based percentiles.
//! - **Threat scoring**: per-channel deviations blended into one
//!   composite score in [0, 1] with exponential smoothing.
//! - **Emergence**: a slower indicator separating systemic multi-channel
//!   anomalies from localized ones.
//! - **Circuit breaker**: the self-healing state machine. Sustained
//!   abnormal evidence opens the circuit; recovery closes it again and
//!   autonomously discards the accumulated evidence windows.
//!
//! ## Key Components
//!
//! - [`GaiaEngine`]: the service instance owning all state
//! - [`GaiaConfig`]: named thresholds, window sizes, and backoff constants
//! - [`MetricsSnapshot`]: point-in-time view for external scraping
//! - [`resilience`]: the circuit breaker
//!
//! ## Example
//!
//! ```rust
//! use gaia_core::{GaiaConfig, GaiaEngine, RawEvent};
//!
//! let engine = GaiaEngine::new(GaiaConfig::default());
//!
//! let receipt = engine.ingest(RawEvent::now(0.4, 0.3, 0.1)).unwrap();
//! println!("cycle {} threat {:.3}", receipt.cycle, receipt.threat);
//!
//! let snapshot = engine.snapshot();
//! assert_eq!(snapshot.cycles_total, 1);
//! ```
//!
//! ## Concurrency
//!
//! Ingestion is the single mutating operation and runs under one
//! exclusive boundary; concurrent submitters are serialized in
//! lock-acquisition order. Snapshot and health reads copy state out by
//! value and never observe a half-completed cycle.

pub mod config;
pub mod emergence;
pub mod engine;
pub mod error;
pub mod event;
pub mod resilience;
pub mod scoring;
pub mod snapshot;
pub mod window;

// Re-export main types
pub use config::{BreakerConfig, EmergenceConfig, GaiaConfig, ScoringConfig, WindowConfig};
pub use emergence::{EmergenceEstimator, EmergenceState};
pub use engine::{GaiaEngine, IngestReceipt};
pub use error::{GaiaError, GaiaResult};
pub use event::{Event, EventValidator, RawEvent};
pub use resilience::{CircuitBreaker, CircuitState};
pub use scoring::{ThreatScorer, ThreatState, ThreatUpdate};
pub use snapshot::{HealthReport, HealthStatus, MetricsSnapshot};
pub use window::{Channel, ChannelWindows, RollingWindow};

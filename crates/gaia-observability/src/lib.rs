//! # GAIA Observability - Metric Exposition
//!
//! Maps [`gaia_core::MetricsSnapshot`] values onto the exported
//! Prometheus gauge set and encodes registries in text exposition format.
//! Serving the result over HTTP is the surrounding service's concern.

pub mod error;
pub mod exporter;
pub mod metrics;

pub use error::{ObservabilityError, ObservabilityResult};
pub use exporter::export_metrics;
pub use metrics::GaiaMetrics;

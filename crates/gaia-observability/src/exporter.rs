//! Text exposition for Prometheus scraping.

use prometheus::{Encoder, Registry, TextEncoder};

use crate::error::ObservabilityResult;

/// Encode a registry's metrics in Prometheus text format.
pub fn export_metrics(registry: &Registry) -> ObservabilityResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::GaiaMetrics;
    use gaia_core::{GaiaConfig, GaiaEngine, RawEvent};

    #[test]
    fn test_exposition_carries_gauge_names() {
        let registry = Registry::new();
        let metrics = GaiaMetrics::new(&registry).unwrap();

        let engine = GaiaEngine::new(GaiaConfig::for_testing());
        engine.ingest(RawEvent::now(0.5, 0.5, 0.0)).unwrap();
        metrics.update(&engine.snapshot());

        let output = export_metrics(&registry).unwrap();
        for name in [
            "gaia_cycles_total",
            "gaia_consciousness",
            "gaia_threat_mean",
            "gaia_latency_ms_last",
            "gaia_latency_p95_ms",
            "gaia_emergence",
            "gaia_memory_mb",
        ] {
            assert!(output.contains(name), "missing gauge {name}");
        }
        assert!(output.contains("gaia_cycles_total 1"));
    }
}

//! Command implementations for the GAIA CLI.

use std::time::Instant;

use anyhow::Context;
use gaia_core::{GaiaConfig, GaiaEngine, RawEvent};
use gaia_observability::{export_metrics, GaiaMetrics};
use prometheus::Registry;
use rand::Rng;
use serde::Serialize;
use tracing::info;

/// One named check in the self-test report.
#[derive(Serialize)]
struct TestCase {
    name: &'static str,
    status: &'static str,
    detail: String,
}

/// Self-test report, printed as JSON.
#[derive(Serialize)]
struct TestReport {
    mode: &'static str,
    status: &'static str,
    tests: Vec<TestCase>,
    passed: usize,
    failed: usize,
}

/// Benchmark report, printed as JSON.
#[derive(Serialize)]
struct BenchmarkReport {
    mode: &'static str,
    cycles: u64,
    total_time_seconds: f64,
    cycles_per_second: f64,
    average_latency_ms: f64,
    latency_p95_ms: f64,
    final_threat: f64,
    peak_threat: f64,
    final_emergence: f64,
    breaker_state: String,
}

/// Run the built-in self checks over a fresh engine.
pub fn run_test_mode() -> anyhow::Result<()> {
    let engine = GaiaEngine::new(GaiaConfig::default());
    let mut tests = Vec::new();

    let receipt = engine.ingest(RawEvent::now(0.5, 0.3, 0.1))?;
    tests.push(check(
        "basic_event_processing",
        receipt.cycle == 1,
        format!("cycle {} threat {:.4}", receipt.cycle, receipt.threat),
    ));

    let snapshot = engine.snapshot();
    tests.push(check(
        "score_bounds",
        (0.0..=1.0).contains(&snapshot.threat_last)
            && (0.0..=1.0).contains(&snapshot.emergence)
            && (0.0..=1.0).contains(&snapshot.consciousness),
        format!(
            "threat {:.4} emergence {:.4} consciousness {:.4}",
            snapshot.threat_last, snapshot.emergence, snapshot.consciousness
        ),
    ));

    tests.push(check(
        "metrics_collection",
        snapshot.cycles_total == 1 && snapshot.memory_mb > 0.0,
        format!(
            "cycles {} memory_mb {:.6}",
            snapshot.cycles_total, snapshot.memory_mb
        ),
    ));

    let rejected = engine.ingest(RawEvent::now(1.5, 0.3, 0.1)).is_err()
        && engine.snapshot().cycles_total == 1;
    tests.push(check(
        "rejection_is_no_op",
        rejected,
        "out-of-range cpu rejected without advancing cycles".to_string(),
    ));

    let failed = tests.iter().filter(|t| t.status == "failed").count();
    let report = TestReport {
        mode: "test",
        status: if failed == 0 { "success" } else { "failure" },
        passed: tests.len() - failed,
        failed,
        tests,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    anyhow::ensure!(failed == 0, "{failed} self check(s) failed");
    Ok(())
}

/// Drive random traffic through an engine and report throughput.
pub fn run_benchmark_mode(cycles: u64) -> anyhow::Result<()> {
    let engine = GaiaEngine::new(GaiaConfig::default());
    let mut rng = rand::thread_rng();

    info!(cycles, "starting benchmark");
    let started = Instant::now();
    let mut peak_threat = 0.0f64;

    for _ in 0..cycles {
        let receipt = engine
            .ingest(RawEvent::now(
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
            ))
            .context("benchmark event rejected")?;
        peak_threat = peak_threat.max(receipt.threat);
    }

    let total = started.elapsed().as_secs_f64();
    let snapshot = engine.snapshot();

    let report = BenchmarkReport {
        mode: "benchmark",
        cycles,
        total_time_seconds: total,
        cycles_per_second: if total > 0.0 { cycles as f64 / total } else { 0.0 },
        average_latency_ms: if cycles > 0 { total * 1_000.0 / cycles as f64 } else { 0.0 },
        latency_p95_ms: snapshot.latency_p95_ms,
        final_threat: snapshot.threat_last,
        peak_threat,
        final_emergence: snapshot.emergence,
        breaker_state: snapshot.breaker_state.to_string(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Drive random traffic, then print the Prometheus text exposition.
pub fn run_metrics_mode(cycles: u64) -> anyhow::Result<()> {
    let engine = GaiaEngine::new(GaiaConfig::default());
    let registry = Registry::new();
    let metrics = GaiaMetrics::new(&registry)?;
    let mut rng = rand::thread_rng();

    for _ in 0..cycles {
        engine
            .ingest(RawEvent::now(
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
            ))
            .context("metrics event rejected")?;
    }

    metrics.update(&engine.snapshot());
    print!("{}", export_metrics(&registry)?);
    Ok(())
}

fn check(name: &'static str, passed: bool, detail: String) -> TestCase {
    TestCase {
        name,
        status: if passed { "passed" } else { "failed" },
        detail,
    }
}

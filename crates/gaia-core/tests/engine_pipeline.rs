//! End-to-end pipeline tests driving the engine exactly as an external
//! collaborator would: submit events, watch receipts and snapshots.

use chrono::{Duration, TimeZone, Utc};
use gaia_core::{
    CircuitState, GaiaConfig, GaiaEngine, HealthStatus, RawEvent,
};

/// Builds events with explicitly increasing timestamps so ordering never
/// depends on the test host's clock resolution.
struct EventFeed {
    engine: GaiaEngine,
    next_second: i64,
}

impl EventFeed {
    fn new(config: GaiaConfig) -> Self {
        Self {
            engine: GaiaEngine::new(config),
            next_second: 0,
        }
    }

    fn submit(&mut self, cpu: f64, memory: f64, network: f64) -> gaia_core::IngestReceipt {
        let timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap()
            + Duration::seconds(self.next_second);
        self.next_second += 1;
        self.engine
            .ingest(RawEvent {
                timestamp,
                cpu,
                memory,
                network,
            })
            .expect("valid event must be accepted")
    }
}

#[test]
fn calm_traffic_keeps_breaker_closed() {
    let mut feed = EventFeed::new(GaiaConfig::default());

    for _ in 0..100 {
        let receipt = feed.submit(0.1, 0.1, 0.1);
        assert_eq!(receipt.breaker_state, CircuitState::Closed);
        assert!((0.0..=1.0).contains(&receipt.threat));
    }

    let snapshot = feed.engine.snapshot();
    assert_eq!(snapshot.cycles_total, 100);
    // Perfectly steady traffic is a calm baseline: the threat converges
    // to zero, not merely under the breaker's trip point, and sits well
    // inside the recovery band.
    assert!(snapshot.threat_mean < 1e-9, "threat_mean {}", snapshot.threat_mean);
    assert!(snapshot.threat_last < feed.engine.config().breaker.low_threshold);
    assert_eq!(feed.engine.health().status, HealthStatus::Ok);
}

#[test]
fn sustained_cpu_spike_opens_then_self_heals() {
    let mut feed = EventFeed::new(GaiaConfig::default());
    let cooldown = feed.engine.config().breaker.cooldown_cycles;

    // Calm baseline fills the windows.
    for _ in 0..100 {
        feed.submit(0.1, 0.1, 0.1);
    }

    // Sustained cpu anomaly: the smoothed score needs a few cycles to
    // breach the high threshold, then the violation streak must build.
    let mut opened_at = None;
    for i in 0..20 {
        let receipt = feed.submit(0.95, 0.1, 0.1);
        if receipt.breaker_state == CircuitState::Open {
            opened_at = Some((i, receipt.cycle));
            break;
        }
    }
    let (_, opened_cycle) = opened_at.expect("breaker must open under sustained anomaly");
    assert_eq!(feed.engine.health().status, HealthStatus::Degraded);

    // Calm traffic through the cooldown. The cycle that satisfies the
    // cooldown only moves to half-open; the one after judges recovery.
    let mut closed_receipt = None;
    for _ in 0..(cooldown + 2) {
        let receipt = feed.submit(0.1, 0.1, 0.1);
        if receipt.breaker_state == CircuitState::Closed {
            closed_receipt = Some(receipt);
            break;
        }
    }
    let closed = closed_receipt.expect("breaker must close after calm cooldown");
    assert!(closed.cycle > opened_cycle);
    assert_eq!(feed.engine.health().status, HealthStatus::Ok);

    // Autonomous reset discarded the evidence windows.
    let snapshot = feed.engine.snapshot();
    assert_eq!(snapshot.breaker_state, CircuitState::Closed);
    assert_eq!(snapshot.latency_p95_ms, 0.0);
    assert_eq!(snapshot.latency_last_ms, 0.0);
    assert_eq!(snapshot.threat_mean, 0.0);
    assert_eq!(snapshot.memory_mb, 0.0);
    // cycles_total survives the reset.
    assert_eq!(snapshot.cycles_total, closed.cycle);
}

#[test]
fn failed_recovery_doubles_the_wait() {
    let mut feed = EventFeed::new(GaiaConfig::default());
    let cooldown = feed.engine.config().breaker.cooldown_cycles;

    for _ in 0..100 {
        feed.submit(0.1, 0.1, 0.1);
    }

    // Keep the anomaly running straight through both recovery probes and
    // record the cycles at which half-open probes were admitted.
    let mut half_open_cycles = Vec::new();
    for _ in 0..80 {
        let receipt = feed.submit(0.95, 0.1, 0.1);
        if receipt.breaker_state == CircuitState::HalfOpen {
            half_open_cycles.push(receipt.cycle);
            if half_open_cycles.len() == 2 {
                break;
            }
        }
    }

    assert_eq!(half_open_cycles.len(), 2, "expected two recovery probes");
    let gap = half_open_cycles[1] - half_open_cycles[0];
    assert!(
        gap >= 2 * cooldown,
        "second probe after {gap} cycles, expected at least {}",
        2 * cooldown
    );
}

#[test]
fn rejected_events_leave_state_untouched() {
    let mut feed = EventFeed::new(GaiaConfig::default());
    for _ in 0..10 {
        feed.submit(0.2, 0.2, 0.2);
    }
    let before = feed.engine.snapshot();

    // Out of range, non-finite, and out-of-order inputs all bounce.
    let stale = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    let rejects = [
        RawEvent::now(1.7, 0.2, 0.2),
        RawEvent::now(0.2, f64::NAN, 0.2),
        RawEvent::now(0.2, 0.2, -0.1),
        RawEvent {
            timestamp: stale,
            cpu: 0.2,
            memory: 0.2,
            network: 0.2,
        },
    ];
    for raw in rejects {
        let err = feed.engine.ingest(raw).unwrap_err();
        assert!(err.is_validation(), "unexpected error kind: {err}");
    }

    let after = feed.engine.snapshot();
    assert_eq!(after.cycles_total, before.cycles_total);
    assert_eq!(after.threat_last, before.threat_last);
    assert_eq!(after.emergence, before.emergence);
    assert_eq!(after.memory_mb, before.memory_mb);
    assert_eq!(after.breaker_state, before.breaker_state);
}

#[test]
fn window_capacity_bounds_memory() {
    let config = GaiaConfig::for_testing();
    let capacity = config.window.capacity;
    let mut feed = EventFeed::new(config);

    for _ in 0..(capacity * 3) {
        feed.submit(0.3, 0.3, 0.3);
    }

    // Five windows (three resources, latency, threat history), each
    // capped at capacity.
    let snapshot = feed.engine.snapshot();
    let max_bytes = 5 * capacity * std::mem::size_of::<f64>();
    assert!(snapshot.memory_mb <= max_bytes as f64 / (1024.0 * 1024.0));
    assert_eq!(snapshot.cycles_total, (capacity * 3) as u64);
}

#[test]
fn scores_stay_bounded_under_chaotic_input() {
    let mut feed = EventFeed::new(GaiaConfig::for_testing());

    // Deterministic but erratic traffic exercising the full input range.
    let mut x: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        (x % 1000) as f64 / 999.0
    };

    for _ in 0..500 {
        let receipt = feed.submit(next(), next(), next());
        assert!((0.0..=1.0).contains(&receipt.threat));
        let snapshot = feed.engine.snapshot();
        assert!((0.0..=1.0).contains(&snapshot.emergence));
        assert!((0.0..=1.0).contains(&snapshot.consciousness));
        assert!((0.0..=1.0).contains(&snapshot.threat_mean));
    }
}

#[test]
fn concurrent_submitters_are_serialized() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(GaiaEngine::new(GaiaConfig::default()));
    let mut handles = Vec::new();

    // Same timestamp from every thread keeps ordering valid regardless of
    // which submitter wins the boundary.
    let timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                engine
                    .ingest(RawEvent {
                        timestamp,
                        cpu: 0.2,
                        memory: 0.2,
                        network: 0.2,
                    })
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.cycles_total, 400u64);
}

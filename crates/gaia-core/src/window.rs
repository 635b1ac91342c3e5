//! Rolling-window statistics.
//!
//! Each monitored channel keeps a fixed-capacity ring buffer of its most
//! recent samples and answers mean / variance / percentile queries over
//! that buffer. Degenerate statistics on an empty buffer return 0 rather
//! than failing, so a cold-started engine reports a calm baseline.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{GaiaError, GaiaResult};

/// One monitored signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// CPU utilization.
    Cpu,
    /// Memory utilization.
    Memory,
    /// Network load.
    Network,
    /// Wall-clock duration of each ingestion cycle, in milliseconds.
    Latency,
}

impl Channel {
    /// The three resource channels, in the order events carry them.
    pub const RESOURCES: [Channel; 3] = [Channel::Cpu, Channel::Memory, Channel::Network];
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Cpu => write!(f, "cpu"),
            Channel::Memory => write!(f, "memory"),
            Channel::Network => write!(f, "network"),
            Channel::Latency => write!(f, "latency"),
        }
    }
}

/// Fixed-capacity FIFO ring buffer with rank-based statistics.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if at capacity.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed sample, or 0 when empty.
    pub fn last(&self) -> f64 {
        self.samples.back().copied().unwrap_or(0.0)
    }

    /// Discard all samples. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Mean over the current buffer, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Population variance over the current buffer, 0 when empty.
    pub fn variance(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.samples.len() as f64
    }

    /// Population standard deviation over the current buffer.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Nearest-rank percentile estimate, 0 when empty.
    ///
    /// Sorts the buffer and picks `ceil(p/100 * n) - 1`, clamped to the
    /// valid index range.
    pub fn percentile(&self, p: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let rank = (p / 100.0 * count as f64).ceil() as isize - 1;
        let index = rank.clamp(0, count as isize - 1) as usize;
        sorted[index]
    }

    /// Check the length-vs-capacity invariant. A violation is a defect in
    /// the window itself, surfaced loudly rather than normalized away.
    pub fn check_invariant(&self, label: &str) -> GaiaResult<()> {
        if self.samples.len() > self.capacity {
            return Err(GaiaError::InvariantViolation(format!(
                "{label} window holds {} samples, capacity {}",
                self.samples.len(),
                self.capacity
            )));
        }
        Ok(())
    }
}

/// One rolling window per monitored channel, plus a window of recent
/// threat scores backing the exported mean gauge.
#[derive(Debug, Clone)]
pub struct ChannelWindows {
    cpu: RollingWindow,
    memory: RollingWindow,
    network: RollingWindow,
    latency: RollingWindow,
    threat: RollingWindow,
}

impl ChannelWindows {
    /// Create empty windows, each with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu: RollingWindow::new(capacity),
            memory: RollingWindow::new(capacity),
            network: RollingWindow::new(capacity),
            latency: RollingWindow::new(capacity),
            threat: RollingWindow::new(capacity),
        }
    }

    /// Borrow the window for a channel.
    pub fn channel(&self, channel: Channel) -> &RollingWindow {
        match channel {
            Channel::Cpu => &self.cpu,
            Channel::Memory => &self.memory,
            Channel::Network => &self.network,
            Channel::Latency => &self.latency,
        }
    }

    /// Append a sample to a channel's window.
    pub fn record(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::Cpu => self.cpu.push(value),
            Channel::Memory => self.memory.push(value),
            Channel::Network => self.network.push(value),
            Channel::Latency => self.latency.push(value),
        }
    }

    /// Append a smoothed threat score to the threat history window.
    pub fn record_threat(&mut self, value: f64) {
        self.threat.push(value);
    }

    /// Window of recent smoothed threat scores.
    pub fn threat(&self) -> &RollingWindow {
        &self.threat
    }

    /// Clear every window, including threat history. Used by the breaker's
    /// autonomous reset to discard potentially poisoned evidence.
    pub fn clear_all(&mut self) {
        self.cpu.clear();
        self.memory.clear();
        self.network.clear();
        self.latency.clear();
        self.threat.clear();
    }

    /// Total samples currently held across all windows.
    pub fn total_samples(&self) -> usize {
        self.cpu.len() + self.memory.len() + self.network.len() + self.latency.len()
            + self.threat.len()
    }

    /// Verify the capacity invariant on every window, the threat history
    /// included.
    pub fn check_invariants(&self) -> GaiaResult<()> {
        self.cpu.check_invariant("cpu")?;
        self.memory.check_invariant("memory")?;
        self.network.check_invariant("network")?;
        self.latency.check_invariant("latency")?;
        self.threat.check_invariant("threat")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut window = RollingWindow::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            window.push(v);
        }
        assert_eq!(window.len(), 3);
        // Oldest evicted first: 3, 4, 5 remain.
        assert_eq!(window.mean(), 4.0);
        assert_eq!(window.last(), 5.0);
    }

    #[test]
    fn test_empty_window_defaults() {
        let window = RollingWindow::new(8);
        assert_eq!(window.mean(), 0.0);
        assert_eq!(window.variance(), 0.0);
        assert_eq!(window.percentile(95.0), 0.0);
        assert_eq!(window.last(), 0.0);
    }

    #[test]
    fn test_population_variance() {
        let mut window = RollingWindow::new(8);
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            window.push(v);
        }
        assert!((window.variance() - 4.0).abs() < 1e-12);
        assert!((window.std_dev() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_rank_percentile() {
        let mut window = RollingWindow::new(100);
        for v in 1..=100 {
            window.push(v as f64);
        }
        assert_eq!(window.percentile(95.0), 95.0);
        assert_eq!(window.percentile(50.0), 50.0);
        assert_eq!(window.percentile(100.0), 100.0);
        // Rank clamps to the first element for tiny p.
        assert_eq!(window.percentile(0.0), 1.0);
    }

    #[test]
    fn test_percentile_single_sample() {
        let mut window = RollingWindow::new(4);
        window.push(42.0);
        assert_eq!(window.percentile(95.0), 42.0);
        assert_eq!(window.percentile(1.0), 42.0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut window = RollingWindow::new(4);
        window.push(1.0);
        window.push(2.0);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 4);
    }

    #[test]
    fn test_channel_windows_clear_all() {
        let mut windows = ChannelWindows::new(4);
        windows.record(Channel::Cpu, 0.5);
        windows.record(Channel::Latency, 12.0);
        windows.record_threat(0.2);
        assert_eq!(windows.total_samples(), 3);

        windows.clear_all();
        assert_eq!(windows.total_samples(), 0);
        assert_eq!(windows.channel(Channel::Cpu).percentile(95.0), 0.0);
    }

    #[test]
    fn test_invariants_hold_after_heavy_traffic() {
        let mut windows = ChannelWindows::new(8);
        for i in 0..1000 {
            windows.record(Channel::Cpu, (i % 10) as f64 / 10.0);
            windows.record(Channel::Latency, i as f64);
            windows.record_threat((i % 10) as f64 / 10.0);
        }
        windows.check_invariants().unwrap();
        assert_eq!(windows.channel(Channel::Cpu).len(), 8);
        assert_eq!(windows.channel(Channel::Latency).len(), 8);
        assert_eq!(windows.threat().len(), 8);
    }
}

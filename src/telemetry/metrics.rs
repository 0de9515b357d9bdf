// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session metrics.
//!
//! Lightweight counters and a latency histogram owned by the session runner.
//! Nothing here is shared across threads; the runner handles one message at
//! a time.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Counters for one agent process.
#[derive(Debug)]
pub struct Metrics {
    /// Inbound messages by `type` tag, including unknown kinds.
    inbound: BTreeMap<String, u64>,

    /// Decisions by outcome label (action type or wait reason).
    decisions: BTreeMap<&'static str, u64>,

    /// Lines that could not be decoded.
    malformed: u64,

    /// Lines written to the peer.
    outbound: u64,

    /// Time spent inside the decision engine.
    decide: OperationMetrics,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inbound: BTreeMap::new(),
            decisions: BTreeMap::new(),
            malformed: 0,
            outbound: 0,
            decide: OperationMetrics::new(),
            start_time: Instant::now(),
        }
    }

    /// Count a decoded inbound message.
    pub fn record_inbound(&mut self, kind: &str) {
        *self.inbound.entry(kind.to_string()).or_insert(0) += 1;
    }

    /// Count a line that failed to decode.
    pub fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    /// Count a line written to the peer.
    pub fn record_outbound(&mut self) {
        self.outbound += 1;
    }

    /// Record one engine decision and how long it took.
    pub fn record_decision(&mut self, label: &'static str, duration: Duration) {
        *self.decisions.entry(label).or_insert(0) += 1;
        self.decide.record(duration);
    }

    pub fn inbound_count(&self, kind: &str) -> u64 {
        self.inbound.get(kind).copied().unwrap_or(0)
    }

    pub fn decision_count(&self, label: &str) -> u64 {
        self.decisions.get(label).copied().unwrap_or(0)
    }

    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }

    pub fn outbound_count(&self) -> u64 {
        self.outbound
    }

    /// Get uptime since metrics were initialized.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Take a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inbound: self.inbound.clone(),
            decisions: self
                .decisions
                .iter()
                .map(|(label, count)| (label.to_string(), *count))
                .collect(),
            malformed: self.malformed,
            outbound: self.outbound,
            decide: self.decide.clone(),
            uptime: self.uptime(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic operation metrics with histogram.
#[derive(Debug, Clone)]
pub struct OperationMetrics {
    /// Number of operations.
    pub count: u64,

    /// Total duration.
    pub total_duration: Duration,

    /// Minimum duration.
    pub min_duration: Duration,

    /// Maximum duration.
    pub max_duration: Duration,

    /// Histogram buckets for latency distribution.
    pub histogram: Histogram,
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    pub fn record(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    pub fn avg_duration(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.count as u32
        }
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-bucket histogram for latency tracking.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Upper bucket bounds in microseconds; one overflow bucket follows.
    buckets: Vec<u64>,

    /// Count per bucket.
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram with custom bucket boundaries (in microseconds).
    pub fn with_buckets(buckets: Vec<u64>) -> Self {
        let counts = vec![0; buckets.len() + 1];
        Self { buckets, counts }
    }

    pub fn record(&mut self, duration: Duration) {
        let micros = duration.as_micros() as u64;
        let bucket_idx = self
            .buckets
            .iter()
            .position(|&b| micros <= b)
            .unwrap_or(self.buckets.len());
        self.counts[bucket_idx] += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Approximate percentile, reported as the containing bucket's bound.
    pub fn percentile(&self, p: f64) -> Duration {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return Duration::ZERO;
        }

        let target = (total as f64 * p / 100.0).ceil() as u64;
        let mut cumulative = 0u64;

        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                let micros = if i < self.buckets.len() {
                    self.buckets[i]
                } else {
                    self.buckets.last().copied().unwrap_or(0) * 10
                };
                return Duration::from_micros(micros);
            }
        }

        Duration::ZERO
    }

    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        // Decisions are pure in-memory scans: 10us .. 100ms
        Self::with_buckets(vec![10, 100, 1_000, 10_000, 100_000])
    }
}

/// A snapshot of all metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub inbound: BTreeMap<String, u64>,
    pub decisions: BTreeMap<String, u64>,
    pub malformed: u64,
    pub outbound: u64,
    pub decide: OperationMetrics,
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Total decisions across all outcomes.
    pub fn total_decisions(&self) -> u64 {
        self.decisions.values().sum()
    }

    /// One-line summary suitable for a log field.
    pub fn format_summary(&self) -> String {
        let inbound = join_counts(&self.inbound);
        let decisions = join_counts(&self.decisions);
        format!(
            "inbound[{}] decisions[{}] malformed={} outbound={} decide avg {:.2?} p99 {:.2?} uptime {:.2?}",
            inbound,
            decisions,
            self.malformed,
            self.outbound,
            self.decide.avg_duration(),
            self.decide.histogram.p99(),
            self.uptime
        )
    }
}

fn join_counts(counts: &BTreeMap<String, u64>) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{}={}", name, count))
        .collect::<Vec<_>>()
        .join(" ")
}

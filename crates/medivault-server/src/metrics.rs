// crates/medivault-server/src/metrics.rs
// Cosmetic performance numbers for the dashboard. No statistical meaning.

use chrono::Utc;
use medivault_types::PerformanceMetric;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Most recent metrics kept for the dashboard
pub const METRICS_CAPACITY: usize = 20;

/// Records-searched value used when the caller does not know the count
pub const DEFAULT_RECORDS_SEARCHED: u32 = 1_247;

const LATENCY_MS: std::ops::RangeInclusive<u32> = 250..=450;
const OVERHEAD: std::ops::RangeInclusive<u32> = 5..=15;
const ACCURACY: std::ops::RangeInclusive<u32> = 94..=99;

/// Produce one simulated metric
pub fn simulate(records_searched: Option<u32>) -> PerformanceMetric {
    let mut rng = rand::rng();
    PerformanceMetric {
        timestamp: Utc::now(),
        query_latency_ms: rng.random_range(LATENCY_MS),
        encryption_overhead: rng.random_range(OVERHEAD),
        records_searched: records_searched.unwrap_or(DEFAULT_RECORDS_SEARCHED),
        accuracy: rng.random_range(ACCURACY),
    }
}

/// Bounded metrics list; oldest entries are evicted first.
#[derive(Debug, Clone, Default)]
pub struct MetricsLog {
    entries: Arc<Mutex<VecDeque<PerformanceMetric>>>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate and append a metric for a completed query
    pub fn record_query(&self, records_searched: Option<u32>) -> PerformanceMetric {
        let metric = simulate(records_searched);
        self.push(metric.clone());
        metric
    }

    pub fn push(&self, metric: PerformanceMetric) {
        let Ok(mut entries) = self.entries.lock() else {
            warn!("Metrics lock poisoned, metric not stored");
            return;
        };
        debug!(
            latency_ms = metric.query_latency_ms,
            overhead = metric.encryption_overhead,
            records = metric.records_searched,
            "Recorded query metric"
        );
        entries.push_back(metric);
        while entries.len() > METRICS_CAPACITY {
            entries.pop_front();
        }
    }

    /// Snapshot in insertion order (oldest first)
    pub fn snapshot(&self) -> Vec<PerformanceMetric> {
        self.entries
            .lock()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn latest(&self) -> Option<PerformanceMetric> {
        self.entries.lock().ok().and_then(|e| e.back().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean simulated latency across retained entries
    pub fn average_latency_ms(&self) -> Option<f64> {
        let entries = self.entries.lock().ok()?;
        if entries.is_empty() {
            return None;
        }
        let total: u64 = entries.iter().map(|m| u64::from(m.query_latency_ms)).sum();
        Some(total as f64 / entries.len() as f64)
    }
}

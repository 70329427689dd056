//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total successful deliveries
    delivered_count: AtomicU64,
    /// Total delivery failures
    failure_count: AtomicU64,
    /// Total orders carried by successful deliveries
    orders_delivered: AtomicU64,
    /// Duration of the last delivery attempt (microseconds)
    last_latency_us: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total delivered count
    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    /// Record a successful delivery of `orders` orders
    pub fn inc_delivered(&self, orders: usize) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
        self.orders_delivered
            .fetch_add(orders as u64, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total orders delivered
    pub fn orders_delivered(&self) -> u64 {
        self.orders_delivered.load(Ordering::Relaxed)
    }

    /// Get last delivery latency in milliseconds
    pub fn last_latency_ms(&self) -> f64 {
        self.last_latency_us.load(Ordering::Relaxed) as f64 / 1000.0
    }

    /// Set last delivery latency
    pub fn set_last_latency_us(&self, us: u64) {
        self.last_latency_us.store(us, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered_count: self.delivered_count(),
            failure_count: self.failure_count(),
            orders_delivered: self.orders_delivered(),
            last_latency_ms: self.last_latency_ms(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub delivered_count: u64,
    pub failure_count: u64,
    pub orders_delivered: u64,
    pub last_latency_ms: f64,
}

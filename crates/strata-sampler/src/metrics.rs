use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::DEFAULT_SLOW_THRESHOLD_MS;

#[derive(Debug)]
pub struct SamplingMetrics {
    pub invocation_count: AtomicU64,
    pub total_execution_time_us: AtomicU64,
    pub slow_invocation_count: AtomicU64,
    pub error_count: AtomicU64,
    pub rows_written: AtomicU64,
    slow_threshold_ms: AtomicU64,
}

impl SamplingMetrics {
    pub fn new() -> Self {
        Self {
            invocation_count: AtomicU64::new(0),
            total_execution_time_us: AtomicU64::new(0),
            slow_invocation_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            rows_written: AtomicU64::new(0),
            slow_threshold_ms: AtomicU64::new(DEFAULT_SLOW_THRESHOLD_MS),
        }
    }

    pub fn with_slow_threshold(self, threshold_ms: u64) -> Self {
        self.set_slow_threshold(threshold_ms);
        self
    }

    pub fn set_slow_threshold(&self, threshold_ms: u64) {
        self.slow_threshold_ms
            .store(threshold_ms, Ordering::Relaxed);
    }

    pub fn slow_threshold_ms(&self) -> u64 {
        self.slow_threshold_ms.load(Ordering::Relaxed)
    }

    pub fn is_slow(&self, duration: Duration) -> bool {
        duration.as_millis() as u64 >= self.slow_threshold_ms()
    }

    /// `rows` is `None` for a failed invocation.
    pub fn record_invocation(&self, duration: Duration, rows: Option<u64>) {
        self.invocation_count.fetch_add(1, Ordering::Relaxed);
        let micros = duration.as_micros() as u64;
        self.total_execution_time_us
            .fetch_add(micros, Ordering::Relaxed);

        match rows {
            Some(rows) => {
                self.rows_written.fetch_add(rows, Ordering::Relaxed);
            }
            None => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
        }

        if self.is_slow(duration) {
            self.slow_invocation_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_invocation_count(&self) -> u64 {
        self.invocation_count.load(Ordering::Relaxed)
    }

    pub fn get_total_execution_time_us(&self) -> u64 {
        self.total_execution_time_us.load(Ordering::Relaxed)
    }

    pub fn get_slow_invocation_count(&self) -> u64 {
        self.slow_invocation_count.load(Ordering::Relaxed)
    }

    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn get_rows_written(&self) -> u64 {
        self.rows_written.load(Ordering::Relaxed)
    }

    pub fn get_average_execution_time_us(&self) -> u64 {
        let count = self.get_invocation_count();
        if count == 0 {
            return 0;
        }
        self.get_total_execution_time_us() / count
    }

    pub fn reset(&self) {
        self.invocation_count.store(0, Ordering::Relaxed);
        self.total_execution_time_us.store(0, Ordering::Relaxed);
        self.slow_invocation_count.store(0, Ordering::Relaxed);
        self.error_count.store(0, Ordering::Relaxed);
        self.rows_written.store(0, Ordering::Relaxed);
    }
}

impl Default for SamplingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = SamplingMetrics::new();
        assert_eq!(metrics.get_invocation_count(), 0);
        assert_eq!(metrics.get_total_execution_time_us(), 0);
        assert_eq!(metrics.get_slow_invocation_count(), 0);
        assert_eq!(metrics.get_error_count(), 0);
        assert_eq!(metrics.get_rows_written(), 0);
    }

    #[test]
    fn test_record_invocation() {
        let metrics = SamplingMetrics::new();
        metrics.record_invocation(Duration::from_millis(100), Some(9));
        assert_eq!(metrics.get_invocation_count(), 1);
        assert_eq!(metrics.get_total_execution_time_us(), 100_000);
        assert_eq!(metrics.get_rows_written(), 9);
        assert_eq!(metrics.get_slow_invocation_count(), 0);
        assert_eq!(metrics.get_error_count(), 0);
    }

    #[test]
    fn test_record_slow_invocation() {
        let metrics = SamplingMetrics::new();
        metrics.record_invocation(Duration::from_millis(1500), Some(0));
        assert_eq!(metrics.get_invocation_count(), 1);
        assert_eq!(metrics.get_slow_invocation_count(), 1);
    }

    #[test]
    fn test_record_error() {
        let metrics = SamplingMetrics::new();
        metrics.record_invocation(Duration::from_millis(50), None);
        assert_eq!(metrics.get_invocation_count(), 1);
        assert_eq!(metrics.get_error_count(), 1);
        assert_eq!(metrics.get_rows_written(), 0);
    }

    #[test]
    fn test_average_execution_time() {
        let metrics = SamplingMetrics::new();
        metrics.record_invocation(Duration::from_millis(100), Some(1));
        metrics.record_invocation(Duration::from_millis(200), Some(1));
        assert_eq!(metrics.get_average_execution_time_us(), 150_000);
    }

    #[test]
    fn test_average_execution_time_empty() {
        let metrics = SamplingMetrics::new();
        assert_eq!(metrics.get_average_execution_time_us(), 0);
    }

    #[test]
    fn test_reset() {
        let metrics = SamplingMetrics::new();
        metrics.record_invocation(Duration::from_millis(100), None);
        metrics.record_invocation(Duration::from_millis(1500), Some(4));
        metrics.reset();
        assert_eq!(metrics.get_invocation_count(), 0);
        assert_eq!(metrics.get_total_execution_time_us(), 0);
        assert_eq!(metrics.get_slow_invocation_count(), 0);
        assert_eq!(metrics.get_error_count(), 0);
        assert_eq!(metrics.get_rows_written(), 0);
    }

    #[test]
    fn test_custom_slow_threshold() {
        let metrics = SamplingMetrics::new().with_slow_threshold(500);
        metrics.record_invocation(Duration::from_millis(400), Some(1));
        assert_eq!(metrics.get_slow_invocation_count(), 0);
        metrics.record_invocation(Duration::from_millis(600), Some(1));
        assert_eq!(metrics.get_slow_invocation_count(), 1);
        assert_eq!(metrics.slow_threshold_ms(), 500);
    }

    #[test]
    fn test_threshold_can_change_while_shared() {
        let metrics = std::sync::Arc::new(SamplingMetrics::new());
        let shared = std::sync::Arc::clone(&metrics);
        shared.set_slow_threshold(10);
        metrics.record_invocation(Duration::from_millis(20), Some(1));
        assert_eq!(shared.get_slow_invocation_count(), 1);
    }
}

//! Rolling fluency measurement for the current success streak.
//!
//! Latencies are only meaningful across an unbroken streak of correct
//! answers, so any failure clears the window. The chronometer is armed by
//! the caller when a turn actually becomes answerable — a reveal delay may
//! separate trial construction from true availability.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of per-turn response latencies.
#[derive(Debug, Clone)]
pub struct FluencyTracker {
    window: VecDeque<Duration>,
    capacity: usize,
    started_at: Instant,
}

impl FluencyTracker {
    /// Create a tracker keeping the most recent `capacity` latencies.
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            started_at: Instant::now(),
        }
    }

    /// Re-arm the reference instant for the next latency measurement.
    pub fn start(&mut self) {
        self.started_at = Instant::now();
    }

    /// Time elapsed since the last `start`.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Append a success latency, truncating to the window capacity.
    pub fn record_success(&mut self, latency: Duration) {
        self.window.push_back(latency);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
    }

    /// Drop all latencies; the streak is broken.
    pub fn record_failure(&mut self) {
        self.window.clear();
    }

    /// Mean latency over the window, or `None` when empty.
    pub fn mean_latency(&self) -> Option<Duration> {
        if self.window.is_empty() {
            return None;
        }
        let total: Duration = self.window.iter().sum();
        Some(total / self.window.len() as u32)
    }

    /// Number of latencies currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_empty_window_has_no_mean() {
        let tracker = FluencyTracker::new(10);
        assert!(tracker.is_empty());
        assert_eq!(tracker.mean_latency(), None);
    }

    #[test]
    fn test_mean_latency() {
        let mut tracker = FluencyTracker::new(10);
        tracker.record_success(ms(1000));
        tracker.record_success(ms(2000));
        tracker.record_success(ms(3000));

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.mean_latency(), Some(ms(2000)));
    }

    #[test]
    fn test_window_caps_at_capacity() {
        let mut tracker = FluencyTracker::new(3);
        for n in [1000, 2000, 3000, 4000] {
            tracker.record_success(ms(n));
        }

        assert_eq!(tracker.len(), 3);
        // Oldest entry (1000) dropped: mean of 2000/3000/4000
        assert_eq!(tracker.mean_latency(), Some(ms(3000)));
    }

    #[test]
    fn test_failure_clears_window() {
        let mut tracker = FluencyTracker::new(10);
        tracker.record_success(ms(1000));
        tracker.record_success(ms(1500));
        tracker.record_failure();

        assert!(tracker.is_empty());
        assert_eq!(tracker.mean_latency(), None);
    }

    #[test]
    fn test_elapsed_measures_from_start() {
        let mut tracker = FluencyTracker::new(10);
        tracker.start();
        std::thread::sleep(ms(10));
        assert!(tracker.elapsed() >= ms(10));
    }
}

//! # Loop timing accumulator.
//!
//! Keeps the poll loop's wall-clock period close to the requested interval even when
//! the predicate itself is slow (device I/O, serial round-trips).
//!
//! After every iteration the loop reports how long the iteration took, measured from
//! the previous measurement point, so it covers the prior sleep plus the predicate call.
//! The part of that duration which was *not* sleep is overhead:
//!
//! ```text
//! overhead_i = max(0, iteration_i − delay_{i−1})
//! avg        = Σ overhead / loops
//! delay_i    = max(0, target − avg)
//! ```
//!
//! State is private to one invocation and never shared.

use std::time::Duration;

/// Running-average overhead tracker for one poll loop.
#[derive(Debug, Clone)]
pub struct LoopTiming {
    target: Duration,
    previous_delay: Duration,
    loops: u32,
    accumulated_overhead: Duration,
}

impl LoopTiming {
    /// Creates a fresh accumulator for the given target interval.
    pub fn new(target: Duration) -> Self {
        Self {
            target,
            previous_delay: Duration::ZERO,
            loops: 0,
            accumulated_overhead: Duration::ZERO,
        }
    }

    /// Records one iteration and returns the delay to sleep before the next one.
    pub fn record(&mut self, iteration: Duration) -> Duration {
        let overhead = iteration.saturating_sub(self.previous_delay);
        self.loops = self.loops.saturating_add(1);
        self.accumulated_overhead = self.accumulated_overhead.saturating_add(overhead);

        let next = self.target.saturating_sub(self.average_overhead());
        self.previous_delay = next;
        next
    }

    /// Mean overhead over all recorded iterations (zero before the first one).
    pub fn average_overhead(&self) -> Duration {
        if self.loops == 0 {
            Duration::ZERO
        } else {
            self.accumulated_overhead / self.loops
        }
    }

    /// Number of recorded iterations.
    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// The target interval this accumulator converges to.
    pub fn target(&self) -> Duration {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_delay_subtracts_predicate_cost() {
        let mut t = LoopTiming::new(ms(100));
        // First iteration had no prior sleep: all 20ms is overhead.
        assert_eq!(t.record(ms(20)), ms(80));
        assert_eq!(t.average_overhead(), ms(20));
    }

    #[test]
    fn test_average_tracks_every_iteration() {
        let mut t = LoopTiming::new(ms(100));
        assert_eq!(t.record(ms(20)), ms(80));
        // 80ms sleep + 40ms predicate → overhead 40, average 30.
        assert_eq!(t.record(ms(120)), ms(70));
        // 70ms sleep + 30ms predicate → overhead 30, average 30.
        assert_eq!(t.record(ms(100)), ms(70));
        assert_eq!(t.loops(), 3);
    }

    #[test]
    fn test_overhead_larger_than_target_clamps_to_zero() {
        let mut t = LoopTiming::new(ms(10));
        assert_eq!(t.record(ms(250)), Duration::ZERO);
        assert_eq!(t.record(ms(250)), Duration::ZERO);
    }

    #[test]
    fn test_early_wakeup_is_not_negative_overhead() {
        let mut t = LoopTiming::new(ms(100));
        assert_eq!(t.record(Duration::ZERO), ms(100));
        // Iteration shorter than the previous delay counts as zero overhead.
        assert_eq!(t.record(ms(60)), ms(100));
        assert_eq!(t.average_overhead(), Duration::ZERO);
    }

    #[test]
    fn test_zero_target_is_busy_polling() {
        let mut t = LoopTiming::new(Duration::ZERO);
        assert_eq!(t.record(ms(5)), Duration::ZERO);
        assert_eq!(t.target(), Duration::ZERO);
    }

    #[test]
    fn test_independent_accumulators_do_not_share_state() {
        let mut fast = LoopTiming::new(ms(50));
        let mut slow = LoopTiming::new(ms(500));
        for _ in 0..5 {
            fast.record(ms(60));
        }
        assert_eq!(slow.record(ms(10)), ms(490));
        assert_eq!(slow.loops(), 1);
        assert_eq!(fast.loops(), 5);
    }
}

//! # Poller configuration.
//!
//! Provides [`PollConfig`] centralized settings for the polling engine.
//!
//! Config is used in two ways:
//! 1. **Poller creation**: `Poller::new(config, observers)`
//! 2. **Request defaults**: `PollRequest::with_defaults(op, &config)`
//!
//! ## Sentinel values
//! - `interval = 0s` → busy polling (no sleep between evaluations)
//! - `watchdog_cadence = 0s` → clamped to 1ms (a zero tick period is invalid)

use std::time::Duration;

/// Smallest watchdog tick period accepted by the engine.
const MIN_WATCHDOG_CADENCE: Duration = Duration::from_millis(1);

/// Configuration for the polling engine.
///
/// ## Field semantics
/// - `watchdog_cadence`: how often the watchdog checks cancellation/lifecycle
/// - `interval`: default target poll interval for requests built from config
/// - `trace_iterations`: emit one `PollIteration` event per loop
/// - `probe_diagnostics`: call the operation's diagnostic probe for trace events
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Fixed period of the watchdog, independent of the request's interval.
    ///
    /// Bounds how long a caller stays blocked after cancellation while the
    /// poll loop sleeps through a long interval.
    pub watchdog_cadence: Duration,

    /// Default target interval between predicate evaluations.
    ///
    /// Used by `PollRequest::with_defaults()`. Can be overridden per request.
    pub interval: Duration,

    /// Emit a `PollIteration` event for every evaluation that reports "still running".
    pub trace_iterations: bool,

    /// Call `Operation::describe` to attach a status string to iteration events.
    ///
    /// Ignored when `trace_iterations` is off. Probes may perform device I/O.
    pub probe_diagnostics: bool,
}

impl PollConfig {
    /// Returns the watchdog cadence clamped to a minimum of 1ms.
    #[inline]
    pub fn watchdog_cadence_clamped(&self) -> Duration {
        self.watchdog_cadence.max(MIN_WATCHDOG_CADENCE)
    }

    /// Returns `true` when the diagnostic probe should run for trace events.
    #[inline]
    pub fn probe_enabled(&self) -> bool {
        self.trace_iterations && self.probe_diagnostics
    }
}

impl Default for PollConfig {
    /// Default configuration:
    ///
    /// - `watchdog_cadence = 100ms`
    /// - `interval = 100ms`
    /// - `trace_iterations = true`
    /// - `probe_diagnostics = true`
    fn default() -> Self {
        Self {
            watchdog_cadence: Duration::from_millis(100),
            interval: Duration::from_millis(100),
            trace_iterations: true,
            probe_diagnostics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cadence_is_clamped() {
        let cfg = PollConfig {
            watchdog_cadence: Duration::ZERO,
            ..PollConfig::default()
        };
        assert_eq!(cfg.watchdog_cadence_clamped(), Duration::from_millis(1));
    }

    #[test]
    fn test_probe_requires_tracing() {
        let mut cfg = PollConfig::default();
        assert!(cfg.probe_enabled());
        cfg.trace_iterations = false;
        assert!(!cfg.probe_enabled());
    }
}

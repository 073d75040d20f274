//! Clock and timing utilities for frame sampling.
//!
//! The monitor anchors all scheduling decisions to a monotonic clock epoch
//! recorded when sampling starts. This module provides utilities for:
//! - Capturing the epoch
//! - Elapsed-time queries for the sampling loop
//! - The rate gate that limits frame processing to the configured Hz

use std::time::Instant;

/// A monitor clock that provides monotonic timestamps relative to a fixed
/// epoch (the moment the monitor started sampling).
#[derive(Debug, Clone)]
pub struct MonitorClock {
    /// The instant sampling started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl MonitorClock {
    /// Create a new monitor clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since sampling start.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Get seconds elapsed since sampling start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at sampling start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Rate gate for the frame-sampling loop.
///
/// The gate turns a stream of repaint-cadence ticks into sampled frames at
/// the target Hz: a tick fires only when a full interval has elapsed since
/// the last fired tick, and the marker resets to the firing tick. The marker
/// is primed at construction, so the first frame fires one full interval
/// after start; a slow frame simply delays the next fire rather than
/// queueing missed ones.
#[derive(Debug)]
pub struct RateGate {
    target_interval_ns: u64,
    last_fire_ns: u64,
}

impl RateGate {
    /// Create a gate targeting the given Hz rate, primed at `now_ns`.
    pub fn new(target_hz: u32, now_ns: u64) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz as u64,
            last_fire_ns: now_ns,
        }
    }

    /// Check if enough time has passed for the next frame.
    /// Returns true and resets the marker if so.
    pub fn should_fire(&mut self, now_ns: u64) -> bool {
        if now_ns >= self.last_fire_ns + self.target_interval_ns {
            self.last_fire_ns = now_ns;
            true
        } else {
            false
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = MonitorClock::start();
        // Should be very small but non-negative
        assert!(clock.elapsed_ns() < 1_000_000_000); // less than 1 second
    }

    #[test]
    fn test_epoch_wall_is_rfc3339() {
        let clock = MonitorClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }

    #[test]
    fn test_rate_gate_is_primed_at_construction() {
        let mut gate = RateGate::new(2, 0); // 500ms interval
        assert!(!gate.should_fire(0)); // primed marker, no immediate fire
        assert!(!gate.should_fire(400_000_000)); // too soon
        assert!(gate.should_fire(500_000_000)); // one interval elapsed
        assert!(!gate.should_fire(600_000_000)); // marker reset at 500ms
        assert!(gate.should_fire(1_000_000_000));
    }

    #[test]
    fn test_rate_gate_skips_missed_intervals() {
        let mut gate = RateGate::new(5, 0); // 200ms interval
        // A slow frame held the loop for 3 intervals; only one fire results.
        assert!(gate.should_fire(700_000_000));
        assert!(!gate.should_fire(700_000_001));
        assert!(gate.should_fire(900_000_000));
    }

    #[test]
    fn test_rate_gate_interval() {
        let gate = RateGate::new(4, 0);
        assert_eq!(gate.interval_ns(), 250_000_000);
    }
}

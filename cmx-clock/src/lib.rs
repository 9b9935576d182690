//! Clock abstraction for CMX.
//!
//! Provides a trait for reading the current time in milliseconds, with
//! real and mock implementations so elapsed-time measurement is
//! deterministic under test.

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for reading the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time as Unix milliseconds since epoch.
    fn now_unix_ms(&self) -> u64;
}

/// Elapsed seconds between two clock readings.
///
/// Saturates at zero if the clock moved backwards between readings.
pub fn elapsed_secs(start_ms: u64, end_ms: u64) -> f64 {
    end_ms.saturating_sub(start_ms) as f64 / 1000.0
}

/// Real system clock implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64
    }
}

/// Mock clock for testing with a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct MockClock {
    timestamp_ms: u64,
}

impl MockClock {
    /// Create a mock clock with a fixed timestamp in milliseconds.
    pub fn new(timestamp_ms: u64) -> Self {
        Self { timestamp_ms }
    }
}

impl Clock for MockClock {
    fn now_unix_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

/// Mock clock that auto-advances time on each call.
///
/// Useful for testing elapsed-time brackets: consecutive readings
/// differ by a known increment.
#[derive(Debug)]
pub struct AdvancingClock {
    timestamp_ms: std::sync::atomic::AtomicU64,
    increment_ms: u64,
}

impl AdvancingClock {
    /// Create an advancing clock starting at `timestamp_ms` and
    /// incrementing by `increment_ms` each call.
    pub fn new(timestamp_ms: u64, increment_ms: u64) -> Self {
        Self {
            timestamp_ms: std::sync::atomic::AtomicU64::new(timestamp_ms),
            increment_ms,
        }
    }
}

impl Clock for AdvancingClock {
    fn now_unix_ms(&self) -> u64 {
        self.timestamp_ms
            .fetch_add(self.increment_ms, std::sync::atomic::Ordering::SeqCst)
    }
}

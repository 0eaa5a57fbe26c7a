//! Heartbeat tracking.
//!
//! The co2mon daemon bumps `heartbeat` once per physical measurement cycle and
//! stores a Unix timestamp (seconds) in it. Re-reading the data directory
//! between two cycles returns the same heartbeat, and those re-reads must not
//! produce duplicate samples downstream.

use std::cmp::Ordering;

use co2sight_common::NumericValue;

/// Outcome of comparing a freshly read heartbeat with the last accepted one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeartbeatCheck {
    /// Strictly newer than anything accepted so far (or the first one seen).
    New,
    /// Not newer than `last_seen`.
    Stale { last_seen: NumericValue },
}

/// Last heartbeat accepted as a new sample.
///
/// Never persisted: a restarted bridge starts over with no heartbeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeartbeatState {
    last_seen: Option<NumericValue>,
}

impl HeartbeatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seen(&self) -> Option<NumericValue> {
        self.last_seen
    }

    /// Compare `heartbeat` against the last accepted value without updating.
    pub fn check(&self, heartbeat: NumericValue) -> HeartbeatCheck {
        match self.last_seen {
            Some(last_seen) if heartbeat.partial_cmp(&last_seen) != Some(Ordering::Greater) => {
                HeartbeatCheck::Stale { last_seen }
            }
            _ => HeartbeatCheck::New,
        }
    }

    /// Record `heartbeat` as accepted.
    ///
    /// Values that do not advance the state are ignored, keeping `last_seen`
    /// monotonically non-decreasing.
    pub fn accept(&mut self, heartbeat: NumericValue) {
        if self.check(heartbeat) == HeartbeatCheck::New {
            self.last_seen = Some(heartbeat);
        }
    }
}

/// Convert a heartbeat (Unix epoch seconds) to a sample timestamp in
/// milliseconds.
pub fn heartbeat_to_millis(heartbeat: NumericValue) -> i64 {
    match heartbeat {
        NumericValue::Integer(secs) => secs.saturating_mul(1000),
        NumericValue::Float(secs) => (secs * 1000.0).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heartbeat_is_new() {
        let state = HeartbeatState::new();
        assert_eq!(state.check(NumericValue::Integer(5)), HeartbeatCheck::New);
        assert_eq!(state.last_seen(), None);
    }

    #[test]
    fn test_equal_and_older_are_stale() {
        let mut state = HeartbeatState::new();
        state.accept(NumericValue::Integer(7));

        assert_eq!(
            state.check(NumericValue::Integer(7)),
            HeartbeatCheck::Stale {
                last_seen: NumericValue::Integer(7)
            }
        );
        assert!(matches!(
            state.check(NumericValue::Integer(6)),
            HeartbeatCheck::Stale { .. }
        ));
        assert_eq!(state.check(NumericValue::Integer(8)), HeartbeatCheck::New);
    }

    #[test]
    fn test_accept_never_goes_backwards() {
        let mut state = HeartbeatState::new();
        state.accept(NumericValue::Integer(9));
        state.accept(NumericValue::Integer(3));

        assert_eq!(state.last_seen(), Some(NumericValue::Integer(9)));
    }

    #[test]
    fn test_mixed_integer_and_float_heartbeats() {
        let mut state = HeartbeatState::new();
        state.accept(NumericValue::Integer(100));

        assert_eq!(state.check(NumericValue::Float(100.5)), HeartbeatCheck::New);
        assert!(matches!(
            state.check(NumericValue::Float(100.0)),
            HeartbeatCheck::Stale { .. }
        ));
    }

    #[test]
    fn test_heartbeat_to_millis() {
        assert_eq!(
            heartbeat_to_millis(NumericValue::Integer(1_449_000_000)),
            1_449_000_000_000
        );
        assert_eq!(
            heartbeat_to_millis(NumericValue::Float(1_449_000_000.25)),
            1_449_000_000_250
        );
    }
}

//! Per-corner firing debounce

use std::time::{Duration, Instant};

use crate::actions::catalog::is_debounce_exempt;

/// Minimum-delay gate shared by all triggers of one corner instance
///
/// The gate exists to stop a human double-activation of the same physical
/// region, so it is keyed per instance, not per trigger. Actions on the
/// catalog's exemption list represent analog repeat gestures and always
/// pass. Time is injected by the caller so tests stay deterministic.
#[derive(Debug)]
pub struct DebounceGate {
    delay: Duration,
    last_fired: Option<Instant>,
}

impl DebounceGate {
    /// Gate with the configured minimum delay
    pub fn new(delay: Duration) -> Self {
        Self { delay, last_fired: None }
    }

    /// May `action` fire at `now`? Permitting resets the timestamp.
    pub fn permitted(&mut self, now: Instant, action: &str) -> bool {
        let allowed = is_debounce_exempt(action)
            || match self.last_fired {
                None => true,
                Some(last) => now.duration_since(last) >= self.delay,
            };
        if allowed {
            self.last_fired = Some(now);
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fire_is_always_permitted() {
        let mut gate = DebounceGate::new(Duration::from_millis(350));
        assert!(gate.permitted(Instant::now(), "close-win"));
    }

    #[test]
    fn test_refire_suppressed_inside_the_window() {
        let mut gate = DebounceGate::new(Duration::from_millis(350));
        let t0 = Instant::now();
        assert!(gate.permitted(t0, "close-win"));
        assert!(!gate.permitted(t0 + Duration::from_millis(349), "close-win"));
        // Exactly at the delay the window has elapsed
        assert!(gate.permitted(t0 + Duration::from_millis(350), "close-win"));
    }

    #[test]
    fn test_gate_is_shared_across_actions_of_one_instance() {
        let mut gate = DebounceGate::new(Duration::from_millis(350));
        let t0 = Instant::now();
        assert!(gate.permitted(t0, "close-win"));
        // A different (non-exempt) action on the same corner is still gated
        assert!(!gate.permitted(t0 + Duration::from_millis(10), "minimize-win"));
    }

    #[test]
    fn test_exempt_actions_refire_at_any_rate() {
        let mut gate = DebounceGate::new(Duration::from_millis(350));
        let t0 = Instant::now();
        for i in 0..10 {
            assert!(gate.permitted(t0 + Duration::from_millis(i), "volume-up"));
        }
    }
}

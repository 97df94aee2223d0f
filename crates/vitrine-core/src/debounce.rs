//! Debounce controller for the search input.
//!
//! Rapid successive invocations collapse into one: each submission re-arms
//! a quiet-period timer and replaces the pending value, and the action
//! fires once with the latest value only after input has been quiet for the
//! full period. Only one timer is ever armed, so a stale filter result can
//! never overwrite a fresher one.
//!
//! Time is passed in by the caller rather than sampled internally, which
//! keeps the state machine deterministic and lets tests drive the clock
//! without sleeping. The event loop calls `poll` each tick.

use std::time::{Duration, Instant};

/// Default quiet period between the last keystroke and the filter firing.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// State machine: Idle until a submission arms the timer, Pending until the
/// timer runs out uninterrupted.
#[derive(Debug)]
enum State<T> {
    Idle,
    Pending { value: T, armed_at: Instant },
}

/// Collapses bursts of submissions into a single deferred value.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    state: State<T>,
}

impl<T> Debouncer<T> {
    /// Create a controller with the default 300 ms quiet period.
    pub fn new() -> Self {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    /// Create a controller with a custom quiet period.
    pub fn with_quiet_period(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            state: State::Idle,
        }
    }

    /// The configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Submit a value at time `now`.
    ///
    /// Arms the timer if idle; if already pending, the window resets and
    /// the previous pending value is discarded.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.state = State::Pending {
            value,
            armed_at: now,
        };
    }

    /// Fire the pending value if the quiet period has elapsed.
    ///
    /// Returns `Some` at most once per armed window, then returns to Idle.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let elapsed = match &self.state {
            State::Pending { armed_at, .. } => now.duration_since(*armed_at),
            State::Idle => return None,
        };
        if elapsed < self.quiet {
            return None;
        }
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Pending { value, .. } => Some(value),
            State::Idle => None,
        }
    }

    /// Whether a timer is currently armed.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_poll_is_none() {
        let mut d: Debouncer<String> = Debouncer::new();
        assert!(!d.is_pending());
        assert_eq!(d.poll(Instant::now()), None);
    }

    #[test]
    fn test_single_submit_fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();

        d.submit("cat", t0);
        assert!(d.is_pending());

        assert_eq!(d.poll(t0 + ms(299)), None);
        assert_eq!(d.poll(t0 + ms(300)), Some("cat"));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_burst_fires_once_with_latest_value() {
        // events at t=0, 100, 150; each resets the 300 ms window, so the
        // single fire happens at t=450 carrying the t=150 value
        let t0 = Instant::now();
        let mut d = Debouncer::new();

        d.submit("c", t0);
        d.submit("ca", t0 + ms(100));
        d.submit("cat", t0 + ms(150));

        assert_eq!(d.poll(t0 + ms(300)), None);
        assert_eq!(d.poll(t0 + ms(449)), None);
        assert_eq!(d.poll(t0 + ms(450)), Some("cat"));

        // fired exactly once; the window is spent
        assert_eq!(d.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn test_submit_after_fire_rearms() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();

        d.submit("cat", t0);
        assert_eq!(d.poll(t0 + ms(300)), Some("cat"));

        d.submit("dog", t0 + ms(400));
        assert_eq!(d.poll(t0 + ms(699)), None);
        assert_eq!(d.poll(t0 + ms(700)), Some("dog"));
    }

    #[test]
    fn test_custom_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::with_quiet_period(ms(50));

        d.submit(7u32, t0);
        assert_eq!(d.poll(t0 + ms(49)), None);
        assert_eq!(d.poll(t0 + ms(50)), Some(7));
    }
}

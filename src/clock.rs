use std::time::{Duration, Instant};

/// Fixed-cadence tick schedule.
///
/// The clock never calls into the game; a driver loop asks it whether a tick
/// is due and marks the tick once it has run one.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    interval: Duration,
    last_tick: Instant,
}

impl TickClock {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    #[must_use]
    pub fn from_millis(interval_ms: u64, now: Instant) -> Self {
        Self::new(Duration::from_millis(interval_ms), now)
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true once a full interval has elapsed since the last tick.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.interval
    }

    /// Records that a tick ran at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Restarts the schedule, e.g. when a new session begins.
    pub fn reset(&mut self, now: Instant) {
        self.mark(now);
    }

    /// Returns how long to wait before the next tick is due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::TickClock;

    #[test]
    fn tick_is_due_after_one_interval() {
        let start = Instant::now();
        let mut clock = TickClock::from_millis(100, start);

        assert!(!clock.due(start));
        assert!(!clock.due(start + Duration::from_millis(99)));
        assert!(clock.due(start + Duration::from_millis(100)));

        clock.mark(start + Duration::from_millis(100));
        assert!(!clock.due(start + Duration::from_millis(150)));
    }

    #[test]
    fn time_until_due_counts_down_and_saturates() {
        let start = Instant::now();
        let clock = TickClock::from_millis(100, start);

        assert_eq!(clock.time_until_due(start), Duration::from_millis(100));
        assert_eq!(
            clock.time_until_due(start + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
        assert_eq!(
            clock.time_until_due(start + Duration::from_millis(400)),
            Duration::ZERO
        );
    }

    #[test]
    fn reset_restarts_the_interval() {
        let start = Instant::now();
        let mut clock = TickClock::from_millis(50, start);

        let later = start + Duration::from_millis(500);
        clock.reset(later);

        assert!(!clock.due(later));
        assert_eq!(clock.interval(), Duration::from_millis(50));
    }
}

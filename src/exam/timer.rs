use std::time::{Duration, Instant};

/// Turns the event loop's coarse ticks into whole exam seconds.
///
/// The event thread wakes several times per second; each wake-up asks the timer how
/// many one-second ticks are due. Time that has not yet added up to a full second is
/// carried over, so the countdown neither drifts nor skips. Callers pass `now`, which
/// lets tests run on a virtual clock.
pub struct ExamTimer {
    period: Duration,
    anchor: Option<Instant>,
    cancelled: bool,
}

impl ExamTimer {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            anchor: None,
            cancelled: false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if !self.cancelled {
            self.anchor = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some() && !self.cancelled
    }

    /// Number of exam ticks owed since the last call.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        if self.cancelled || self.period.is_zero() {
            return 0;
        }
        let Some(anchor) = self.anchor else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(anchor);
        let ticks = (elapsed.as_nanos() / self.period.as_nanos()) as u32;
        if ticks > 0 {
            self.anchor = Some(anchor + self.period * ticks);
        }
        ticks
    }

    /// Stop for good. Returns `true` only for the call that actually stopped it.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        self.anchor = None;
        true
    }
}

impl Default for ExamTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_yields_nothing() {
        let mut timer = ExamTimer::new();
        assert_eq!(timer.due_ticks(Instant::now()), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn carries_partial_seconds() {
        let t0 = Instant::now();
        let mut timer = ExamTimer::new();
        timer.start(t0);
        assert_eq!(timer.due_ticks(t0 + Duration::from_millis(700)), 0);
        assert_eq!(timer.due_ticks(t0 + Duration::from_millis(1400)), 1);
        assert_eq!(timer.due_ticks(t0 + Duration::from_millis(1900)), 0);
        assert_eq!(timer.due_ticks(t0 + Duration::from_millis(2000)), 1);
    }

    #[test]
    fn catches_up_after_a_stall() {
        let t0 = Instant::now();
        let mut timer = ExamTimer::new();
        timer.start(t0);
        assert_eq!(timer.due_ticks(t0 + Duration::from_millis(3500)), 3);
        assert_eq!(timer.due_ticks(t0 + Duration::from_millis(4000)), 1);
    }

    #[test]
    fn cancel_happens_once_and_stops_ticks() {
        let t0 = Instant::now();
        let mut timer = ExamTimer::new();
        timer.start(t0);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.due_ticks(t0 + Duration::from_secs(10)), 0);
        timer.start(t0);
        assert!(!timer.is_running());
    }
}

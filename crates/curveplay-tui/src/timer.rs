//! Deadline-based interval timer polled from the main loop.

use std::time::{Duration, Instant};

use curveplay_core::Scheduler;

#[derive(Debug, Default)]
pub struct IntervalTimer {
    interval: Option<Duration>,
    next_due: Option<Instant>,
    last_fired: Option<Instant>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_scheduled(&self) -> bool {
        self.interval.is_some()
    }

    /// Start firing every `interval`, counting from `now`
    pub fn schedule_at(&mut self, interval: Duration, now: Instant) {
        self.interval = Some(interval);
        self.next_due = Some(now + interval);
        self.last_fired = Some(now);
    }

    /// Seconds since the previous firing if the timer is due at `now`.
    /// Missed deadlines are collapsed into a single firing.
    pub fn due(&mut self, now: Instant) -> Option<f64> {
        let interval = self.interval?;
        let deadline = self.next_due?;
        if now < deadline {
            return None;
        }

        let last = self.last_fired.unwrap_or(deadline - interval);
        let mut next = deadline + interval;
        if next <= now {
            next = now + interval;
        }
        self.next_due = Some(next);
        self.last_fired = Some(now);
        Some(now.saturating_duration_since(last).as_secs_f64())
    }

    /// How long the main loop may block before the timer needs service
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .filter(|_| self.interval.is_some())
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Scheduler for IntervalTimer {
    fn schedule_interval(&mut self, interval: Duration) {
        self.schedule_at(interval, Instant::now());
    }

    fn unschedule(&mut self) {
        self.interval = None;
        self.next_due = None;
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_fires_only_when_due() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.schedule_at(MS * 100, start);

        assert_eq!(timer.due(start + MS * 50), None);
        let dt = timer.due(start + MS * 100).unwrap();
        assert!((dt - 0.1).abs() < 1e-9);
        assert_eq!(timer.due(start + MS * 150), None);
        let dt = timer.due(start + MS * 210).unwrap();
        assert!((dt - 0.11).abs() < 1e-9);
    }

    #[test]
    fn test_missed_deadlines_fire_once() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.schedule_at(MS * 10, start);

        assert!(timer.due(start + MS * 1000).is_some());
        assert_eq!(timer.due(start + MS * 1005), None);
        assert_eq!(timer.time_until_due(start + MS * 1005), Some(MS * 5));
    }

    #[test]
    fn test_unschedule_stops_firing() {
        let start = Instant::now();
        let mut timer = IntervalTimer::new();
        timer.schedule_at(MS * 10, start);
        timer.unschedule();

        assert!(!timer.is_scheduled());
        assert_eq!(timer.due(start + MS * 100), None);
        assert_eq!(timer.time_until_due(start), None);
    }
}

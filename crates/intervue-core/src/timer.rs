//! Per-question countdown timer.
//!
//! The timer is deterministic: it holds the remaining seconds and reacts to
//! explicit [`CountdownTimer::tick`] calls, so the one-second cadence is
//! supplied by the driver (an interval in the CLI, plain calls in tests).
//! At most one countdown exists per session because the engine owns exactly
//! one timer; starting a new countdown replaces the previous one.

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// No countdown is running; the tick is ignored.
    Idle,
    /// The countdown decremented; remaining seconds attached.
    Running(u32),
    /// The countdown just reached zero. Produced exactly once; the timer
    /// stops itself.
    Expired,
}

/// A one-second-resolution countdown with pause/resume support.
#[derive(Debug, Clone, Default)]
pub struct CountdownTimer {
    remaining: u32,
    running: bool,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a countdown of `duration` seconds, replacing any previous one.
    pub fn start(&mut self, duration: u32) {
        self.remaining = duration;
        self.running = true;
    }

    /// Halts the countdown without expiring it. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining seconds of the current (or stopped) countdown.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires_exactly_once() {
        let mut timer = CountdownTimer::new();
        timer.start(60);

        let mut expirations = 0;
        for i in 1..=60u32 {
            match timer.tick() {
                TimerTick::Running(remaining) => assert_eq!(remaining, 60 - i),
                TimerTick::Expired => {
                    assert_eq!(i, 60);
                    expirations += 1;
                }
                TimerTick::Idle => panic!("timer went idle mid-countdown"),
            }
        }
        assert_eq!(expirations, 1);

        // No ticks after remaining reached zero.
        assert_eq!(timer.tick(), TimerTick::Idle);
        assert_eq!(timer.tick(), TimerTick::Idle);
    }

    #[test]
    fn stop_is_idempotent_and_suppresses_expiry() {
        let mut timer = CountdownTimer::new();
        timer.start(1);
        timer.stop();
        timer.stop();
        assert_eq!(timer.tick(), TimerTick::Idle);
        assert_eq!(timer.remaining(), 1);
    }

    #[test]
    fn pause_then_resume_keeps_remaining_unchanged() {
        let mut timer = CountdownTimer::new();
        timer.start(30);
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining(), 28);

        timer.stop();
        let persisted = timer.remaining();
        timer.start(persisted);
        assert_eq!(timer.remaining(), 28);
        assert_eq!(timer.tick(), TimerTick::Running(27));
    }

    #[test]
    fn starting_replaces_previous_countdown() {
        let mut timer = CountdownTimer::new();
        timer.start(60);
        timer.tick();
        timer.start(180);
        assert_eq!(timer.remaining(), 180);
        assert_eq!(timer.tick(), TimerTick::Running(179));
    }

    #[test]
    fn one_second_countdown_expires_on_first_tick() {
        let mut timer = CountdownTimer::new();
        timer.start(1);
        assert_eq!(timer.tick(), TimerTick::Expired);
        assert_eq!(timer.tick(), TimerTick::Idle);
    }
}

use std::time::{Duration, Instant};

/// Converts wall time into a number of due ticks at a fixed rate.
///
/// Time is accumulated between calls and paid out in whole tick intervals.
/// Payouts are capped at `max_catch_up` per call so that a stall (debugger,
/// suspended laptop) does not turn into a burst of hundreds of flushes; the
/// excess is dropped.
#[derive(Debug, Clone)]
pub struct TickPacer {
    last: Instant,
    interval: Duration,
    accumulated: Duration,
    max_catch_up: u32,
    tick_index: u64,
}

impl TickPacer {
    /// Default catch-up cap, in ticks.
    pub const DEFAULT_MAX_CATCH_UP: u32 = 4;

    /// Pacer for `tick_rate` ticks per second (0 is treated as 1).
    pub fn new(tick_rate: u32) -> Self {
        Self::with_max_catch_up(tick_rate, Self::DEFAULT_MAX_CATCH_UP)
    }

    pub fn with_max_catch_up(tick_rate: u32, max_catch_up: u32) -> Self {
        Self {
            last: Instant::now(),
            interval: Duration::from_secs(1) / tick_rate.max(1),
            accumulated: Duration::ZERO,
            max_catch_up: max_catch_up.max(1),
            tick_index: 0,
        }
    }

    /// Length of one tick.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks paid out so far.
    #[inline]
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Resets the baseline and forgets accumulated time.
    ///
    /// Useful when resuming after the host deliberately paused.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.accumulated = Duration::ZERO;
    }

    /// Measures time since the previous call and returns the ticks now due.
    pub fn advance(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance_by(elapsed)
    }

    /// Adds `elapsed` and returns the ticks now due.
    pub fn advance_by(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut due = 0;
        while self.accumulated >= self.interval && due < self.max_catch_up {
            self.accumulated -= self.interval;
            due += 1;
        }
        if due == self.max_catch_up && self.accumulated >= self.interval {
            log::debug!(
                "tick pacer dropped {:?} after catching up {} ticks",
                self.accumulated,
                due,
            );
            self.accumulated = Duration::ZERO;
        }

        self.tick_index = self.tick_index.wrapping_add(u64::from(due));
        due
    }

    /// Time left until the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.interval.saturating_sub(self.accumulated)
    }
}

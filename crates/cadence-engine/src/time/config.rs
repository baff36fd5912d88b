use std::time::Duration;

/// Tick rate assumed when converting delays into frame counts.
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

/// Shortest delay a timer accepts; anything below is raised to it.
pub const MIN_DELAY: Duration = Duration::from_millis(1);

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Scheduler configuration.
///
/// `frames_per_second` is the cadence the host promises to call
/// [`Scheduler::flush`](super::Scheduler::flush) at. It only affects how
/// delays convert to tick counts; nothing measures real time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SchedulerConfig {
    pub frames_per_second: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
        }
    }
}

impl SchedulerConfig {
    /// Copy with a zero frame rate raised to 1.
    pub fn normalized(self) -> Self {
        Self {
            frames_per_second: self.frames_per_second.max(1),
        }
    }
}

pub(crate) fn clamp_delay(delay: Duration) -> Duration {
    delay.max(MIN_DELAY)
}

/// Number of ticks spanning `delay` at `frames_per_second`, rounded up.
///
/// Integer math on nanoseconds, so exact multiples stay exact
/// (`50ms` at 60 fps is 3 ticks). Never returns less than 1.
pub fn frames_for_delay(delay: Duration, frames_per_second: u32) -> u64 {
    let fps = u128::from(frames_per_second.max(1));
    let frames = (delay.as_nanos() * fps).div_ceil(NANOS_PER_SECOND);
    u64::try_from(frames).unwrap_or(u64::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── frames_for_delay ──────────────────────────────────────────────────

    #[test]
    fn one_second_is_sixty_frames() {
        assert_eq!(frames_for_delay(ms(1000), 60), 60);
    }

    #[test]
    fn exact_multiples_do_not_round_up() {
        assert_eq!(frames_for_delay(ms(50), 60), 3);
        assert_eq!(frames_for_delay(ms(500), 60), 30);
    }

    #[test]
    fn partial_frames_round_up() {
        assert_eq!(frames_for_delay(ms(16), 60), 1);
        assert_eq!(frames_for_delay(ms(17), 60), 2);
        assert_eq!(frames_for_delay(ms(1001), 60), 61);
    }

    #[test]
    fn zero_delay_still_takes_one_frame() {
        assert_eq!(frames_for_delay(Duration::ZERO, 60), 1);
    }

    #[test]
    fn custom_and_zero_frame_rates() {
        assert_eq!(frames_for_delay(ms(1000), 30), 30);
        assert_eq!(frames_for_delay(ms(1000), 144), 144);
        assert_eq!(frames_for_delay(ms(2500), 0), 3);
    }

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn clamp_delay_raises_to_minimum() {
        assert_eq!(clamp_delay(Duration::ZERO), MIN_DELAY);
        assert_eq!(clamp_delay(Duration::from_micros(500)), MIN_DELAY);
        assert_eq!(clamp_delay(ms(20)), ms(20));
    }

    #[test]
    fn normalized_config_has_positive_rate() {
        let cfg = SchedulerConfig { frames_per_second: 0 }.normalized();
        assert_eq!(cfg.frames_per_second, 1);
        assert_eq!(SchedulerConfig::default().normalized().frames_per_second, 60);
    }
}

//! Time subsystem.
//!
//! Frame-counting timers. Nothing here reads a clock: one call to
//! [`Scheduler::flush`] is one tick, and delays are converted into tick counts
//! using the configured frames per second.
//! Intended usage:
//! - one `Scheduler` per host loop
//! - call `flush()` once per presented frame
//! - `kill()` every timer you are done with; dropping the handle is not enough

mod config;
mod scheduler;
mod timer;

pub use config::{frames_for_delay, SchedulerConfig, DEFAULT_FRAMES_PER_SECOND, MIN_DELAY};
pub use scheduler::Scheduler;
pub use timer::Timer;

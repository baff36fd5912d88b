//! Cadence engine crate.
//!
//! Frame-driven timers on top of a listener dispatcher. The host owns the
//! loop and calls [`Scheduler::flush`] once per tick; timers convert their
//! delay into a tick count and fire [`EventType::Timer`] /
//! [`EventType::TimerComplete`] through their own [`EventDispatcher`].
//!
//! ```
//! use std::time::Duration;
//! use cadence_engine::{EventType, Listener, Scheduler};
//!
//! let scheduler = Scheduler::new();
//! let countdown = scheduler.create_timer(Duration::from_millis(1000), 3);
//!
//! let handle = countdown.clone();
//! countdown
//!     .add_event_listener(EventType::TimerComplete, &Listener::new(move |_| handle.kill()))
//!     .unwrap();
//! countdown.start();
//!
//! for _ in 0..180 {
//!     scheduler.flush();
//! }
//! assert!(scheduler.is_empty());
//! ```

pub mod error;
pub mod event;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
pub use event::{
    Event, EventCategory, EventData, EventDispatcher, EventType, Listener, PointerInterest,
    TargetId,
};
pub use time::{Scheduler, SchedulerConfig, Timer};

//! Event subsystem.
//!
//! [`EventDispatcher`] is a capability, not a base type: anything that wants
//! listeners holds one and forwards the calls it wants to expose (see
//! [`crate::time::Timer`]).
//!
//! Typical usage:
//! - keep a clone of every [`Listener`] you may want to remove later
//! - dispatch by type name or [`EventType`], or build an [`Event`] to carry
//!   data or to read `is_default_prevented()` afterwards

mod dispatcher;
mod event;
mod interest;
mod kind;
mod listener;

pub use dispatcher::{EventDispatcher, TargetId};
pub use event::{Event, EventData};
pub use interest::{InterestChange, PointerInterest, PointerInterestCounter};
pub use kind::{EventCategory, EventType, POINTER_PREFIX, TIMER, TIMER_COMPLETE};
pub use listener::Listener;

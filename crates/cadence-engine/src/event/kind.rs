use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name prefix that places a type in [`EventCategory::Pointer`].
pub const POINTER_PREFIX: &str = "onMouse";

/// Name of the event a timer fires once per elapsed interval.
pub const TIMER: &str = "onTimer";

/// Name of the event a finite timer fires after its last interval.
pub const TIMER_COMPLETE: &str = "onTimerComplete";

/// Coarse grouping of event types.
///
/// Pointer registrations are reported to the host's
/// [`PointerInterest`](super::PointerInterest) hook; the other categories are
/// purely informational.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventCategory {
    Pointer,
    Timer,
    Custom,
}

/// Event type tag.
///
/// String names convert through [`EventType::parse`]:
/// - `"onTimer"` / `"onTimerComplete"` → [`Timer`](Self::Timer) /
///   [`TimerComplete`](Self::TimerComplete)
/// - anything starting with `"onMouse"` → [`Pointer`](Self::Pointer)
/// - everything else → [`Custom`](Self::Custom)
///
/// Identity is the name alone: equality, hashing and [`category`](Self::category)
/// all go through [`as_str`](Self::as_str), so `Custom("onTimer".into())` is the
/// same type as `Timer`, and `Pointer("drag".into())` is a custom type.
#[derive(Debug, Clone)]
pub enum EventType {
    Pointer(Cow<'static, str>),
    Timer,
    TimerComplete,
    Custom(Cow<'static, str>),
}

impl EventType {
    /// Classifies `name` into a variant.
    pub fn parse(name: impl Into<Cow<'static, str>>) -> Self {
        let name: Cow<'static, str> = name.into();
        if name == TIMER {
            Self::Timer
        } else if name == TIMER_COMPLETE {
            Self::TimerComplete
        } else if name.starts_with(POINTER_PREFIX) {
            Self::Pointer(name)
        } else {
            Self::Custom(name)
        }
    }

    /// Returns the type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pointer(name) | Self::Custom(name) => name.as_ref(),
            Self::Timer => TIMER,
            Self::TimerComplete => TIMER_COMPLETE,
        }
    }

    pub fn category(&self) -> EventCategory {
        let name = self.as_str();
        if name == TIMER || name == TIMER_COMPLETE {
            EventCategory::Timer
        } else if name.starts_with(POINTER_PREFIX) {
            EventCategory::Pointer
        } else {
            EventCategory::Custom
        }
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        self.category() == EventCategory::Pointer
    }

    /// `true` for a type with an empty name; such types cannot be listened to.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for EventType {
    fn from(name: &'static str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self::parse(name)
    }
}

impl From<&EventType> for EventType {
    fn from(ty: &EventType) -> Self {
        ty.clone()
    }
}

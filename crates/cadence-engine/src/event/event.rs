use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::dispatcher::TargetId;
use super::kind::EventType;

/// Arbitrary payload carried by an [`Event`].
pub type EventData = Rc<dyn Any>;

/// A single dispatched event.
///
/// Created per dispatch and handed to each listener as `&mut Event`. The
/// dispatcher fills in `target` when it is still unset.
#[derive(Clone)]
pub struct Event {
    pub ty: EventType,
    /// Dispatcher that delivered the event, unless the caller set one first.
    pub target: Option<TargetId>,
    pub data: Option<EventData>,
    prevented: bool,
}

impl Event {
    pub fn new(ty: impl Into<EventType>) -> Self {
        Self {
            ty: ty.into(),
            target: None,
            data: None,
            prevented: false,
        }
    }

    /// Attaches `data` as the payload.
    pub fn with_data<T: Any>(mut self, data: T) -> Self {
        self.data = Some(Rc::new(data));
        self
    }

    /// Presets the target; the dispatcher will leave it alone.
    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    /// Borrows the payload as `T`, if there is one of that type.
    pub fn data_as<T: Any>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref::<T>()
    }

    /// Marks the event so that hosts stop forwarding it further.
    ///
    /// Listeners of the current dispatch still run; the dispatcher never
    /// reads this flag.
    #[inline]
    pub fn prevent_default(&mut self) {
        self.prevented = true;
    }

    #[inline]
    pub fn is_default_prevented(&self) -> bool {
        self.prevented
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("ty", &self.ty)
            .field("target", &self.target)
            .field("has_data", &self.data.is_some())
            .field("prevented", &self.prevented)
            .finish()
    }
}

impl From<EventType> for Event {
    fn from(ty: EventType) -> Self {
        Self::new(ty)
    }
}

impl From<&EventType> for Event {
    fn from(ty: &EventType) -> Self {
        Self::new(ty.clone())
    }
}

impl From<&'static str> for Event {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

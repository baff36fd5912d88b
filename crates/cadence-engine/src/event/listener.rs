use std::fmt;
use std::rc::Rc;

use super::event::Event;

type Callback = dyn Fn(&mut Event);

/// A registered callback.
///
/// Cloning shares the callback. Two `Listener`s compare equal only when they
/// are clones of the same [`Listener::new`] call, which is what
/// `remove_event_listener` matches on, so keep a clone around to unregister.
#[derive(Clone)]
pub struct Listener(Rc<Callback>);

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut Event) + 'static,
    {
        Self(Rc::new(callback))
    }

    #[inline]
    pub(crate) fn call(&self, event: &mut Event) {
        (self.0)(event);
    }

    /// Identity comparison (same as `==`).
    #[inline]
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

use super::event::{Event, EventData};
use super::interest::{InterestChange, PointerInterest};
use super::kind::EventType;
use super::listener::Listener;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

// ── TargetId ──────────────────────────────────────────────────────────────

/// Identity of a dispatcher, written into [`Event::target`].
///
/// Allocated once per dispatcher and never reused within a process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    fn next() -> Self {
        TargetId(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── EventDispatcher ───────────────────────────────────────────────────────

/// Type-keyed listener lists with reentrancy-safe dispatch.
///
/// All operations take `&self`, so a listener may add or remove listeners on
/// the dispatcher that is currently invoking it. No internal borrow is held
/// while a listener runs.
///
/// # Slots
///
/// Each type owns a `Vec<Option<Listener>>`, oldest listener first. Removal
/// empties a slot instead of shifting the vector; empty slots are dropped by
/// a compaction that only runs while no dispatch is in progress. Dispatch
/// therefore walks stable indices:
/// - listeners fire oldest first
/// - a listener removed mid-dispatch is skipped if it has not run yet
/// - a listener added mid-dispatch does not run until the next dispatch
pub struct EventDispatcher {
    id: TargetId,
    types: RefCell<HashMap<EventType, Vec<Option<Listener>>>>,
    dispatch_depth: Cell<usize>,
    needs_compaction: Cell<bool>,
    pointer_interest: Option<Rc<dyn PointerInterest>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            id: TargetId::next(),
            types: RefCell::new(HashMap::new()),
            dispatch_depth: Cell::new(0),
            needs_compaction: Cell::new(false),
            pointer_interest: None,
        }
    }

    /// Dispatcher that reports pointer registrations to `hook`.
    pub fn with_pointer_interest(hook: Rc<dyn PointerInterest>) -> Self {
        Self {
            pointer_interest: Some(hook),
            ..Self::new()
        }
    }

    /// Replaces the pointer-interest hook.
    ///
    /// Listeners already registered are not replayed into the new hook.
    pub fn set_pointer_interest(&mut self, hook: Option<Rc<dyn PointerInterest>>) {
        self.pointer_interest = hook;
    }

    #[inline]
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Registers `listener` for `ty`.
    ///
    /// Registering the same listener twice for one type is a no-op.
    /// Fails with [`Error::EmptyEventType`] when the type name is empty.
    pub fn add_event_listener(&self, ty: impl Into<EventType>, listener: &Listener) -> Result<()> {
        let ty: EventType = ty.into();
        if ty.is_empty() {
            log::warn!("dispatcher {}: rejected listener for an empty event type", self.id);
            return Err(Error::EmptyEventType);
        }

        {
            let mut types = self.types.borrow_mut();
            let slots = types.entry(ty.clone()).or_default();
            if slots.iter().flatten().any(|l| l == listener) {
                return Ok(());
            }
            slots.push(Some(listener.clone()));
        }

        if ty.is_pointer() {
            self.notify_pointer_interest(&ty, InterestChange::Increased, 1);
        }
        Ok(())
    }

    /// Unregisters every entry of `listener` under `ty`.
    ///
    /// Unknown types and listeners are ignored.
    pub fn remove_event_listener(&self, ty: impl Into<EventType>, listener: &Listener) {
        let ty: EventType = ty.into();
        let mut removed = Vec::new();
        {
            let mut types = self.types.borrow_mut();
            let Some(slots) = types.get_mut(&ty) else {
                return;
            };
            for slot in slots.iter_mut() {
                if slot.as_ref() == Some(listener) {
                    removed.extend(slot.take());
                }
            }
        }
        if removed.is_empty() {
            return;
        }

        self.needs_compaction.set(true);
        self.compact_if_idle();

        if ty.is_pointer() {
            self.notify_pointer_interest(&ty, InterestChange::Decreased, removed.len());
        }
    }

    /// Unregisters every listener of every type.
    ///
    /// Called from inside a listener, the remaining listeners of the current
    /// dispatch are skipped.
    pub fn remove_all_event_listener(&self) {
        let mut released = Vec::new();
        let mut dropped = Vec::new();
        {
            let mut types = self.types.borrow_mut();
            for (ty, slots) in types.iter_mut() {
                let before = dropped.len();
                dropped.extend(slots.iter_mut().filter_map(Option::take));
                if ty.is_pointer() && dropped.len() > before {
                    released.push((ty.clone(), dropped.len() - before));
                }
            }
        }

        self.needs_compaction.set(true);
        self.compact_if_idle();

        for (ty, count) in &released {
            self.notify_pointer_interest(ty, InterestChange::Decreased, *count);
        }
    }

    /// `true` if `ty` has at least one live listener.
    pub fn has_event_listener(&self, ty: impl Into<EventType>) -> bool {
        self.listener_count(ty) > 0
    }

    pub fn listener_count(&self, ty: impl Into<EventType>) -> usize {
        let ty: EventType = ty.into();
        self.types
            .borrow()
            .get(&ty)
            .map_or(0, |slots| slots.iter().flatten().count())
    }

    /// Wraps `event` (a type or a ready [`Event`]) and dispatches it.
    ///
    /// A `Some` payload replaces whatever `data` the event carried.
    /// Returns `false` when nothing is registered for the type.
    pub fn dispatch_event(&self, event: impl Into<Event>, data: Option<EventData>) -> bool {
        let mut event: Event = event.into();
        if let Some(data) = data {
            event.data = Some(data);
        }
        self.dispatch(&mut event)
    }

    /// Dispatches a caller-owned event, oldest listener first.
    ///
    /// Returns `false` without touching `event` when no listener list exists
    /// for its type. Otherwise sets `event.target` to this dispatcher if
    /// unset, runs the listeners and returns `true`, even if every slot turned
    /// out to be emptied by an earlier reentrant removal.
    pub fn dispatch(&self, event: &mut Event) -> bool {
        let ty = event.ty.clone();
        let len = match self.types.borrow().get(&ty) {
            Some(slots) if !slots.is_empty() => slots.len(),
            _ => return false,
        };

        if event.target.is_none() {
            event.target = Some(self.id);
        }

        let _pass = DispatchPass::enter(self);
        for index in 0..len {
            // Clone out of the borrow so the listener is free to mutate us.
            let listener = self
                .types
                .borrow()
                .get(&ty)
                .and_then(|slots| slots.get(index).cloned().flatten());

            match listener {
                Some(listener) => listener.call(event),
                None => self.needs_compaction.set(true),
            }
        }
        true
    }

    fn notify_pointer_interest(&self, ty: &EventType, change: InterestChange, times: usize) {
        if let Some(hook) = &self.pointer_interest {
            for _ in 0..times {
                hook.pointer_interest_changed(ty, change);
            }
        }
    }

    fn compact_if_idle(&self) {
        if self.dispatch_depth.get() > 0 || !self.needs_compaction.get() {
            return;
        }
        self.needs_compaction.set(false);
        self.types.borrow_mut().retain(|_, slots| {
            slots.retain(Option::is_some);
            !slots.is_empty()
        });
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types.borrow();
        let mut names: Vec<&str> = types.keys().map(EventType::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EventDispatcher")
            .field("id", &self.id)
            .field("types", &names)
            .field("dispatch_depth", &self.dispatch_depth.get())
            .finish()
    }
}

/// Marks one dispatch in progress; compacts on exit from the outermost one.
///
/// Drop-based so that a panicking listener does not leave the dispatcher
/// stuck in "dispatching" mode.
struct DispatchPass<'a> {
    dispatcher: &'a EventDispatcher,
}

impl<'a> DispatchPass<'a> {
    fn enter(dispatcher: &'a EventDispatcher) -> Self {
        dispatcher.dispatch_depth.set(dispatcher.dispatch_depth.get() + 1);
        Self { dispatcher }
    }
}

impl Drop for DispatchPass<'_> {
    fn drop(&mut self) {
        let depth = &self.dispatcher.dispatch_depth;
        depth.set(depth.get() - 1);
        self.dispatcher.compact_if_idle();
    }
}

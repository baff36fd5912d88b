use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::event::{PointerInterest, TargetId};

use super::config::SchedulerConfig;
use super::timer::Timer;

/// Live-timer arena shared between a [`Scheduler`] and its timers.
///
/// Slots keep creation order. A killed timer leaves an empty slot behind;
/// slots are compacted only while no flush is running, so a flush pass can
/// walk indices that never shift under it.
pub(crate) struct Registry {
    config: SchedulerConfig,
    pointer_interest: RefCell<Option<Rc<dyn PointerInterest>>>,
    slots: RefCell<Vec<Option<Timer>>>,
    flush_depth: Cell<usize>,
    needs_compaction: Cell<bool>,
}

impl Registry {
    /// Empties the slot holding `id`. Returns `false` if it was not registered.
    pub(crate) fn remove(&self, id: TargetId) -> bool {
        let removed = {
            let mut slots = self.slots.borrow_mut();
            slots
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|t| t.id() == id))
                .and_then(Option::take)
        };
        // Dropped here, outside the borrow: it may be the last handle.
        let Some(_timer) = removed else {
            return false;
        };
        self.needs_compaction.set(true);
        self.compact_if_idle();
        true
    }

    pub(crate) fn contains(&self, id: TargetId) -> bool {
        self.get(id).is_some()
    }

    fn get(&self, id: TargetId) -> Option<Timer> {
        self.slots
            .borrow()
            .iter()
            .flatten()
            .find(|t| t.id() == id)
            .cloned()
    }

    fn live_count(&self) -> usize {
        self.slots.borrow().iter().flatten().count()
    }

    fn compact_if_idle(&self) {
        if self.flush_depth.get() > 0 || !self.needs_compaction.get() {
            return;
        }
        self.needs_compaction.set(false);
        self.slots.borrow_mut().retain(Option::is_some);
    }
}

/// Owner of the live-timer registry and the per-tick entrypoint.
///
/// A cheap shared handle. The host calls [`flush`](Self::flush) once per
/// tick; application code creates timers through it and hands clones of it
/// to whatever needs to create more. Dropping the last handle releases every
/// registered timer; timer handles held elsewhere stay usable but are no
/// longer updated.
#[derive(Clone)]
pub struct Scheduler(Rc<Registry>);

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self(Rc::new(Registry {
            config: config.normalized(),
            pointer_interest: RefCell::new(None),
            slots: RefCell::new(Vec::new()),
            flush_depth: Cell::new(0),
            needs_compaction: Cell::new(false),
        }))
    }

    #[inline]
    pub fn frames_per_second(&self) -> u32 {
        self.0.config.frames_per_second
    }

    /// Hook handed to the dispatcher of every timer created from now on.
    ///
    /// Pointer-category listeners on those timers are reported to it the same
    /// way a standalone [`EventDispatcher`](crate::EventDispatcher) reports
    /// them. Timers that already exist keep the hook they were created with.
    pub fn set_pointer_interest(&self, hook: Option<Rc<dyn PointerInterest>>) {
        *self.0.pointer_interest.borrow_mut() = hook;
    }

    /// Creates a stopped timer and registers it.
    ///
    /// `delay` below 1ms is raised to 1ms; a negative `repeat_count` means
    /// infinite, same as 0.
    pub fn create_timer(&self, delay: Duration, repeat_count: i64) -> Timer {
        let timer = Timer::new(
            delay,
            repeat_count,
            self.0.config.frames_per_second,
            self.0.pointer_interest.borrow().clone(),
            Rc::downgrade(&self.0),
        );
        self.0.slots.borrow_mut().push(Some(timer.clone()));
        log::debug!(
            "timer {} created: {:?} ({} frames), repeat {}",
            timer.id(),
            timer.delay(),
            timer.frame_delay(),
            timer.repeat_count(),
        );
        timer
    }

    /// Runs one tick: updates every registered timer, newest first.
    ///
    /// Listeners may create, kill, start or stop timers (this scheduler's
    /// included) while the pass runs:
    /// - timers registered when the pass began are updated at most once
    /// - a timer killed before its turn is skipped
    /// - timers created during the pass wait for the next one
    pub fn flush(&self) {
        let registry = &*self.0;
        let len = registry.slots.borrow().len();
        log::trace!("flush over {len} timer slots");

        let _pass = FlushPass::enter(registry);
        for index in (0..len).rev() {
            let timer = registry.slots.borrow().get(index).cloned().flatten();
            match timer {
                Some(timer) => timer.update(),
                None => registry.needs_compaction.set(true),
            }
        }
    }

    /// Looks up a live timer, e.g. from an event's `target`.
    pub fn timer(&self, id: TargetId) -> Option<Timer> {
        self.0.get(id)
    }

    /// Kills every registered timer.
    pub fn kill_all(&self) {
        let killed: Vec<Timer> = self
            .0
            .slots
            .borrow_mut()
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        if killed.is_empty() {
            return;
        }
        log::debug!("killed all {} timers", killed.len());
        self.0.needs_compaction.set(true);
        self.0.compact_if_idle();
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.0.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.0.config)
            .field("live", &self.len())
            .field("flush_depth", &self.0.flush_depth.get())
            .finish()
    }
}

/// Marks one flush in progress; compacts on exit from the outermost one.
struct FlushPass<'a> {
    registry: &'a Registry,
}

impl<'a> FlushPass<'a> {
    fn enter(registry: &'a Registry) -> Self {
        registry.flush_depth.set(registry.flush_depth.get() + 1);
        Self { registry }
    }
}

impl Drop for FlushPass<'_> {
    fn drop(&mut self) {
        let depth = &self.registry.flush_depth;
        depth.set(depth.get() - 1);
        self.registry.compact_if_idle();
    }
}

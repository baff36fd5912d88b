use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::error::Result;
use crate::event::{
    Event, EventData, EventDispatcher, EventType, Listener, PointerInterest, TargetId,
};

use super::config::{clamp_delay, frames_for_delay};
use super::scheduler::Registry;

#[derive(Debug, Copy, Clone)]
struct TimerState {
    delay: Duration,
    frame_delay: u64,
    repeat_count: u32,
    current_count: u32,
    current_frame_delay: u64,
    running: bool,
}

struct TimerInner {
    dispatcher: EventDispatcher,
    state: Cell<TimerState>,
    frames_per_second: u32,
    registry: Weak<Registry>,
}

/// Frame-counting timer.
///
/// Created through [`Scheduler::create_timer`](super::Scheduler::create_timer)
/// and updated by [`Scheduler::flush`](super::Scheduler::flush) until
/// [`kill`](Self::kill)ed. `Timer` is a shared handle: clones refer to the
/// same timer, so listeners can capture one to stop or kill it.
///
/// Every `frame_delay` updates while running, the timer dispatches
/// [`EventType::Timer`]. With a non-zero repeat count it also counts those
/// intervals, and after the last one stops itself and dispatches
/// [`EventType::TimerComplete`]. A repeat count of 0 runs forever.
#[derive(Clone)]
pub struct Timer(Rc<TimerInner>);

impl Timer {
    pub(crate) fn new(
        delay: Duration,
        repeat_count: i64,
        frames_per_second: u32,
        pointer_interest: Option<Rc<dyn PointerInterest>>,
        registry: Weak<Registry>,
    ) -> Self {
        let delay = clamp_delay(delay);
        let state = TimerState {
            delay,
            frame_delay: frames_for_delay(delay, frames_per_second),
            repeat_count: clamp_repeat_count(repeat_count),
            current_count: 0,
            current_frame_delay: 0,
            running: false,
        };
        let mut dispatcher = EventDispatcher::new();
        dispatcher.set_pointer_interest(pointer_interest);
        Self(Rc::new(TimerInner {
            dispatcher,
            state: Cell::new(state),
            frames_per_second,
            registry,
        }))
    }

    /// Identity of this timer; also the `target` of the events it fires.
    #[inline]
    pub fn id(&self) -> TargetId {
        self.0.dispatcher.id()
    }

    // ── control ───────────────────────────────────────────────────────────

    /// Starts or resumes counting.
    ///
    /// A finite timer that already completed restarts its interval count;
    /// the partially elapsed interval is kept either way.
    pub fn start(&self) {
        self.modify(|s| {
            s.running = true;
            if s.current_count == s.repeat_count {
                s.current_count = 0;
            }
        });
        log::debug!("timer {} started", self.id());
    }

    /// Pauses the timer; [`start`](Self::start) resumes where it left off.
    pub fn stop(&self) {
        self.modify(|s| s.running = false);
        log::debug!("timer {} stopped", self.id());
    }

    /// Stops the timer and zeroes both counters.
    pub fn reset(&self) {
        self.modify(|s| {
            s.running = false;
            s.current_count = 0;
            s.current_frame_delay = 0;
        });
    }

    /// Removes the timer from its scheduler. Calling it again does nothing.
    ///
    /// State is untouched; a killed timer can still be driven by calling
    /// [`update`](Self::update) directly, but no flush will reach it.
    pub fn kill(&self) {
        let Some(registry) = self.0.registry.upgrade() else {
            return;
        };
        if registry.remove(self.id()) {
            log::debug!("timer {} killed", self.id());
        }
    }

    /// `true` while the timer is registered with a live scheduler.
    pub fn is_alive(&self) -> bool {
        self.0
            .registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id()))
    }

    /// Advances the timer by one tick.
    ///
    /// Normally called by the scheduler's flush; does nothing while stopped.
    /// Listeners run with no borrow held and may freely call back into this
    /// timer.
    pub fn update(&self) {
        let mut state = self.0.state.get();
        if !state.running {
            return;
        }

        state.current_frame_delay += 1;
        if state.current_frame_delay < state.frame_delay {
            self.0.state.set(state);
            return;
        }

        state.current_frame_delay = 0;
        if state.repeat_count != 0 {
            state.current_count = state.current_count.saturating_add(1);
        }
        self.0.state.set(state);
        self.0.dispatcher.dispatch_event(EventType::Timer, None);

        // Re-read: TIMER listeners may have reset or reconfigured us.
        let state = self.0.state.get();
        if state.repeat_count != 0 && state.current_count == state.repeat_count {
            self.modify(|s| s.running = false);
            log::debug!("timer {} completed after {} intervals", self.id(), state.current_count);
            self.0.dispatcher.dispatch_event(EventType::TimerComplete, None);
        }
    }

    // ── properties ────────────────────────────────────────────────────────

    pub fn delay(&self) -> Duration {
        self.0.state.get().delay
    }

    /// Sets the interval length; values below 1ms are raised to 1ms.
    ///
    /// Takes effect on the next tick; an interval already in progress keeps
    /// its elapsed frames.
    pub fn set_delay(&self, delay: Duration) {
        let delay = clamp_delay(delay);
        let frame_delay = frames_for_delay(delay, self.0.frames_per_second);
        self.modify(|s| {
            s.delay = delay;
            s.frame_delay = frame_delay;
        });
    }

    /// Intervals before completion; 0 means infinite.
    pub fn repeat_count(&self) -> u32 {
        self.0.state.get().repeat_count
    }

    /// Sets the repeat count; negative values become 0 (infinite).
    pub fn set_repeat_count(&self, repeat_count: i64) {
        let repeat_count = clamp_repeat_count(repeat_count);
        self.modify(|s| s.repeat_count = repeat_count);
    }

    /// Intervals elapsed so far. Stays 0 for infinite timers.
    pub fn current_count(&self) -> u32 {
        self.0.state.get().current_count
    }

    pub fn running(&self) -> bool {
        self.0.state.get().running
    }

    /// Ticks per interval.
    pub fn frame_delay(&self) -> u64 {
        self.0.state.get().frame_delay
    }

    /// Ticks elapsed in the current interval.
    pub fn current_frame_delay(&self) -> u64 {
        self.0.state.get().current_frame_delay
    }

    // ── listeners ─────────────────────────────────────────────────────────

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.0.dispatcher
    }

    pub fn add_event_listener(&self, ty: impl Into<EventType>, listener: &Listener) -> Result<()> {
        self.0.dispatcher.add_event_listener(ty, listener)
    }

    pub fn remove_event_listener(&self, ty: impl Into<EventType>, listener: &Listener) {
        self.0.dispatcher.remove_event_listener(ty, listener);
    }

    pub fn remove_all_event_listener(&self) {
        self.0.dispatcher.remove_all_event_listener();
    }

    pub fn has_event_listener(&self, ty: impl Into<EventType>) -> bool {
        self.0.dispatcher.has_event_listener(ty)
    }

    pub fn dispatch_event(&self, event: impl Into<Event>, data: Option<EventData>) -> bool {
        self.0.dispatcher.dispatch_event(event, data)
    }

    fn modify(&self, f: impl FnOnce(&mut TimerState)) {
        let mut state = self.0.state.get();
        f(&mut state);
        self.0.state.set(state);
    }
}

fn clamp_repeat_count(repeat_count: i64) -> u32 {
    u32::try_from(repeat_count.max(0)).unwrap_or(u32::MAX)
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Timer {}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.state.get();
        f.debug_struct("Timer")
            .field("id", &self.id())
            .field("delay", &s.delay)
            .field("frame_delay", &s.frame_delay)
            .field("repeat_count", &s.repeat_count)
            .field("current_count", &s.current_count)
            .field("current_frame_delay", &s.current_frame_delay)
            .field("running", &s.running)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Scheduler;
    use std::cell::{Cell, RefCell};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn counter(timer: &Timer, ty: EventType) -> Rc<Cell<u32>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        timer
            .add_event_listener(ty, &Listener::new(move |_| h.set(h.get() + 1)))
            .unwrap();
        hits
    }

    fn tick(timer: &Timer, n: u64) {
        for _ in 0..n {
            timer.update();
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_timer_is_idle_and_registered() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 3);
        assert!(!t.running());
        assert_eq!(t.current_count(), 0);
        assert_eq!(t.current_frame_delay(), 0);
        assert_eq!(t.frame_delay(), 60);
        assert!(t.is_alive());
    }

    #[test]
    fn construction_clamps_inputs() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(Duration::ZERO, -5);
        assert_eq!(t.delay(), ms(1));
        assert_eq!(t.frame_delay(), 1);
        assert_eq!(t.repeat_count(), 0);
    }

    // ── finite timers ─────────────────────────────────────────────────────

    #[test]
    fn finite_timer_fires_then_completes() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 3);
        let fired = counter(&t, EventType::Timer);
        let completed = counter(&t, EventType::TimerComplete);
        t.start();

        tick(&t, 59);
        assert_eq!(fired.get(), 0);
        tick(&t, 1);
        assert_eq!(fired.get(), 1);
        assert_eq!(t.current_count(), 1);
        assert!(t.running());

        tick(&t, 120);
        assert_eq!(fired.get(), 3);
        assert_eq!(completed.get(), 1);
        assert_eq!(t.current_count(), 3);
        assert!(!t.running());

        tick(&t, 600);
        assert_eq!(fired.get(), 3);
        assert_eq!(completed.get(), 1);
    }

    #[test]
    fn complete_fires_after_last_timer_event() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 2);
        let order = Rc::new(RefCell::new(Vec::new()));
        for ty in [EventType::Timer, EventType::TimerComplete] {
            let order = Rc::clone(&order);
            let name = ty.as_str().to_owned();
            t.add_event_listener(ty, &Listener::new(move |_| order.borrow_mut().push(name.clone())))
                .unwrap();
        }
        t.start();
        tick(&t, 2);
        assert_eq!(*order.borrow(), vec!["onTimer", "onTimer", "onTimerComplete"]);
    }

    #[test]
    fn completed_timer_restarts_from_zero() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 2);
        let completed = counter(&t, EventType::TimerComplete);
        t.start();
        tick(&t, 2);
        assert_eq!(completed.get(), 1);

        t.start();
        assert_eq!(t.current_count(), 0);
        assert!(t.running());
        tick(&t, 2);
        assert_eq!(completed.get(), 2);
    }

    #[test]
    fn events_target_the_timer() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 1);
        let target = Rc::new(Cell::new(None));
        let seen = Rc::clone(&target);
        t.add_event_listener(EventType::Timer, &Listener::new(move |e| seen.set(e.target)))
            .unwrap();
        t.start();
        t.update();
        assert_eq!(target.get(), Some(t.id()));
    }

    // ── infinite timers ───────────────────────────────────────────────────

    #[test]
    fn infinite_timer_never_completes() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(50), 0);
        let fired = counter(&t, EventType::Timer);
        let completed = counter(&t, EventType::TimerComplete);
        t.start();

        tick(&t, 3 * 1000);
        assert_eq!(fired.get(), 1000);
        assert_eq!(completed.get(), 0);
        assert_eq!(t.current_count(), 0);
        assert!(t.running());
    }

    // ── stop / start / reset ──────────────────────────────────────────────

    #[test]
    fn stop_preserves_progress() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 3);
        let fired = counter(&t, EventType::Timer);
        t.start();
        tick(&t, 60 + 25);
        t.stop();
        tick(&t, 500);
        assert_eq!(fired.get(), 1);
        assert_eq!(t.current_count(), 1);
        assert_eq!(t.current_frame_delay(), 25);

        t.start();
        assert_eq!(t.current_count(), 1);
        tick(&t, 35);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn fresh_start_keeps_partial_interval() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 0);
        t.start();
        tick(&t, 10);
        t.stop();
        t.start();
        assert_eq!(t.current_frame_delay(), 10);
    }

    #[test]
    fn reset_zeroes_everything() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 5);
        t.start();
        tick(&t, 130);
        t.reset();
        assert!(!t.running());
        assert_eq!(t.current_count(), 0);
        assert_eq!(t.current_frame_delay(), 0);
    }

    #[test]
    fn update_while_stopped_is_noop() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 1);
        let fired = counter(&t, EventType::Timer);
        tick(&t, 10);
        assert_eq!(fired.get(), 0);
        assert_eq!(t.current_frame_delay(), 0);
    }

    // ── property setters ──────────────────────────────────────────────────

    #[test]
    fn set_delay_recomputes_frames() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 0);
        t.set_delay(ms(250));
        assert_eq!(t.frame_delay(), 15);
        t.set_delay(Duration::ZERO);
        assert_eq!(t.delay(), ms(1));
        assert_eq!(t.frame_delay(), 1);
    }

    #[test]
    fn shrinking_delay_mid_interval_fires_next_tick() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(1000), 0);
        let fired = counter(&t, EventType::Timer);
        t.start();
        tick(&t, 30);
        t.set_delay(ms(100));
        t.update();
        assert_eq!(fired.get(), 1);
        assert_eq!(t.current_frame_delay(), 0);
    }

    #[test]
    fn negative_repeat_count_clamps_to_infinite() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 4);
        t.set_repeat_count(-1);
        assert_eq!(t.repeat_count(), 0);
        t.set_repeat_count(i64::MAX);
        assert_eq!(t.repeat_count(), u32::MAX);
    }

    // ── reentrancy ────────────────────────────────────────────────────────

    #[test]
    fn listener_reset_suppresses_completion() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 1);
        let completed = counter(&t, EventType::TimerComplete);
        let handle = t.clone();
        t.add_event_listener(EventType::Timer, &Listener::new(move |_| handle.reset()))
            .unwrap();
        t.start();
        t.update();
        assert_eq!(completed.get(), 0);
        assert!(!t.running());
    }

    #[test]
    fn complete_listener_can_restart() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 1);
        let fired = counter(&t, EventType::Timer);
        let handle = t.clone();
        let restarts = Rc::new(Cell::new(0));
        let r = Rc::clone(&restarts);
        t.add_event_listener(
            EventType::TimerComplete,
            &Listener::new(move |_| {
                if r.get() < 2 {
                    r.set(r.get() + 1);
                    handle.start();
                }
            }),
        )
        .unwrap();
        t.start();
        tick(&t, 10);
        assert_eq!(fired.get(), 3);
        assert_eq!(restarts.get(), 2);
        assert!(!t.running());
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn clones_share_state() {
        let scheduler = Scheduler::new();
        let t = scheduler.create_timer(ms(16), 0);
        let other = t.clone();
        other.start();
        assert!(t.running());
        assert_eq!(t, other);
        assert_ne!(t, scheduler.create_timer(ms(16), 0));
    }
}

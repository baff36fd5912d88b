use anyhow::Result;
use cadence_engine::Scheduler;

/// Control directive returned by host callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::runtime::Host`].
pub trait HostApp {
    /// Called once before the first tick. An error aborts the run.
    fn on_start(&mut self, scheduler: &Scheduler) -> Result<()> {
        let _ = scheduler;
        Ok(())
    }

    /// Called after each tick's flush. `tick` counts from 0.
    fn on_tick(&mut self, scheduler: &Scheduler, tick: u64) -> HostControl;
}

use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use cadence_engine::Scheduler;

use crate::app::{HostApp, HostControl};
use crate::pacer::TickPacer;

/// Host loop configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Ticks per second; should match the scheduler's frames per second.
    pub tick_rate: u32,
    /// Wall-clock limit; `None` runs until the app exits.
    pub run_for: Option<Duration>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate: cadence_engine::time::DEFAULT_FRAMES_PER_SECOND,
            run_for: None,
        }
    }
}

/// Fixed-rate loop calling [`Scheduler::flush`] once per tick.
pub struct Host {
    scheduler: Scheduler,
    tick: u64,
}

impl Host {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler, tick: 0 }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs `ticks` ticks back to back, stopping early if the app exits.
    pub fn step<A: HostApp>(&mut self, app: &mut A, ticks: u32) -> HostControl {
        for _ in 0..ticks {
            self.scheduler.flush();
            let tick = self.tick;
            self.tick += 1;
            if app.on_tick(&self.scheduler, tick) == HostControl::Exit {
                return HostControl::Exit;
            }
        }
        HostControl::Continue
    }

    /// Paces ticks in real time until the app exits or `run_for` elapses.
    pub fn run<A: HostApp>(&mut self, config: &HostConfig, app: &mut A) -> Result<()> {
        ensure!(config.tick_rate > 0, "tick rate must be positive");
        if config.tick_rate != self.scheduler.frames_per_second() {
            log::warn!(
                "host ticks at {} Hz but the scheduler assumes {} fps; timer delays will drift",
                config.tick_rate,
                self.scheduler.frames_per_second(),
            );
        }

        let started = Instant::now();
        let mut pacer = TickPacer::new(config.tick_rate);
        app.on_start(&self.scheduler).context("app failed to start")?;
        log::info!("host running at {} Hz ({:?} per tick)", config.tick_rate, pacer.interval());
        // Setup time should not turn into a catch-up burst on the first pass.
        pacer.reset();

        loop {
            let due = pacer.advance();
            if self.step(app, due) == HostControl::Exit {
                log::info!("app exited after {} ticks", self.tick);
                return Ok(());
            }
            if config.run_for.is_some_and(|limit| started.elapsed() >= limit) {
                log::info!("run limit reached after {} ticks", pacer.tick_index());
                return Ok(());
            }
            std::thread::sleep(pacer.until_next_tick());
        }
    }
}

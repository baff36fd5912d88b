//! Reference host: paces ticks in real time and drives a small countdown.
//!
//! `CADENCE_TICK_RATE` overrides the tick rate (default 60). The scheduler is
//! configured with the same rate so timer delays line up with wall time.

mod app;
mod pacer;
mod runtime;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use cadence_engine::logging::{init_logging, LoggingConfig};
use cadence_engine::{EventType, Listener, Scheduler, SchedulerConfig, Timer};

use app::{HostApp, HostControl};
use runtime::{Host, HostConfig};

/// Five one-second intervals, with a heartbeat every quarter second.
struct Countdown {
    finished: Rc<Cell<bool>>,
    heartbeat: Option<Timer>,
}

impl HostApp for Countdown {
    fn on_start(&mut self, scheduler: &Scheduler) -> Result<()> {
        let countdown = scheduler.create_timer(Duration::from_secs(1), 5);
        let remaining = Cell::new(countdown.repeat_count());
        let on_tick = Listener::new(move |_| {
            remaining.set(remaining.get().saturating_sub(1));
            log::info!("T-{}", remaining.get());
        });

        let handle = countdown.clone();
        let finished = Rc::clone(&self.finished);
        let on_complete = Listener::new(move |_| {
            log::info!("liftoff");
            finished.set(true);
            handle.kill();
        });

        countdown.add_event_listener(EventType::Timer, &on_tick)?;
        countdown.add_event_listener(EventType::TimerComplete, &on_complete)?;
        countdown.start();

        let heartbeat = scheduler.create_timer(Duration::from_millis(250), 0);
        let beats = Rc::new(Cell::new(0u32));
        heartbeat.add_event_listener(
            EventType::Timer,
            &Listener::new(move |_| {
                beats.set(beats.get() + 1);
                log::debug!("heartbeat {}", beats.get());
            }),
        )?;
        heartbeat.start();
        self.heartbeat = Some(heartbeat);
        Ok(())
    }

    fn on_tick(&mut self, scheduler: &Scheduler, tick: u64) -> HostControl {
        if !self.finished.get() {
            return HostControl::Continue;
        }
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.kill();
        }
        log::info!("countdown done at tick {tick}, {} timers left", scheduler.len());
        HostControl::Exit
    }
}

fn tick_rate_from_env() -> Result<u32> {
    match std::env::var("CADENCE_TICK_RATE") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("CADENCE_TICK_RATE is not a tick count: {raw:?}")),
        Err(_) => Ok(cadence_engine::time::DEFAULT_FRAMES_PER_SECOND),
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let tick_rate = tick_rate_from_env()?;
    let scheduler = Scheduler::with_config(SchedulerConfig { frames_per_second: tick_rate });
    let config = HostConfig {
        tick_rate,
        run_for: Some(Duration::from_secs(30)),
    };

    let mut app = Countdown {
        finished: Rc::new(Cell::new(false)),
        heartbeat: None,
    };
    let mut host = Host::new(scheduler);
    host.run(&config, &mut app).context("host loop failed")?;

    if !host.scheduler().is_empty() {
        log::warn!("{} timers were never killed", host.scheduler().len());
    }
    Ok(())
}

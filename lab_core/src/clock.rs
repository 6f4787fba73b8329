//! Fixed-cadence animation clock
//!
//! The clock does not own a timer. Whatever scheduler the host has (an event
//! loop, a sleeping thread, a fixed-step game loop) calls [`VisualizationClock::poll`]
//! with the current instant; at most one tick fires per call, so a stalled host
//! drops ticks instead of replaying a backlog.

use std::time::{Duration, Instant};

use crate::config::LabConfig;

#[derive(Debug, Clone)]
pub struct VisualizationClock {
    interval: Duration,
    step: f64,
    sim_time: f64,
    ticks: u64,
    running: bool,
    needs_redraw: bool,
    next_due: Option<Instant>,
}

impl VisualizationClock {
    pub fn new(interval: Duration, step: f64) -> Self {
        Self {
            interval,
            step,
            sim_time: 0.0,
            ticks: 0,
            running: false,
            needs_redraw: false,
            next_due: None,
        }
    }

    pub fn from_config(config: &LabConfig) -> Self {
        Self::new(config.tick_interval, config.sim_step)
    }

    /// Begin emitting ticks. No-op when already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.next_due = None;
        log::debug!("visualization clock started ({:?} cadence)", self.interval);
    }

    /// Halt tick emission. Safe to call when stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.next_due = None;
        log::debug!("visualization clock stopped at t={:.2}", self.sim_time);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fire a tick if one is due at `now`. Returns whether a tick fired.
    ///
    /// The first poll after [`start`](Self::start) only arms the schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }

        let due = *self.next_due.get_or_insert(now + self.interval);
        if now < due {
            return false;
        }

        self.on_tick();
        self.next_due = Some(now + self.interval);
        true
    }

    /// Advance simulated time by one step and flag a redraw.
    pub fn on_tick(&mut self) {
        self.sim_time += self.step;
        self.ticks += 1;
        self.needs_redraw = true;
    }

    /// Flag a redraw without advancing time, e.g. after a state setter.
    pub fn on_redraw_request(&mut self) {
        self.needs_redraw = true;
    }

    /// Consume the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for VisualizationClock {
    fn default() -> Self {
        Self::from_config(&LabConfig::default())
    }
}

/// Move `current` a `damping` fraction of the way toward `target`.
///
/// Snaps to `target` and reports `true` once the remaining delta is below
/// `epsilon`, so settled animations stop updating.
pub fn approach(current: f64, target: f64, damping: f64, epsilon: f64) -> (f64, bool) {
    let delta = target - current;
    if delta.abs() < epsilon {
        (target, true)
    } else {
        (current + delta * damping, false)
    }
}

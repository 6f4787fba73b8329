//! Visualization component: the clock plus the Experiment State it animates

use std::time::Instant;

use crate::clock::VisualizationClock;
use crate::diagram::Diagram;
use crate::lab::Lab;

/// Owns the Experiment State. Rendering reads it; only ticks and explicit
/// setters write it.
#[derive(Debug, Clone)]
pub struct Visualization<S> {
    clock: VisualizationClock,
    state: S,
}

impl<S> Visualization<S> {
    pub fn new(clock: VisualizationClock, state: S) -> Self {
        Self { clock, state }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Apply a setter to the Experiment State.
    pub fn update<R>(&mut self, setter: impl FnOnce(&mut S) -> R) -> R {
        let result = setter(&mut self.state);
        self.clock.on_redraw_request();
        result
    }

    /// Swap in a freshly generated configuration.
    pub fn replace_state(&mut self, state: S) {
        self.state = state;
        self.clock.on_redraw_request();
    }

    pub fn clock(&self) -> &VisualizationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut VisualizationClock {
        &mut self.clock
    }

    /// One tick: advance simulated time, then the lab's animated quantities.
    pub fn tick<L>(&mut self, lab: &L)
    where
        L: Lab<State = S>,
    {
        self.clock.on_tick();
        lab.animate(&mut self.state, self.clock.step());
    }

    /// Tick if the clock is due at `now`.
    pub fn poll<L>(&mut self, lab: &L, now: Instant) -> bool
    where
        L: Lab<State = S>,
    {
        if self.clock.poll(now) {
            lab.animate(&mut self.state, self.clock.step());
            true
        } else {
            false
        }
    }

    pub fn render<L>(&self, lab: &L) -> Diagram
    where
        L: Lab<State = S>,
    {
        lab.render(&self.state)
    }

    /// The next frame, if anything changed since the last one was taken.
    pub fn frame<L>(&mut self, lab: &L) -> Option<Diagram>
    where
        L: Lab<State = S>,
    {
        self.clock.take_redraw().then(|| lab.render(&self.state))
    }
}

//! Lab session controller
//!
//! Lifecycle: `Idle -> AwaitingAnswer -> Scored`, looping back to
//! `AwaitingAnswer` on randomize and to `Idle` on reset, with a terminal
//! `Closed` once the window goes away. All actions run to completion on the
//! caller's thread; ticks are only processed between actions.

use std::time::Instant;

use rand::rngs::StdRng;

use crate::clock::VisualizationClock;
use crate::config::LabConfig;
use crate::diagram::Diagram;
use crate::error::{LabError, Result};
use crate::lab::Lab;
use crate::measurement::{Measurement, MeasurementLog, SessionStats, TableRow};
use crate::params::{parse_number, Params};
use crate::visualization::Visualization;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingAnswer,
    Scored,
    Closed,
}

/// Outcome of a check, for the host to show
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub is_correct: bool,
    pub true_value: f64,
    pub message: String,
}

pub struct LabSession<L: Lab> {
    lab: L,
    rng: StdRng,
    state: SessionState,
    visualization: Visualization<L::State>,
    /// True parameters of the current experiment
    generated: Params,
    /// Raw text per parameter, in `lab.parameters()` order
    inputs: Vec<String>,
    log: MeasurementLog,
}

impl<L: Lab> LabSession<L> {
    pub fn new(lab: L, config: &LabConfig) -> Self {
        let mut rng = config.rng();
        let scenario = lab.generate(&mut rng);
        let inputs = vec![String::new(); lab.parameters().len()];
        log::info!("{}: session opened with {}", lab.name(), scenario.params.summary());

        Self {
            visualization: Visualization::new(
                VisualizationClock::from_config(config),
                scenario.state,
            ),
            generated: scenario.params,
            lab,
            rng,
            state: SessionState::Idle,
            inputs,
            log: MeasurementLog::new(),
        }
    }

    pub fn lab(&self) -> &L {
        &self.lab
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn experiment(&self) -> &L::State {
        self.visualization.state()
    }

    pub fn visualization(&self) -> &Visualization<L::State> {
        &self.visualization
    }

    pub fn log(&self) -> &MeasurementLog {
        &self.log
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.log.rows()
    }

    pub fn stats(&self) -> SessionStats {
        self.log.stats()
    }

    /// Raw text of a parameter field
    pub fn input(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.inputs[i].as_str())
    }

    /// Store raw text for a parameter field. Parsing happens on check.
    pub fn set_input(&mut self, name: &str, text: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        let index = self
            .index_of(name)
            .ok_or_else(|| LabError::domain(format!("unknown parameter {name}")))?;
        self.inputs[index] = text.into();
        Ok(())
    }

    /// Apply a setter to the Experiment State.
    pub fn update_experiment<R>(&mut self, setter: impl FnOnce(&mut L::State) -> R) -> Result<R> {
        self.ensure_open()?;
        Ok(self.visualization.update(setter))
    }

    /// Run a lab-specific action such as "Mix".
    pub fn perform_action(&mut self, action: &str) -> Result<()> {
        self.ensure_open()?;
        let lab = &self.lab;
        self.visualization
            .update(|state| lab.perform(state, action))
            .inspect_err(|err| log::warn!("{}: action '{action}' refused: {err}", lab.name()))?;
        log::info!("{}: performed '{action}'", self.lab.name());
        Ok(())
    }

    /// Parameters as entered; blank fields fall back to the live configuration.
    pub fn current_params(&self) -> Result<Params> {
        let live = self.lab.params_of(self.visualization.state());
        let mut params = Params::new();

        for (spec, text) in self.lab.parameters().iter().zip(&self.inputs) {
            let value = if text.trim().is_empty() {
                live.get(spec.name)?
            } else {
                parse_number(text)?
            };
            params.insert(spec.name, value);
        }

        Ok(params)
    }

    /// Push the entered parameters into the live configuration.
    pub fn apply_inputs(&mut self) -> Result<()> {
        self.ensure_open()?;
        let params = self.current_params()?;
        self.true_value(&params)?;
        let lab = &self.lab;
        self.visualization
            .update(|state| lab.apply(state, &params))
            .inspect_err(|err| log::warn!("{}: inputs not applied: {err}", lab.name()))?;
        log::debug!("{}: applied {}", self.lab.name(), params.summary());
        Ok(())
    }

    /// Generate a new random experiment. Clears the parameter fields.
    pub fn randomize_experiment(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.reseed();
        self.state = SessionState::AwaitingAnswer;
        log::info!("{}: new experiment {}", self.lab.name(), self.generated.summary());
        Ok(())
    }

    /// Check the learner's answer against the formula and log the attempt.
    pub fn submit_answer(&mut self, raw_text: &str) -> Result<Verdict> {
        self.ensure_open()?;
        self.score(raw_text)
            .inspect_err(|err| log::warn!("{}: check rejected: {err}", self.lab.name()))
    }

    fn score(&mut self, raw_text: &str) -> Result<Verdict> {
        let user_answer = parse_number(raw_text)?;
        self.lab.check_ready(self.visualization.state())?;
        let params = self.current_params()?;
        let true_value = self.true_value(&params)?;

        let measurement =
            Measurement::new(params, true_value, user_answer, self.lab.tolerance());
        let is_correct = measurement.is_correct();
        log::info!(
            "{}: attempt #{} answer={} true={:.4} correct={}",
            self.lab.name(),
            self.log.len() + 1,
            user_answer,
            true_value,
            is_correct
        );
        self.log.push(measurement);
        self.state = SessionState::Scored;

        Ok(Verdict {
            is_correct,
            true_value,
            message: self.verdict_message(is_correct, true_value),
        })
    }

    /// Formula value for `params`; overflow to infinity or NaN is a domain error.
    fn true_value(&self, params: &Params) -> Result<f64> {
        let value = self.lab.compute_true_value(params)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(LabError::domain("result out of range"))
        }
    }

    fn verdict_message(&self, is_correct: bool, true_value: f64) -> String {
        let unit = self.lab.answer_unit();
        if is_correct {
            format!("Correct! {} = {true_value:.2} {unit}", self.lab.answer_label())
        } else {
            format!(
                "Not quite. {} = {true_value:.2} {unit} (tolerance {})",
                self.lab.answer_label(),
                self.lab.tolerance().describe()
            )
        }
    }

    /// Fill the fields with the generated parameters. Not a scored attempt.
    pub fn reveal_answer(&mut self) -> Result<Params> {
        self.ensure_open()?;
        for (spec, text) in self.lab.parameters().iter().zip(self.inputs.iter_mut()) {
            *text = match self.generated.value(spec.name) {
                Some(value) => format!("{value}"),
                None => String::new(),
            };
        }
        self.state = SessionState::Scored;
        log::info!("{}: revealed {}", self.lab.name(), self.generated.summary());
        Ok(self.generated.clone())
    }

    /// Clear the log and fields and start over. The clock keeps running.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.log.clear();
        self.reseed();
        self.state = SessionState::Idle;
        log::info!("{}: session reset", self.lab.name());
        Ok(())
    }

    /// Terminal: stops the clock and refuses further actions.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.visualization.clock_mut().stop();
        self.state = SessionState::Closed;
        log::info!(
            "{}: session closed after {} attempts",
            self.lab.name(),
            self.log.len()
        );
    }

    pub fn start_clock(&mut self) {
        self.visualization.clock_mut().start();
    }

    pub fn stop_clock(&mut self) {
        self.visualization.clock_mut().stop();
    }

    /// Advance the animation by one tick regardless of the schedule.
    pub fn tick(&mut self) {
        self.visualization.tick(&self.lab);
    }

    /// Tick if the clock is due at `now`; returns whether it fired.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        self.visualization.poll(&self.lab, now)
    }

    /// Current diagram
    pub fn render(&self) -> Diagram {
        self.visualization.render(&self.lab)
    }

    /// Diagram if a redraw was requested since the last call
    pub fn frame(&mut self) -> Option<Diagram> {
        self.visualization.frame(&self.lab)
    }

    fn reseed(&mut self) {
        let scenario = self.lab.generate(&mut self.rng);
        self.visualization.replace_state(scenario.state);
        self.generated = scenario.params;
        self.inputs.iter_mut().for_each(String::clear);
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == SessionState::Closed {
            Err(LabError::empty_state("the lab window has been closed"))
        } else {
            Ok(())
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.lab.parameters().iter().position(|spec| spec.name == name)
    }
}

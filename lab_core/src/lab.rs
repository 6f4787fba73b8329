//! The capability interface every lab supplies
//!
//! A lab is a strategy object: it knows its parameters, how to generate a
//! random experiment, how to score it and how to draw it. The session
//! controller is generic over [`Lab`] and never looks inside the formula.

use rand::RngCore;

use crate::diagram::Diagram;
use crate::error::{LabError, Result};
use crate::params::Params;
use crate::tolerance::Tolerance;

/// Description of one experiment input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    /// Range used by the random generator
    pub min: f64,
    pub max: f64,
}

/// An equation with its name and formula, shown next to the diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// A freshly generated experiment
#[derive(Debug, Clone)]
pub struct Scenario<S> {
    /// The true parameters, kept for "reveal"
    pub params: Params,
    pub state: S,
}

pub trait Lab {
    /// Physical configuration driving the visualization
    type State: Clone + std::fmt::Debug;

    fn name(&self) -> &'static str;

    fn parameters(&self) -> &'static [ParamSpec];

    /// What the learner is asked to compute
    fn answer_label(&self) -> &'static str;

    fn answer_unit(&self) -> &'static str;

    fn tolerance(&self) -> Tolerance {
        Tolerance::Standard
    }

    fn equations(&self) -> &'static [Equation] {
        &[]
    }

    /// New random experiment within the documented parameter ranges
    fn generate(&self, rng: &mut dyn RngCore) -> Scenario<Self::State>;

    /// Parameters currently shown by the live configuration
    fn params_of(&self, state: &Self::State) -> Params;

    /// Move the live configuration to `params` through the state setters.
    ///
    /// Rejects parameters outside the formula's domain without touching
    /// `state`. Setters run only for values that differ, so an unchanged
    /// parameter set keeps progress such as a finished mix.
    fn apply(&self, state: &mut Self::State, params: &Params) -> Result<()>;

    /// Precondition for scoring, e.g. an action that must happen first.
    fn check_ready(&self, _state: &Self::State) -> Result<()> {
        Ok(())
    }

    /// Closed-form model. Pure: same input, same output.
    fn compute_true_value(&self, params: &Params) -> Result<f64>;

    /// Advance animated quantities by one tick of `dt` simulated time.
    fn animate(&self, state: &mut Self::State, dt: f64);

    /// Draw `state`. Must not mutate anything.
    fn render(&self, state: &Self::State) -> Diagram;

    /// Lab-specific buttons, e.g. "Mix"
    fn actions(&self) -> &'static [&'static str] {
        &[]
    }

    fn perform(&self, _state: &mut Self::State, action: &str) -> Result<()> {
        Err(LabError::empty_state(format!(
            "{} has no action '{action}'",
            self.name()
        )))
    }
}

/// Fail with a domain error unless `value` is strictly positive.
pub(crate) fn require_positive(params: &Params, name: &str) -> Result<f64> {
    let value = params.get(name)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(LabError::domain(format!("{name} must be greater than zero")))
    }
}

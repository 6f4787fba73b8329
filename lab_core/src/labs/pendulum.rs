//! Mathematical pendulum lab
//!
//! Small-angle period `T = 2π·√(L/g)`, independent of mass and amplitude.

use std::f64::consts::TAU;

use glam::Vec2;
use rand::{Rng, RngCore};

use crate::diagram::{palette, Diagram};
use crate::error::Result;
use crate::lab::{require_positive, Equation, Lab, ParamSpec, Scenario};
use crate::params::Params;

/// Standard gravity used for generated experiments (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Release angle of generated experiments (rad)
pub const DEFAULT_AMPLITUDE: f64 = 0.25;

const PARAMETERS: &[ParamSpec] = &[
    ParamSpec {
        name: "L",
        label: "String length",
        unit: "m",
        min: 0.2,
        max: 2.0,
    },
    ParamSpec {
        name: "g",
        label: "Gravity",
        unit: "m/s²",
        min: 9.81,
        max: 9.81,
    },
];

const EQUATIONS: &[Equation] = &[
    Equation {
        name: "Period",
        formula: "T = 2π·√(L/g)",
        description: "Valid for small swing angles",
    },
    Equation {
        name: "Frequency",
        formula: "f = 1/T",
        description: "Full swings per second",
    },
    Equation {
        name: "Angular Position",
        formula: "θ(t) = θ₀·cos(2π·t/T)",
        description: "Released from rest at θ₀",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct PendulumState {
    length: f64,
    gravity: f64,
    amplitude: f64,
    /// Simulated time since release
    elapsed: f64,
    angle: f64,
}

impl PendulumState {
    pub fn new(length: f64, gravity: f64, amplitude: f64) -> Self {
        Self {
            length,
            gravity,
            amplitude,
            elapsed: 0.0,
            angle: amplitude,
        }
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
        self.release();
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
        self.release();
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
        self.release();
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// `None` when length or gravity are not positive
    pub fn period(&self) -> Option<f64> {
        (self.length > 0.0 && self.gravity > 0.0).then(|| TAU * (self.length / self.gravity).sqrt())
    }

    fn release(&mut self) {
        self.elapsed = 0.0;
        self.angle = self.amplitude;
    }
}

#[derive(Debug, Clone, Default)]
pub struct PendulumLab;

impl Lab for PendulumLab {
    type State = PendulumState;

    fn name(&self) -> &'static str {
        "Mathematical Pendulum"
    }

    fn parameters(&self) -> &'static [ParamSpec] {
        PARAMETERS
    }

    fn answer_label(&self) -> &'static str {
        "Period T"
    }

    fn answer_unit(&self) -> &'static str {
        "s"
    }

    fn equations(&self) -> &'static [Equation] {
        EQUATIONS
    }

    /// Length in whole centimetres between 0.20 and 2.00 m.
    fn generate(&self, rng: &mut dyn RngCore) -> Scenario<PendulumState> {
        let length = (rng.gen_range(0.20..=2.00_f64) * 100.0).round() / 100.0;
        let state = PendulumState::new(length, STANDARD_GRAVITY, DEFAULT_AMPLITUDE);

        Scenario {
            params: self.params_of(&state),
            state,
        }
    }

    fn params_of(&self, state: &PendulumState) -> Params {
        Params::new().with("L", state.length).with("g", state.gravity)
    }

    fn apply(&self, state: &mut PendulumState, params: &Params) -> Result<()> {
        self.compute_true_value(params)?;
        let (length, gravity) = (params.get("L")?, params.get("g")?);

        if length != state.length {
            state.set_length(length);
        }
        if gravity != state.gravity {
            state.set_gravity(gravity);
        }
        Ok(())
    }

    fn compute_true_value(&self, params: &Params) -> Result<f64> {
        let length = require_positive(params, "L")?;
        let gravity = require_positive(params, "g")?;
        Ok(TAU * (length / gravity).sqrt())
    }

    fn animate(&self, state: &mut PendulumState, dt: f64) {
        let Some(period) = state.period() else {
            return;
        };
        state.elapsed += dt;
        state.angle = state.amplitude * (TAU * state.elapsed / period).cos();
    }

    fn render(&self, state: &PendulumState) -> Diagram {
        // 1 m of string is 4 world units
        let scale = 4.0_f32;
        let reach = (state.length.max(0.1) as f32) * scale;
        let mut diagram = Diagram::new(Vec2::new(-reach, -reach - 1.0), Vec2::new(reach, 1.0));

        let pivot = Vec2::ZERO;
        let swing = Vec2::new(state.angle.sin() as f32, -state.angle.cos() as f32);
        let bob = pivot + swing * reach;

        diagram
            .line(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), palette::FRAME)
            .line(pivot, pivot - Vec2::new(0.0, reach), palette::GUIDE)
            .line(pivot, bob, palette::FRAME)
            .circle(bob, 0.25, palette::BOB);

        // Swing arc between the turning points
        let amplitude = state.amplitude.abs() as f32;
        let arc = (0..=24)
            .map(|i| {
                let a = -amplitude + 2.0 * amplitude * i as f32 / 24.0;
                Vec2::new(a.sin(), -a.cos()) * reach
            })
            .collect();
        diagram.polyline(arc, palette::GUIDE);

        diagram
    }
}

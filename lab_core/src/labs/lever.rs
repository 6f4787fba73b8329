//! Lever balance lab
//!
//! Loads hang on both arms of a beam resting on a central pivot. The learner
//! reads forces and arm lengths and reports the moment difference
//! `ΔM = F1·l1 − F2·l2`; zero means the lever is balanced.

use glam::Vec2;
use rand::{Rng, RngCore};

use crate::clock::approach;
use crate::config::constants::{DAMPING, SETTLE_EPSILON};
use crate::config::LabConfig;
use crate::diagram::{palette, Diagram};
use crate::error::Result;
use crate::lab::{require_positive, Equation, Lab, ParamSpec, Scenario};
use crate::params::Params;

/// Largest beam tilt in radians
pub const MAX_TILT: f64 = 0.35;

/// World units per centimetre of arm
const CM: f32 = 0.1;

const PARAMETERS: &[ParamSpec] = &[
    ParamSpec {
        name: "F1",
        label: "Left force",
        unit: "N",
        min: 1.0,
        max: 20.0,
    },
    ParamSpec {
        name: "L1",
        label: "Left arm",
        unit: "cm",
        min: 10.0,
        max: 50.0,
    },
    ParamSpec {
        name: "F2",
        label: "Right force",
        unit: "N",
        min: 1.0,
        max: 20.0,
    },
    ParamSpec {
        name: "L2",
        label: "Right arm",
        unit: "cm",
        min: 1.0,
        max: 100.0,
    },
];

const EQUATIONS: &[Equation] = &[
    Equation {
        name: "Moment of Force",
        formula: "M = F·l",
        description: "Turning effect of a force about the pivot",
    },
    Equation {
        name: "Equilibrium Condition",
        formula: "F₁·l₁ = F₂·l₂",
        description: "Equal moments on both sides balance the lever",
    },
    Equation {
        name: "Moment Difference",
        formula: "ΔM = F₁·l₁ − F₂·l₂",
        description: "Positive: left side goes down",
    },
];

/// Live lever configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LeverState {
    left_force: f64,
    left_arm: f64,
    right_force: f64,
    right_arm: f64,
    angle: f64,
    settled: bool,
}

impl LeverState {
    pub fn new(left_force: f64, left_arm: f64, right_force: f64, right_arm: f64) -> Self {
        Self {
            left_force,
            left_arm,
            right_force,
            right_arm,
            angle: 0.0,
            settled: false,
        }
    }

    pub fn set_left(&mut self, force: f64, arm: f64) {
        self.left_force = force;
        self.left_arm = arm;
        self.settled = false;
    }

    pub fn set_right(&mut self, force: f64, arm: f64) {
        self.right_force = force;
        self.right_arm = arm;
        self.settled = false;
    }

    /// Tip the beam by hand; it swings back toward its equilibrium tilt.
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle.clamp(-MAX_TILT, MAX_TILT);
        self.settled = false;
    }

    pub fn left_moment(&self) -> f64 {
        self.left_force * self.left_arm
    }

    pub fn right_moment(&self) -> f64 {
        self.right_force * self.right_arm
    }

    /// Current beam angle, positive when the left side is down
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Tilt the beam is heading for, proportional to the moment imbalance
    pub fn target_angle(&self) -> f64 {
        let (left, right) = (self.left_moment(), self.right_moment());
        let total = left.abs() + right.abs();
        if total == 0.0 {
            return 0.0;
        }
        (MAX_TILT * (left - right) / total).clamp(-MAX_TILT, MAX_TILT)
    }
}

#[derive(Debug, Clone)]
pub struct LeverLab {
    damping: f64,
    epsilon: f64,
}

impl Default for LeverLab {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            epsilon: SETTLE_EPSILON,
        }
    }
}

impl LeverLab {
    pub fn new(damping: f64, epsilon: f64) -> Self {
        Self { damping, epsilon }
    }

    /// Beam damping and settle threshold taken from `config`
    pub fn from_config(config: &LabConfig) -> Self {
        Self::new(config.damping, config.settle_epsilon)
    }
}

impl Lab for LeverLab {
    type State = LeverState;

    fn name(&self) -> &'static str {
        "Lever Balance"
    }

    fn parameters(&self) -> &'static [ParamSpec] {
        PARAMETERS
    }

    fn answer_label(&self) -> &'static str {
        "ΔM"
    }

    fn answer_unit(&self) -> &'static str {
        "N·cm"
    }

    fn equations(&self) -> &'static [Equation] {
        EQUATIONS
    }

    /// Forces 1–20 N and a left arm of 10–50 cm, all whole numbers. The right
    /// arm is derived so the lever balances, then truncated to whole
    /// centimetres like the rest of the scale, so a generated lever can be off
    /// balance by less than one `F2·cm`.
    fn generate(&self, rng: &mut dyn RngCore) -> Scenario<LeverState> {
        let left_force = rng.gen_range(1..=20) as f64;
        let left_arm = rng.gen_range(10..=50) as f64;
        let moment = left_force * left_arm;

        let mut right_force = left_force;
        for _ in 0..16 {
            let candidate = rng.gen_range(1..=20) as f64;
            if (moment / candidate).trunc() >= 1.0 && moment / candidate <= 100.0 {
                right_force = candidate;
                break;
            }
        }
        let right_arm = (moment / right_force).trunc();

        let mut state = LeverState::new(left_force, left_arm, right_force, right_arm);
        state.set_angle(-MAX_TILT);

        Scenario {
            params: self.params_of(&state),
            state,
        }
    }

    fn params_of(&self, state: &LeverState) -> Params {
        Params::new()
            .with("F1", state.left_force)
            .with("L1", state.left_arm)
            .with("F2", state.right_force)
            .with("L2", state.right_arm)
    }

    fn apply(&self, state: &mut LeverState, params: &Params) -> Result<()> {
        self.compute_true_value(params)?;
        let left = (params.get("F1")?, params.get("L1")?);
        let right = (params.get("F2")?, params.get("L2")?);

        if left != (state.left_force, state.left_arm) {
            state.set_left(left.0, left.1);
        }
        if right != (state.right_force, state.right_arm) {
            state.set_right(right.0, right.1);
        }
        Ok(())
    }

    fn compute_true_value(&self, params: &Params) -> Result<f64> {
        let f1 = require_positive(params, "F1")?;
        let l1 = require_positive(params, "L1")?;
        let f2 = require_positive(params, "F2")?;
        let l2 = require_positive(params, "L2")?;
        Ok(f1 * l1 - f2 * l2)
    }

    fn animate(&self, state: &mut LeverState, _dt: f64) {
        if state.settled {
            return;
        }
        let target = state.target_angle();
        let (angle, settled) = approach(state.angle, target, self.damping, self.epsilon);
        state.angle = angle;
        state.settled = settled;
    }

    fn render(&self, state: &LeverState) -> Diagram {
        let reach = (state.left_arm.max(state.right_arm) as f32) * CM + 0.5;
        let mut diagram = Diagram::new(Vec2::new(-reach - 0.5, -3.0), Vec2::new(reach + 0.5, 2.0));

        // Pivot and floor
        diagram
            .polyline(
                vec![
                    Vec2::new(-0.4, -1.0),
                    Vec2::ZERO,
                    Vec2::new(0.4, -1.0),
                    Vec2::new(-0.4, -1.0),
                ],
                palette::FRAME,
            )
            .line(Vec2::new(-reach, -1.0), Vec2::new(reach, -1.0), palette::GUIDE);

        // Beam rotated about the pivot; positive angle lowers the left end
        let dir = Vec2::new(state.angle.cos() as f32, state.angle.sin() as f32);
        let left_end = -dir * reach;
        let right_end = dir * reach;
        diagram.line(left_end, right_end, palette::BEAM);

        // Centimetre marks every 10 cm
        let mut mark = 10.0;
        while mark * CM < reach {
            for side in [-1.0, 1.0] {
                let p = dir * (side * mark * CM);
                diagram.line(p, p + Vec2::new(0.0, 0.1), palette::GUIDE);
            }
            mark += 10.0;
        }

        // Hanging loads, sized by force
        for (force, arm, side) in [
            (state.left_force, state.left_arm, -1.0),
            (state.right_force, state.right_arm, 1.0),
        ] {
            let anchor = dir * (side * arm as f32 * CM);
            let size = 0.2 + (force as f32).sqrt() * 0.1;
            let top = anchor - Vec2::new(0.0, 0.8);
            diagram
                .line(anchor, top, palette::FRAME)
                .rect(
                    top - Vec2::new(size * 0.5, size),
                    top + Vec2::new(size * 0.5, 0.0),
                    palette::LOAD,
                );
        }

        diagram
    }
}

//! Calorimetric mixing lab
//!
//! A hot and a cold portion of water are poured together. Ignoring heat losses
//! the mixture settles at `t = (m1·t1 + m2·t2) / (m1 + m2)`.

use glam::Vec2;
use rand::{Rng, RngCore};

use crate::clock::approach;
use crate::config::constants::{DAMPING, SETTLE_EPSILON};
use crate::config::LabConfig;
use crate::diagram::{palette, Color, Diagram};
use crate::error::{LabError, Result};
use crate::lab::{Equation, Lab, ParamSpec, Scenario};
use crate::params::Params;
use crate::tolerance::Tolerance;

/// Answers within half a degree count as correct.
pub const TOLERANCE: f64 = 0.5;

const ABSOLUTE_ZERO: f64 = -273.15;

/// Temperatures closer than this to their target stop animating (°C)
const TEMP_EPSILON: f64 = 0.01;

pub const MIX_ACTION: &str = "Mix";

const PARAMETERS: &[ParamSpec] = &[
    ParamSpec {
        name: "m1",
        label: "Hot water mass",
        unit: "g",
        min: 50.0,
        max: 200.0,
    },
    ParamSpec {
        name: "t1",
        label: "Hot water temperature",
        unit: "°C",
        min: 50.0,
        max: 90.0,
    },
    ParamSpec {
        name: "m2",
        label: "Cold water mass",
        unit: "g",
        min: 50.0,
        max: 200.0,
    },
    ParamSpec {
        name: "t2",
        label: "Cold water temperature",
        unit: "°C",
        min: 5.0,
        max: 30.0,
    },
];

const EQUATIONS: &[Equation] = &[
    Equation {
        name: "Heat Given Off",
        formula: "Q₁ = c·m₁·(t₁ − t)",
        description: "Hot water cools down to t",
    },
    Equation {
        name: "Heat Absorbed",
        formula: "Q₂ = c·m₂·(t − t₂)",
        description: "Cold water warms up to t",
    },
    Equation {
        name: "Heat Balance",
        formula: "t = (m₁·t₁ + m₂·t₂) / (m₁ + m₂)",
        description: "Q₁ = Q₂ with equal specific heat",
    },
];

/// Two vessels of water and the mixing progress
#[derive(Debug, Clone, PartialEq)]
pub struct MixingState {
    hot_mass: f64,
    hot_temp: f64,
    cold_mass: f64,
    cold_temp: f64,
    mixed: bool,
    /// Fraction poured into the mixing vessel, 0..=1
    progress: f64,
    /// Displayed thermometer readings
    hot_reading: f64,
    cold_reading: f64,
}

impl MixingState {
    pub fn new(hot_mass: f64, hot_temp: f64, cold_mass: f64, cold_temp: f64) -> Self {
        Self {
            hot_mass,
            hot_temp,
            cold_mass,
            cold_temp,
            mixed: false,
            progress: 0.0,
            hot_reading: hot_temp,
            cold_reading: cold_temp,
        }
    }

    /// Refill the hot vessel. Undoes any mixing.
    pub fn set_hot(&mut self, mass: f64, temp: f64) {
        self.hot_mass = mass;
        self.hot_temp = temp;
        self.unmix();
    }

    /// Refill the cold vessel. Undoes any mixing.
    pub fn set_cold(&mut self, mass: f64, temp: f64) {
        self.cold_mass = mass;
        self.cold_temp = temp;
        self.unmix();
    }

    pub fn mix(&mut self) {
        self.mixed = true;
    }

    pub fn is_mixed(&self) -> bool {
        self.mixed
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn readings(&self) -> (f64, f64) {
        (self.hot_reading, self.cold_reading)
    }

    /// Equilibrium temperature, `None` without any water
    pub fn mixture_temp(&self) -> Option<f64> {
        let total = self.hot_mass + self.cold_mass;
        let heat = self.hot_mass * self.hot_temp + self.cold_mass * self.cold_temp;
        (total > 0.0).then(|| heat / total)
    }

    fn unmix(&mut self) {
        self.mixed = false;
        self.progress = 0.0;
        self.hot_reading = self.hot_temp;
        self.cold_reading = self.cold_temp;
    }
}

#[derive(Debug, Clone)]
pub struct MixingLab {
    damping: f64,
    /// Pour progress closer than this to done stops animating
    epsilon: f64,
}

impl Default for MixingLab {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            epsilon: SETTLE_EPSILON,
        }
    }
}

impl MixingLab {
    pub fn new(damping: f64, epsilon: f64) -> Self {
        Self { damping, epsilon }
    }

    pub fn from_config(config: &LabConfig) -> Self {
        Self::new(config.damping, config.settle_epsilon)
    }
}

impl Lab for MixingLab {
    type State = MixingState;

    fn name(&self) -> &'static str {
        "Calorimetric Mixing"
    }

    fn parameters(&self) -> &'static [ParamSpec] {
        PARAMETERS
    }

    fn answer_label(&self) -> &'static str {
        "Mixture temperature t"
    }

    fn answer_unit(&self) -> &'static str {
        "°C"
    }

    fn tolerance(&self) -> Tolerance {
        Tolerance::Absolute(TOLERANCE)
    }

    fn equations(&self) -> &'static [Equation] {
        EQUATIONS
    }

    /// Whole grams and whole degrees
    fn generate(&self, rng: &mut dyn RngCore) -> Scenario<MixingState> {
        let state = MixingState::new(
            rng.gen_range(50..=200) as f64,
            rng.gen_range(50..=90) as f64,
            rng.gen_range(50..=200) as f64,
            rng.gen_range(5..=30) as f64,
        );

        Scenario {
            params: self.params_of(&state),
            state,
        }
    }

    fn params_of(&self, state: &MixingState) -> Params {
        Params::new()
            .with("m1", state.hot_mass)
            .with("t1", state.hot_temp)
            .with("m2", state.cold_mass)
            .with("t2", state.cold_temp)
    }

    fn apply(&self, state: &mut MixingState, params: &Params) -> Result<()> {
        self.compute_true_value(params)?;
        let hot = (params.get("m1")?, params.get("t1")?);
        let cold = (params.get("m2")?, params.get("t2")?);

        if hot != (state.hot_mass, state.hot_temp) {
            state.set_hot(hot.0, hot.1);
        }
        if cold != (state.cold_mass, state.cold_temp) {
            state.set_cold(cold.0, cold.1);
        }
        Ok(())
    }

    fn check_ready(&self, state: &MixingState) -> Result<()> {
        if state.mixed {
            Ok(())
        } else {
            Err(LabError::empty_state("mix the water before checking the result"))
        }
    }

    fn compute_true_value(&self, params: &Params) -> Result<f64> {
        let (m1, t1) = (params.get("m1")?, params.get("t1")?);
        let (m2, t2) = (params.get("m2")?, params.get("t2")?);

        if m1 < 0.0 || m2 < 0.0 {
            return Err(LabError::domain("a mass cannot be negative"));
        }
        if m1 + m2 <= 0.0 {
            return Err(LabError::domain("total mass must be greater than zero"));
        }
        if t1 < ABSOLUTE_ZERO || t2 < ABSOLUTE_ZERO {
            return Err(LabError::domain("temperature below absolute zero"));
        }

        Ok((m1 * t1 + m2 * t2) / (m1 + m2))
    }

    fn animate(&self, state: &mut MixingState, _dt: f64) {
        if !state.mixed {
            return;
        }
        let Some(target) = state.mixture_temp() else {
            return;
        };

        state.progress = approach(state.progress, 1.0, self.damping, self.epsilon).0;
        state.hot_reading = approach(state.hot_reading, target, self.damping, TEMP_EPSILON).0;
        state.cold_reading = approach(state.cold_reading, target, self.damping, TEMP_EPSILON).0;
    }

    fn perform(&self, state: &mut MixingState, action: &str) -> Result<()> {
        if action != MIX_ACTION {
            return Err(LabError::empty_state(format!("unknown action '{action}'")));
        }
        if state.mixture_temp().is_none() {
            return Err(LabError::empty_state("both vessels are empty"));
        }
        state.mix();
        Ok(())
    }

    fn actions(&self) -> &'static [&'static str] {
        &[MIX_ACTION]
    }

    fn render(&self, state: &MixingState) -> Diagram {
        let mut diagram = Diagram::new(Vec2::new(-6.0, -3.5), Vec2::new(6.0, 3.5));
        let capacity = 400.0_f32;
        let remaining = 1.0 - state.progress as f32;

        let vessels = [
            (-4.0, state.hot_mass as f32 * remaining, state.hot_reading),
            (4.0, state.cold_mass as f32 * remaining, state.cold_reading),
        ];
        for (x, mass, reading) in vessels {
            beaker(&mut diagram, Vec2::new(x, 0.5), mass / capacity, temperature_color(reading));
            thermometer(&mut diagram, Vec2::new(x + 1.3, 0.5), reading);
        }

        let poured = (state.hot_mass + state.cold_mass) as f32 * state.progress as f32;
        let mixture = state.mixture_temp().unwrap_or(state.cold_temp);
        beaker(&mut diagram, Vec2::new(0.0, -2.0), poured / capacity, temperature_color(mixture));

        if state.mixed && state.progress < 0.99 {
            // Streams into the mixing vessel
            for x in [-4.0, 4.0] {
                diagram.line(Vec2::new(x, 1.8), Vec2::new(x * 0.2, -0.6), palette::GUIDE);
            }
        }

        diagram
    }
}

/// Open-top beaker with bottom-centre `base` and liquid filled to `level` (0..=1)
fn beaker(diagram: &mut Diagram, base: Vec2, level: f32, color: Color) {
    let (w, h) = (1.8_f32, 1.5_f32);
    diagram.polyline(
        vec![
            base + Vec2::new(-w / 2.0, h),
            base + Vec2::new(-w / 2.0, 0.0),
            base + Vec2::new(w / 2.0, 0.0),
            base + Vec2::new(w / 2.0, h),
        ],
        palette::FRAME,
    );
    let level = level.clamp(0.0, 1.0);
    if level > 0.0 {
        diagram.rect(
            base + Vec2::new(-w / 2.0 + 0.05, 0.05),
            base + Vec2::new(w / 2.0 - 0.05, h * level),
            color,
        );
    }
}

fn thermometer(diagram: &mut Diagram, base: Vec2, reading: f64) {
    let column = (reading.clamp(0.0, 100.0) / 100.0) as f32 * 1.5;
    diagram
        .rect(base, base + Vec2::new(0.12, 1.6), palette::FRAME)
        .line(base + Vec2::new(0.06, 0.0), base + Vec2::new(0.06, column), palette::HOT)
        .circle(base + Vec2::new(0.06, -0.1), 0.12, palette::HOT);
}

/// Blend from cold blue at 0 °C to hot red at 100 °C.
fn temperature_color(temp: f64) -> Color {
    let t = (temp.clamp(0.0, 100.0) / 100.0) as f32;
    let (c, h) = (palette::COLD, palette::HOT);
    [
        c[0] + (h[0] - c[0]) * t,
        c[1] + (h[1] - c[1]) * t,
        c[2] + (h[2] - c[2]) * t,
        0.8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::seeded_rng;

    fn params(m1: f64, t1: f64, m2: f64, t2: f64) -> Params {
        Params::new().with("m1", m1).with("t1", t1).with("m2", m2).with("t2", t2)
    }

    #[test]
    fn test_equal_masses_average() {
        let lab = MixingLab::default();
        let t = lab.compute_true_value(&params(100.0, 80.0, 100.0, 20.0)).unwrap();
        assert_eq!(t, 50.0);
    }

    #[test]
    fn test_weighted_average() {
        let lab = MixingLab::default();
        let t = lab.compute_true_value(&params(120.0, 80.0, 90.0, 20.0)).unwrap();
        assert!((t - 54.285714).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_masses() {
        let lab = MixingLab::default();
        for p in [params(0.0, 80.0, 0.0, 20.0), params(-10.0, 80.0, 100.0, 20.0)] {
            assert!(matches!(lab.compute_true_value(&p), Err(LabError::Domain(_))));
        }
        // One empty vessel is still a valid experiment
        assert_eq!(lab.compute_true_value(&params(0.0, 80.0, 50.0, 20.0)).unwrap(), 20.0);
    }

    #[test]
    fn test_must_mix_before_checking() {
        let lab = MixingLab::default();
        let mut state = MixingState::new(100.0, 80.0, 100.0, 20.0);
        assert!(matches!(lab.check_ready(&state), Err(LabError::EmptyState(_))));

        lab.perform(&mut state, MIX_ACTION).unwrap();
        assert!(lab.check_ready(&state).is_ok());

        state.set_cold(150.0, 10.0);
        assert!(!state.is_mixed());
    }

    #[test]
    fn test_readings_converge_after_mixing() {
        let lab = MixingLab::default();
        let mut state = MixingState::new(100.0, 80.0, 100.0, 20.0);
        lab.animate(&mut state, 0.05);
        assert_eq!(state.readings(), (80.0, 20.0), "nothing moves before mixing");

        state.mix();
        for _ in 0..300 {
            lab.animate(&mut state, 0.05);
        }
        assert_eq!(state.readings(), (50.0, 50.0));
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_apply_refills_only_changed_vessels() {
        let lab = MixingLab::default();
        let mut state = MixingState::new(100.0, 80.0, 100.0, 20.0);
        lab.perform(&mut state, MIX_ACTION).unwrap();

        lab.apply(&mut state, &params(100.0, 80.0, 100.0, 20.0)).unwrap();
        assert!(state.is_mixed());

        lab.apply(&mut state, &params(100.0, 80.0, 150.0, 10.0)).unwrap();
        assert!(!state.is_mixed());
        assert_eq!(lab.params_of(&state), params(100.0, 80.0, 150.0, 10.0));

        assert!(lab.apply(&mut state, &params(0.0, 80.0, 0.0, 10.0)).is_err());
        assert_eq!(lab.params_of(&state), params(100.0, 80.0, 150.0, 10.0));
    }

    #[test]
    fn test_pour_speed_follows_config() {
        let fast = MixingLab::from_config(&LabConfig {
            damping: 0.5,
            ..LabConfig::default()
        });
        let mut state = MixingState::new(100.0, 80.0, 100.0, 20.0);
        state.mix();
        fast.animate(&mut state, 0.05);
        assert_eq!(state.progress(), 0.5);
        assert_eq!(state.readings(), (65.0, 35.0));
    }

    #[test]
    fn test_generated_ranges() {
        let lab = MixingLab::default();
        let mut rng = seeded_rng(11);
        for _ in 0..100 {
            let p = lab.generate(&mut rng).params;
            assert!((50.0..=200.0).contains(&p.get("m1").unwrap()));
            assert!((50.0..=90.0).contains(&p.get("t1").unwrap()));
            assert!((5.0..=30.0).contains(&p.get("t2").unwrap()));
        }
    }
}

//! Session configuration
//!
//! Reference values live in [`constants`]; a host may override the tick cadence
//! and the scenario seed through the environment (`LAB_TICK_MS`, `LAB_SEED`).

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

/// Reference constants shared by every lab
pub mod constants {
    /// Wall-clock interval between animation ticks (~33 Hz)
    pub const TICK_INTERVAL_MS: u64 = 30;

    /// Simulated time added per tick
    pub const SIM_STEP: f64 = 0.05;

    /// Fraction of the remaining distance covered per tick by damped animations
    pub const DAMPING: f64 = 0.1;

    /// Animations stop once the remaining delta drops below this (radians)
    pub const SETTLE_EPSILON: f64 = 0.0005;

    /// Relative tolerance of the standard answer check
    pub const RELATIVE_TOLERANCE: f64 = 0.05;

    /// Absolute tolerance used when the true value is exactly zero
    pub const ZERO_TOLERANCE: f64 = 0.1;
}

/// Tunable session settings
#[derive(Debug, Clone, PartialEq)]
pub struct LabConfig {
    pub tick_interval: Duration,
    pub sim_step: f64,
    pub damping: f64,
    pub settle_epsilon: f64,
    /// Fixed seed for scenario generation; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(constants::TICK_INTERVAL_MS),
            sim_step: constants::SIM_STEP,
            damping: constants::DAMPING,
            settle_epsilon: constants::SETTLE_EPSILON,
            seed: None,
        }
    }
}

impl LabConfig {
    /// Defaults with `LAB_TICK_MS`, `LAB_DAMPING` and `LAB_SEED` applied when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LabConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("LAB_TICK_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.tick_interval = Duration::from_millis(ms),
                _ => log::warn!("ignoring LAB_TICK_MS={raw:?}: expected a positive integer"),
            }
        }

        if let Some(raw) = lookup("LAB_DAMPING") {
            match raw.trim().parse::<f64>() {
                Ok(damping) if damping > 0.0 && damping <= 1.0 => config.damping = damping,
                _ => log::warn!("ignoring LAB_DAMPING={raw:?}: expected a number in (0, 1]"),
            }
        }

        if let Some(raw) = lookup("LAB_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => log::warn!("ignoring LAB_SEED={raw:?}: expected an unsigned integer"),
            }
        }

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// RNG for scenario generation
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => seeded_rng(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Construct a deterministic RNG from a fixed seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults_match_reference_cadence() {
        let config = LabConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(30));
        assert_eq!(config.sim_step, 0.05);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_env_overrides() {
        let config = LabConfig::from_lookup(|key| match key {
            "LAB_TICK_MS" => Some("16".to_string()),
            "LAB_DAMPING" => Some("0.25".to_string()),
            "LAB_SEED" => Some(" 42 ".to_string()),
            _ => None,
        });
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.damping, 0.25);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let config = LabConfig::from_lookup(|key| match key {
            "LAB_TICK_MS" => Some("0".to_string()),
            "LAB_DAMPING" => Some("1.5".to_string()),
            "LAB_SEED" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config, LabConfig::default());
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let a: u32 = seeded_rng(7).gen();
        let b: u32 = LabConfig::default().with_seed(7).rng().gen();
        assert_eq!(a, b);
    }
}

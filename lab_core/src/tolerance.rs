//! Answer checking against a computed true value

use crate::config::constants::{RELATIVE_TOLERANCE, ZERO_TOLERANCE};

/// Rule deciding whether an answer counts as correct
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Tolerance {
    /// Within 5% of the true value (inclusive); when the true value is exactly
    /// zero, strictly closer than 0.1.
    #[default]
    Standard,
    /// Within a fixed absolute distance (inclusive)
    Absolute(f64),
}

impl Tolerance {
    pub fn accepts(&self, true_val: f64, user_val: f64) -> bool {
        let error = (user_val - true_val).abs();
        match *self {
            Tolerance::Standard => {
                if true_val != 0.0 {
                    error <= RELATIVE_TOLERANCE * true_val.abs()
                } else {
                    error < ZERO_TOLERANCE
                }
            }
            Tolerance::Absolute(limit) => error <= limit,
        }
    }

    /// Human-readable form for the side panel
    pub fn describe(&self) -> String {
        match *self {
            Tolerance::Standard => format!("±{:.0}%", RELATIVE_TOLERANCE * 100.0),
            Tolerance::Absolute(limit) => format!("±{limit}"),
        }
    }
}

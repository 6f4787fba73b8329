//! Concrete labs
//!
//! - **Lever**: moment balance on a two-armed lever
//! - **Mixing**: final temperature of two mixed water portions
//! - **Pendulum**: period of a mathematical pendulum

pub mod lever;
pub mod mixing;
pub mod pendulum;

pub use lever::{LeverLab, LeverState};
pub use mixing::{MixingLab, MixingState};
pub use pendulum::{PendulumLab, PendulumState};

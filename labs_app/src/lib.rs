//! Interactive physics lab windows
//!
//! Every lab runs in the same host: the animated diagram on the left and a
//! side panel with the equations, parameter fields, answer check and the
//! measurement table on the right.
//!
//! Controls:
//! - Space: Start/stop the animation clock
//! - R: New random experiment
//! - Escape: Close the lab

pub mod app;
pub mod lab_panel;

pub use app::run;

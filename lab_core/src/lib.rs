//! Interactive physics lab engine
//!
//! One parameterized engine shared by every lab exercise:
//!
//! - **Visualization Clock**: fixed-cadence tick driver for the animated diagram
//! - **Lab Session**: parameter input, answer checking against a closed-form model,
//!   and the in-memory measurement log
//! - **Labs**: lever balance, calorimetric mixing and pendulum period, each supplied
//!   as an implementation of the [`Lab`] capability trait

pub mod clock;
pub mod config;
pub mod diagram;
pub mod error;
pub mod lab;
pub mod labs;
pub mod measurement;
pub mod params;
pub mod session;
pub mod tolerance;
pub mod visualization;

pub use clock::{approach, VisualizationClock};
pub use config::{constants, seeded_rng, LabConfig};
pub use diagram::{Diagram, Shape};
pub use error::{LabError, Result};
pub use lab::{Equation, Lab, ParamSpec, Scenario};
pub use measurement::{Measurement, MeasurementLog, SessionStats, TableRow};
pub use params::{parse_number, Params};
pub use session::{LabSession, SessionState, Verdict};
pub use tolerance::Tolerance;
pub use visualization::Visualization;

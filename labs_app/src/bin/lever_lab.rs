//! Lever Balance Lab
//!
//! Loads hang on both sides of a pivoted beam. Read the forces and arm
//! lengths, then enter the moment difference F₁·l₁ − F₂·l₂.

use lab_core::labs::LeverLab;

fn main() {
    if let Err(err) = labs_app::run("Lever Balance", LeverLab::from_config) {
        log::error!("lever lab failed: {err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

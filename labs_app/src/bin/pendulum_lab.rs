//! Mathematical Pendulum Lab
//!
//! Watch the swing and enter its period for the given string length.

use lab_core::labs::PendulumLab;

fn main() {
    if let Err(err) = labs_app::run("Mathematical Pendulum", |_| PendulumLab) {
        log::error!("pendulum lab failed: {err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

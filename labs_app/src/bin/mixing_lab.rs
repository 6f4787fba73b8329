//! Calorimetric Mixing Lab
//!
//! Pour hot and cold water together ("Mix") and enter the temperature the
//! mixture settles at. Answers within half a degree are accepted.

use lab_core::labs::MixingLab;

fn main() {
    if let Err(err) = labs_app::run("Calorimetric Mixing", MixingLab::from_config) {
        log::error!("mixing lab failed: {err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

//! Property-based tests for formulas, generators and the tolerance rule

use lab_core::labs::mixing::MIX_ACTION;
use lab_core::labs::{LeverLab, MixingLab, PendulumLab};
use lab_core::{parse_number, Lab, LabConfig, LabSession, Params, Tolerance};
use proptest::prelude::*;

/// Randomize, get ready, then answer with the formula's own value.
fn answer_own_scenario<L: Lab>(
    lab: L,
    seed: u64,
    ready: Option<&str>,
) -> Result<(), TestCaseError> {
    let mut session = LabSession::new(lab, &LabConfig::default().with_seed(seed));
    session.randomize_experiment().unwrap();
    if let Some(action) = ready {
        session.perform_action(action).unwrap();
    }

    let params = session.current_params().unwrap();
    prop_assert_eq!(&params, &session.lab().params_of(session.experiment()));
    let true_value = session.lab().compute_true_value(&params).unwrap();

    let verdict = session.submit_answer(&true_value.to_string()).unwrap();
    prop_assert!(verdict.is_correct, "{} for {}", verdict.message, params.summary());
    prop_assert_eq!(session.log().len(), 1);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: formulas are deterministic
    #[test]
    fn prop_formulas_are_deterministic(
        f1 in 0.1f64..100.0, l1 in 0.1f64..100.0,
        f2 in 0.1f64..100.0, l2 in 0.1f64..100.0,
    ) {
        let lever = LeverLab::default();
        let p = Params::new().with("F1", f1).with("L1", l1).with("F2", f2).with("L2", l2);
        prop_assert_eq!(lever.compute_true_value(&p), lever.compute_true_value(&p));

        let mixing = MixingLab::default();
        let p = Params::new().with("m1", f1).with("t1", l1).with("m2", f2).with("t2", l2);
        prop_assert_eq!(mixing.compute_true_value(&p), mixing.compute_true_value(&p));

        let p = Params::new().with("L", l1).with("g", f2);
        prop_assert_eq!(PendulumLab.compute_true_value(&p), PendulumLab.compute_true_value(&p));
    }

    /// Property: the mixture temperature lies between the two inputs
    #[test]
    fn prop_mixture_between_inputs(
        m1 in 1.0f64..500.0, t1 in 0.0f64..100.0,
        m2 in 1.0f64..500.0, t2 in 0.0f64..100.0,
    ) {
        let p = Params::new().with("m1", m1).with("t1", t1).with("m2", m2).with("t2", t2);
        let t = MixingLab::default().compute_true_value(&p).unwrap();
        prop_assert!(t >= t1.min(t2) - 1e-9 && t <= t1.max(t2) + 1e-9);
    }

    /// Property: an exact answer is always accepted
    #[test]
    fn prop_exact_answer_accepted(value in -1e6f64..1e6) {
        prop_assert!(Tolerance::Standard.accepts(value, value));
    }

    /// Property: answers inside 4.9% pass, outside 5.1% fail
    #[test]
    fn prop_relative_band(value in 1.0f64..1e6, sign in prop::bool::ANY) {
        let value = if sign { value } else { -value };
        prop_assert!(Tolerance::Standard.accepts(value, value * 1.049));
        prop_assert!(!Tolerance::Standard.accepts(value, value * 1.051));
    }

    /// Property: comma and dot decimal separators parse identically
    #[test]
    fn prop_comma_equals_dot(int in 0u32..100_000, frac in 0u32..1000) {
        let dot = format!("{int}.{frac:03}");
        let comma = format!("{int},{frac:03}");
        prop_assert_eq!(parse_number(&dot), parse_number(&comma));
    }

    /// Property: every generated lever scores its own true value as correct
    #[test]
    fn prop_lever_scenarios_self_verify(seed in any::<u64>()) {
        answer_own_scenario(LeverLab::default(), seed, None)?;
    }

    /// Property: every generated mixing experiment, once mixed, self-verifies
    #[test]
    fn prop_mixing_scenarios_self_verify(seed in any::<u64>()) {
        answer_own_scenario(MixingLab::default(), seed, Some(MIX_ACTION))?;
    }

    /// Property: every generated pendulum self-verifies
    #[test]
    fn prop_pendulum_scenarios_self_verify(seed in any::<u64>()) {
        answer_own_scenario(PendulumLab, seed, None)?;
    }
}

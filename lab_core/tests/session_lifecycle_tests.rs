//! Session state machine: transitions, log ownership, error recovery

use std::time::{Duration, Instant};

use lab_core::labs::{LeverLab, MixingLab, PendulumLab};
use lab_core::{Lab, LabConfig, LabError, LabSession, Params, SessionState};

fn config() -> LabConfig {
    LabConfig::default().with_seed(2024)
}

#[test]
fn test_new_session_is_idle_with_checkable_experiment() {
    let mut session = LabSession::new(PendulumLab, &config());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.log().is_empty());

    let verdict = session.submit_answer("2").unwrap();
    assert_eq!(session.state(), SessionState::Scored);
    assert!(verdict.true_value > 0.0);
}

#[test]
fn test_randomize_moves_to_awaiting_answer_from_any_state() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    session.randomize_experiment().unwrap();
    assert_eq!(session.state(), SessionState::AwaitingAnswer);

    session.submit_answer("0").unwrap();
    assert_eq!(session.state(), SessionState::Scored);

    session.randomize_experiment().unwrap();
    assert_eq!(session.state(), SessionState::AwaitingAnswer);
    assert_eq!(session.log().len(), 1, "randomize keeps the log");
}

#[test]
fn test_parse_error_leaves_log_untouched() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    session.submit_answer("1").unwrap();

    let err = session.submit_answer("twelve").unwrap_err();
    assert_eq!(err, LabError::parse("twelve"));
    assert_eq!(session.log().len(), 1);
}

#[test]
fn test_bad_parameter_field_is_parse_error() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    session.set_input("F1", "ten").unwrap();
    assert!(matches!(session.submit_answer("0"), Err(LabError::Parse { .. })));
    assert!(session.log().is_empty());
}

#[test]
fn test_domain_error_is_recoverable() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    session.set_input("L2", "0").unwrap();
    assert!(matches!(session.submit_answer("0"), Err(LabError::Domain(_))));
    assert!(session.log().is_empty());

    session.set_input("L2", "").unwrap();
    assert!(session.submit_answer("0").is_ok());
    assert_eq!(session.log().len(), 1);
}

#[test]
fn test_overflowing_lever_inputs_are_rejected() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    for name in ["F1", "L1", "F2", "L2"] {
        session.set_input(name, "1e200").unwrap();
    }
    let err = session.submit_answer("0").unwrap_err();
    assert_eq!(err, LabError::domain("result out of range"));
    assert!(session.log().is_empty());
    assert_eq!(session.state(), SessionState::Idle);

    let before = session.experiment().clone();
    assert_eq!(session.apply_inputs(), Err(LabError::domain("result out of range")));
    assert_eq!(session.experiment(), &before);
}

#[test]
fn test_overflowing_mixing_inputs_are_rejected() {
    let mut session = LabSession::new(MixingLab::default(), &config());
    session.perform_action("Mix").unwrap();
    session.set_input("m1", "1e308").unwrap();
    session.set_input("m2", "1e308").unwrap();

    let err = session.submit_answer("50").unwrap_err();
    assert!(matches!(err, LabError::Domain(_)));
    assert!(session.log().is_empty());
}

#[test]
fn test_applied_inputs_reach_the_experiment() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    session.set_input("F1", "12").unwrap();
    session.set_input("L2", "15,5").unwrap();
    session.apply_inputs().unwrap();

    let live = session.lab().params_of(session.experiment());
    assert_eq!(live.get("F1").unwrap(), 12.0);
    assert_eq!(live.get("L2").unwrap(), 15.5);
    assert!(session.frame().is_some(), "applying requests a redraw");

    // Fields now agree with the live state, so blanking them changes nothing
    let applied = session.current_params().unwrap();
    session.set_input("F1", "").unwrap();
    assert_eq!(session.current_params().unwrap(), applied);
}

#[test]
fn test_rejected_inputs_leave_experiment_alone() {
    let mut session = LabSession::new(PendulumLab, &config());
    let before: Params = session.lab().params_of(session.experiment());

    session.set_input("L", "-1").unwrap();
    assert!(matches!(session.apply_inputs(), Err(LabError::Domain(_))));
    session.set_input("L", "long").unwrap();
    assert!(matches!(session.apply_inputs(), Err(LabError::Parse { .. })));

    assert_eq!(session.lab().params_of(session.experiment()), before);
}

#[test]
fn test_apply_then_mix_then_check() {
    let mut session = LabSession::new(MixingLab::default(), &config());
    for (name, value) in [("m1", "100"), ("t1", "80"), ("m2", "100"), ("t2", "20")] {
        session.set_input(name, value).unwrap();
    }
    session.apply_inputs().unwrap();
    session.perform_action("Mix").unwrap();

    // Re-applying identical inputs keeps the mix
    session.apply_inputs().unwrap();
    let verdict = session.submit_answer("50").unwrap();
    assert!(verdict.is_correct);
    assert_eq!(verdict.true_value, 50.0);
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut session = LabSession::new(PendulumLab, &config());
    assert!(session.set_input("mass", "1").is_err());
    assert_eq!(session.input("mass"), None);
}

#[test]
fn test_reveal_restores_generated_params_without_scoring() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    session.randomize_experiment().unwrap();
    session.set_input("F1", "99").unwrap();

    let revealed = session.reveal_answer().unwrap();
    assert_eq!(session.state(), SessionState::Scored);
    assert!(session.log().is_empty());
    assert_eq!(
        session.input("F1").unwrap(),
        format!("{}", revealed.get("F1").unwrap())
    );
    assert_eq!(session.current_params().unwrap(), revealed);
}

#[test]
fn test_reset_clears_log_and_fields() {
    let mut session = LabSession::new(PendulumLab, &config());
    for answer in ["1", "2", "3", "4"] {
        session.submit_answer(answer).unwrap();
    }
    session.set_input("L", "1,5").unwrap();
    session.start_clock();

    session.reset().unwrap();
    assert_eq!(session.log().len(), 0);
    assert_eq!(session.stats().attempts, 0);
    assert_eq!(session.input("L"), Some(""));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.visualization().clock().is_running(), "reset keeps the clock");
}

#[test]
fn test_mixing_requires_mix_action() {
    let mut session = LabSession::new(MixingLab::default(), &config());
    let err = session.submit_answer("40").unwrap_err();
    assert!(matches!(err, LabError::EmptyState(_)));
    assert!(session.log().is_empty());
    assert_ne!(session.state(), SessionState::Scored);

    session.perform_action("Mix").unwrap();
    assert!(session.submit_answer("40").is_ok());
}

#[test]
fn test_unknown_action_is_refused() {
    let mut session = LabSession::new(LeverLab::default(), &config());
    assert!(matches!(
        session.perform_action("Mix"),
        Err(LabError::EmptyState(_))
    ));
}

#[test]
fn test_closed_session_refuses_actions() {
    let mut session = LabSession::new(PendulumLab, &config());
    session.start_clock();
    session.close();
    assert_eq!(session.state(), SessionState::Closed);
    assert!(!session.visualization().clock().is_running());

    assert!(matches!(session.submit_answer("1"), Err(LabError::EmptyState(_))));
    assert!(session.randomize_experiment().is_err());
    assert!(session.reset().is_err());
    assert!(session.reveal_answer().is_err());
    assert!(session.apply_inputs().is_err());
}

#[test]
fn test_clock_drives_animation_only_when_running() {
    let mut session = LabSession::new(PendulumLab, &config());
    let t0 = Instant::now();
    let before = session.experiment().clone();

    assert!(!session.tick_due(t0 + Duration::from_secs(1)));
    assert_eq!(session.experiment(), &before);

    session.start_clock();
    session.tick_due(t0);
    assert!(session.tick_due(t0 + Duration::from_millis(30)));
    assert_ne!(session.experiment(), &before);
    assert!(session.frame().is_some());
    assert!(session.frame().is_none(), "redraw flag is consumed");
}

#[test]
fn test_same_seed_same_experiments() {
    let a = LabSession::new(MixingLab::default(), &config());
    let b = LabSession::new(MixingLab::default(), &config());
    assert_eq!(a.current_params().unwrap(), b.current_params().unwrap());
}

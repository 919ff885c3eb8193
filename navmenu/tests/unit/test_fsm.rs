//! FSM unit tests

use navmenu::deploy::fsm::{DeployCycleEvent, DeployCycleFsm, DeployCycleState};

fn polling_fsm() -> DeployCycleFsm {
    let mut fsm = DeployCycleFsm::new();
    fsm.process(DeployCycleEvent::Confirm).unwrap();
    fsm.process(DeployCycleEvent::Trigger).unwrap();
    fsm.process(DeployCycleEvent::Triggered).unwrap();
    fsm
}

#[test]
fn test_fsm_initial_state() {
    let fsm = DeployCycleFsm::new();
    assert_eq!(fsm.state(), DeployCycleState::Idle);
    assert!(fsm.error().is_none());
    assert_eq!(fsm.poll_count(), 0);
    assert!(!fsm.is_active());
}

#[test]
fn test_fsm_declined_returns_to_idle() {
    let mut fsm = DeployCycleFsm::new();

    fsm.process(DeployCycleEvent::Confirm).unwrap();
    assert!(fsm.is_active());

    fsm.process(DeployCycleEvent::Declined).unwrap();
    assert_eq!(fsm.state(), DeployCycleState::Idle);
}

#[test]
fn test_fsm_pending_keeps_polling() {
    let mut fsm = polling_fsm();

    for _ in 0..3 {
        fsm.process(DeployCycleEvent::Pending).unwrap();
        assert_eq!(fsm.state(), DeployCycleState::Polling);
    }
    assert_eq!(fsm.poll_count(), 3);

    fsm.process(DeployCycleEvent::Complete).unwrap();
    assert_eq!(fsm.state(), DeployCycleState::Idle);
    assert_eq!(fsm.poll_count(), 4);
}

#[test]
fn test_fsm_poll_failures_and_retry() {
    let mut fsm = polling_fsm();

    fsm.process(DeployCycleEvent::PollFailed("error 1".to_string())).unwrap();
    fsm.process(DeployCycleEvent::PollFailed("error 2".to_string())).unwrap();
    assert_eq!(fsm.consecutive_failures(), 2);
    assert_eq!(fsm.error(), Some("error 2"));
    assert!(fsm.can_retry(3));
    assert!(!fsm.can_retry(2));

    // A successful poll resets the streak
    fsm.process(DeployCycleEvent::Pending).unwrap();
    assert_eq!(fsm.consecutive_failures(), 0);
}

#[test]
fn test_fsm_trigger_failure() {
    let mut fsm = DeployCycleFsm::new();
    fsm.process(DeployCycleEvent::Confirm).unwrap();
    fsm.process(DeployCycleEvent::Trigger).unwrap();

    fsm.process(DeployCycleEvent::Failed("connection refused".to_string()))
        .unwrap();
    assert_eq!(fsm.state(), DeployCycleState::Idle);
    assert_eq!(fsm.error(), Some("connection refused"));

    // The next cycle starts clean
    fsm.process(DeployCycleEvent::Confirm).unwrap();
    assert!(fsm.error().is_none());
}

#[test]
fn test_fsm_cancel_while_polling() {
    let mut fsm = polling_fsm();
    fsm.process(DeployCycleEvent::Cancel).unwrap();
    assert_eq!(fsm.state(), DeployCycleState::Idle);
}

#[test]
fn test_fsm_cancel_while_confirming() {
    let mut fsm = DeployCycleFsm::new();
    fsm.process(DeployCycleEvent::Confirm).unwrap();
    fsm.process(DeployCycleEvent::Cancel).unwrap();
    assert_eq!(fsm.state(), DeployCycleState::Idle);
}

#[test]
fn test_fsm_invalid_transition() {
    let mut fsm = DeployCycleFsm::new();

    // Cannot poll without a trigger
    assert!(fsm.process(DeployCycleEvent::Pending).is_err());

    // Cannot confirm twice
    fsm.process(DeployCycleEvent::Confirm).unwrap();
    assert!(fsm.process(DeployCycleEvent::Confirm).is_err());
    assert_eq!(fsm.state(), DeployCycleState::Confirming);
}

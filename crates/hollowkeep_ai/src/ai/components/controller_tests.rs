//! Tests for controller components.

use super::controller::{desired_state, AiController, ControllerState};
use crate::config::DefaultState;

#[test]
fn test_controller_state_default() {
    assert_eq!(ControllerState::default(), ControllerState::Idle);
    assert!(ControllerState::Dead.is_terminal());
    assert!(!ControllerState::Attack.is_terminal());
}

#[test]
fn test_default_state_mapping() {
    let controller = AiController::new(DefaultState::Wander);
    assert_eq!(controller.default_state, ControllerState::Wander);
    assert_eq!(controller.entered_at, 0.0);
}

#[test]
fn test_running_attack_is_never_interrupted() {
    // Цель ушла из всех кругов: атака всё равно доигрывается
    let state = desired_state(true, false, false, ControllerState::Idle);
    assert_eq!(state, ControllerState::Attack);
}

#[test]
fn test_attack_gate_beats_chase() {
    assert_eq!(
        desired_state(false, true, true, ControllerState::Wander),
        ControllerState::Attack
    );
    assert_eq!(
        desired_state(false, false, true, ControllerState::Wander),
        ControllerState::Chase
    );
}

#[test]
fn test_fallback_without_target() {
    assert_eq!(
        desired_state(false, false, false, ControllerState::Wander),
        ControllerState::Wander
    );
    assert_eq!(
        desired_state(false, false, false, ControllerState::Idle),
        ControllerState::Idle
    );
}

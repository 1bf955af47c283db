//! AI components: controller state, wander/chase behaviors

pub mod chase;
pub mod controller;
pub mod wander;

#[cfg(test)]
mod controller_tests;

pub use chase::{chase_velocity, ChaseBehavior};
pub use controller::{desired_state, AiController, ControllerState, Degraded};
pub use wander::{WanderBehavior, WanderPhase};

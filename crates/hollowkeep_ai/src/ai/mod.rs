//! AI decision-making module
//!
//! Controller на актора: ровно один активный sub-state
//! (Idle / Wander / Chase / Attack, Dead: терминальный).
//!
//! AI пишет только `VelocityIntent`, `Facing`, attack routine и presentation cues.
//! Позиции, HP и knockback принадлежат другим слоям.

use bevy::prelude::*;

use crate::perception::sense_targets;
use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{
    chase_velocity, desired_state, AiController, ChaseBehavior, ControllerState, Degraded,
    WanderBehavior, WanderPhase,
};
pub use events::PresentationCue;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. ensure_controller_dependencies (Death): degraded акторы остаются Idle
/// 2. sense_targets (Perception): attack/detection circles
/// 3. update_controllers (Decision): переходы и старт атак
/// 4. idle_intent → wander_intent → chase_intent (Intent)
///
/// Attack routine продвигает CombatPlugin (SimulationSet::Attack).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationCue>();

        app.add_systems(
            FixedUpdate,
            systems::ensure_controller_dependencies
                .after(crate::spawn::respawn_actors)
                .in_set(SimulationSet::Death),
        );

        app.add_systems(
            FixedUpdate,
            sense_targets.in_set(SimulationSet::Perception),
        );

        app.add_systems(
            FixedUpdate,
            systems::update_controllers.in_set(SimulationSet::Decision),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::idle_intent,
                systems::wander_intent,
                systems::chase_intent,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Intent),
        );
    }
}

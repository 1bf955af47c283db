//! Presentation cues (AI → animation/FX слой)
//!
//! Fire-and-forget: AI никогда не читает состояние анимации обратно,
//! все длительности считаются таймерами.

use bevy::prelude::*;

use crate::combat::AttackVariant;

use super::components::ControllerState;

#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationCue {
    /// Controller переключил sub-state
    StateEntered {
        actor: Entity,
        state: ControllerState,
    },
    FacingChanged {
        actor: Entity,
        facing: Vec2,
    },
    AttackStarted {
        actor: Entity,
        variant: AttackVariant,
    },
    DashStarted {
        actor: Entity,
        direction: Vec2,
        distance: f32,
    },
    HitFired {
        actor: Entity,
        variant: AttackVariant,
        hit_index: usize,
    },
    SummonCast {
        actor: Entity,
    },
    PhaseEscalated {
        actor: Entity,
    },
    Died {
        actor: Entity,
    },
}

//! Top-level controller state

use bevy::prelude::*;

use crate::config::DefaultState;

/// Активный sub-state актора (ровно один)
///
/// Dead терминальный, ни один sub-state больше не включается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Reflect)]
#[reflect(Component)]
pub enum ControllerState {
    #[default]
    Idle,
    Wander,
    Chase,
    Attack,
    Dead,
}

impl ControllerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Dead)
    }
}

impl From<DefaultState> for ControllerState {
    fn from(state: DefaultState) -> Self {
        match state {
            DefaultState::Idle => ControllerState::Idle,
            DefaultState::Wander => ControllerState::Wander,
        }
    }
}

/// AI controller актора
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(ControllerState)]
pub struct AiController {
    /// Куда падаем без цели (Idle или Wander)
    pub default_state: ControllerState,
    /// Когда включился текущий sub-state
    pub entered_at: f32,
}

impl Default for AiController {
    fn default() -> Self {
        Self::new(DefaultState::Idle)
    }
}

impl AiController {
    pub fn new(default_state: DefaultState) -> Self {
        Self {
            default_state: default_state.into(),
            entered_at: 0.0,
        }
    }
}

/// Маркер: у актора не хватило зависимостей при инициализации, навсегда Idle
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Degraded;

/// Правило перехода (в порядке приоритета):
/// 1. идёт атака → Attack (не прерывается perception'ом)
/// 2. gate атаки открыт → Attack
/// 3. цель в detection → Chase
/// 4. иначе default
pub fn desired_state(
    is_attacking: bool,
    attack_ready: bool,
    in_detect: bool,
    fallback: ControllerState,
) -> ControllerState {
    if is_attacking || attack_ready {
        ControllerState::Attack
    } else if in_detect {
        ControllerState::Chase
    } else {
        fallback
    }
}

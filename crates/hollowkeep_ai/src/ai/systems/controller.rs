//! Top-level controller: выбор sub-state и старт атак

use bevy::prelude::*;

use crate::ai::components::{desired_state, AiController, ControllerState, Degraded, WanderBehavior};
use crate::ai::events::PresentationCue;
use crate::boss::SummonCaster;
use crate::combat::{AttackGeometry, AttackMachine, Dead};
use crate::components::{planar, Facing, Health, VelocityIntent};
use crate::perception::{Perception, Senses};

/// Система: проверка зависимостей нового controller'а
///
/// Нет Health / Perception / target layer / attack machine → error в лог
/// (один раз), актор навсегда остаётся в Idle.
pub fn ensure_controller_dependencies(
    mut commands: Commands,
    mut actors: Query<
        (
            Entity,
            &mut ControllerState,
            Option<&mut VelocityIntent>,
            Has<Health>,
            Option<&Perception>,
            Has<AttackMachine>,
        ),
        (Added<AiController>, Without<Degraded>),
    >,
) {
    for (entity, mut state, intent, has_health, perception, has_machine) in actors.iter_mut() {
        let missing = if !has_health {
            Some("Health")
        } else if perception.is_none() {
            Some("Perception")
        } else if perception.is_some_and(|perception| perception.target_layers.is_empty()) {
            Some("target layer")
        } else if !has_machine {
            Some("AttackMachine")
        } else {
            None
        };

        let Some(missing) = missing else {
            continue;
        };

        crate::log_error(&format!(
            "AI controller {:?} is missing {}, staying Idle",
            entity, missing
        ));
        *state = ControllerState::Idle;
        if let Some(mut intent) = intent {
            intent.clear();
        }
        commands.entity(entity).insert(Degraded);
    }
}

/// Система: выбрать активный sub-state
///
/// Правило перехода: `desired_state`. На каждом переходе intent обнуляется,
/// wander сбрасывается на паузу. Attack стартует routine в тот же тик.
pub fn update_controllers(
    time: Res<Time<Fixed>>,
    mut actors: Query<
        (
            Entity,
            &Transform,
            &Perception,
            &Senses,
            &mut AiController,
            &mut ControllerState,
            &mut VelocityIntent,
            &mut Facing,
            &mut AttackMachine,
            Option<&mut WanderBehavior>,
            Option<&SummonCaster>,
        ),
        (Without<Dead>, Without<Degraded>),
    >,
    mut cues: EventWriter<PresentationCue>,
) {
    let now = time.elapsed_secs();

    for (
        entity,
        transform,
        perception,
        senses,
        mut controller,
        mut state,
        mut intent,
        mut facing,
        mut machine,
        wander,
        caster,
    ) in actors.iter_mut()
    {
        if state.is_terminal() {
            continue;
        }

        let position = planar(transform);
        let offset = senses.offset_from(position);
        let is_attacking = machine.is_attacking();
        let casting = caster.is_some_and(|caster| caster.is_casting());

        // Каст призыва держит актора на месте: новые атаки не начинаем
        let selection = match offset {
            Some(offset) if !casting => machine.select(
                now,
                &AttackGeometry {
                    offset,
                    attack_range: perception.attack_range,
                    detection_range: perception.detection_range,
                    melee_ready: senses.melee_ready(perception.attack_start_buffer),
                },
            ),
            _ => None,
        };

        let desired = desired_state(
            is_attacking,
            selection.is_some(),
            senses.in_detect,
            controller.default_state,
        );

        if desired != *state {
            if *state == ControllerState::Wander {
                if let Some(mut wander) = wander {
                    wander.reset();
                }
            }
            intent.clear();

            crate::log(&format!(
                "🧠 {:?}: {:?} → {:?} (after {:.2}s)",
                entity,
                *state,
                desired,
                now - controller.entered_at
            ));
            cues.write(PresentationCue::StateEntered {
                actor: entity,
                state: desired,
            });
            controller.entered_at = now;
            *state = desired;
        }

        if desired != ControllerState::Attack || is_attacking {
            continue;
        }
        let (Some(variant), Some(offset)) = (selection, offset) else {
            continue;
        };

        if facing.look_along(offset) {
            cues.write(PresentationCue::FacingChanged {
                actor: entity,
                facing: facing.0,
            });
        }

        let target_position = position + offset;
        if machine.begin(variant, now, facing.0, senses.target, target_position) {
            crate::log(&format!(
                "⚔️ {:?} starts {:?} attack on {:?}",
                entity, variant, senses.target
            ));
            cues.write(PresentationCue::AttackStarted {
                actor: entity,
                variant,
            });
        }
    }
}

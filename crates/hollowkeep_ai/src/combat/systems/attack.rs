//! Attack routine system (Attack sub-state)

use bevy::prelude::*;

use crate::ai::{ControllerState, PresentationCue};
use crate::combat::attack::AttackMachine;
use crate::combat::events::WeaponTriggered;
use crate::combat::hitbox::{ActiveHitboxes, Hitbox};
use crate::combat::Dead;
use crate::components::{planar, Facing, VelocityIntent};
use crate::perception::Senses;

/// Система: продвинуть attack routine на один тик
///
/// Единственный writer intent'а в Attack state. Routine не прерывается
/// perception'ом; цель ушла, а атака всё равно доигрывает clip.
pub fn tick_attack_routines(
    time: Res<Time<Fixed>>,
    mut actors: Query<
        (
            Entity,
            &Transform,
            &ControllerState,
            &Senses,
            &mut Facing,
            &mut VelocityIntent,
            &mut AttackMachine,
            &mut ActiveHitboxes,
        ),
        Without<Dead>,
    >,
    mut triggers: EventWriter<WeaponTriggered>,
    mut cues: EventWriter<PresentationCue>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, state, senses, mut facing, mut intent, mut machine, mut hitboxes) in
        actors.iter_mut()
    {
        if *state != ControllerState::Attack || !machine.is_attacking() {
            continue;
        }

        let position = planar(transform);
        let tick = machine.advance(now, position, senses.target_position);
        let Some(routine) = machine.routine().cloned() else {
            continue;
        };
        let Some(spec) = machine.spec(routine.variant).cloned() else {
            continue;
        };

        // Facing залочен на время атаки
        if facing.0 != routine.facing {
            facing.0 = routine.facing;
        }

        if let Some(plan) = tick.dash_started {
            crate::log(&format!(
                "💨 {:?} dash {:.2}m along {:?}",
                entity, plan.travel_distance, plan.direction
            ));
            cues.write(PresentationCue::DashStarted {
                actor: entity,
                direction: plan.direction,
                distance: plan.travel_distance,
            });
        }

        for hit_index in tick.fired.iter().copied() {
            let Some(hit) = spec.hits.get(hit_index) else {
                continue;
            };
            hitboxes.push(Hitbox::open(routine.variant, hit_index, *hit, position, now));

            triggers.write(WeaponTriggered {
                attacker: entity,
                facing: routine.facing,
                variant: routine.variant,
                combo_index: spec.combo_index,
                hit_index,
            });
            cues.write(PresentationCue::HitFired {
                actor: entity,
                variant: routine.variant,
                hit_index,
            });
        }

        intent.set(tick.velocity);

        if tick.finished {
            if let Some(variant) = machine.finish(now) {
                crate::log(&format!("⚔️ {:?} finished {:?} attack", entity, variant));
            }
            intent.clear();
        }
    }
}

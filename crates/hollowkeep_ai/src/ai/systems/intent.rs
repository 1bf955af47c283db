//! Intent systems: Idle / Wander / Chase пишут VelocityIntent
//!
//! Каждый sub-state пишет intent только пока он активен. Attack пишет свой
//! intent в combat::systems::tick_attack_routines.

use bevy::prelude::*;

use crate::ai::components::{chase_velocity, ChaseBehavior, ControllerState, WanderBehavior};
use crate::ai::events::PresentationCue;
use crate::boss::{RetreatCycle, SummonCaster};
use crate::combat::Dead;
use crate::components::{planar, Facing, MovementSpeed, VelocityIntent};
use crate::perception::{Perception, Senses};
use crate::DeterministicRng;

/// Повернуться по направлению; cue только при смене стороны (лево/право)
fn turn_towards(
    entity: Entity,
    facing: &mut Facing,
    direction: Vec2,
    cues: &mut EventWriter<PresentationCue>,
) {
    let previous_side = facing.0.x >= 0.0;
    if facing.look_along(direction) && (facing.0.x >= 0.0) != previous_side {
        cues.write(PresentationCue::FacingChanged {
            actor: entity,
            facing: facing.0,
        });
    }
}

/// Система: Idle стоит на месте
pub fn idle_intent(mut actors: Query<(&ControllerState, &mut VelocityIntent), Without<Dead>>) {
    for (state, mut intent) in actors.iter_mut() {
        if *state == ControllerState::Idle && !intent.is_zero() {
            intent.clear();
        }
    }
}

/// Система: Wander (пауза → точка на периметре → пауза)
pub fn wander_intent(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut actors: Query<
        (
            Entity,
            &ControllerState,
            &Transform,
            &MovementSpeed,
            &mut WanderBehavior,
            &mut VelocityIntent,
            &mut Facing,
        ),
        Without<Dead>,
    >,
    mut cues: EventWriter<PresentationCue>,
) {
    let dt = time.delta_secs();

    for (entity, state, transform, speed, mut wander, mut intent, mut facing) in actors.iter_mut() {
        if *state != ControllerState::Wander {
            continue;
        }

        let velocity = wander.tick(dt, planar(transform), speed.speed, &mut rng.rng);
        intent.set(velocity);
        turn_towards(entity, &mut facing, velocity, &mut cues);
    }
}

/// Система: Chase (retreat cycle → каст призыва → преследование)
pub fn chase_intent(
    mut actors: Query<
        (
            Entity,
            &ControllerState,
            &Transform,
            &Perception,
            &Senses,
            &ChaseBehavior,
            &MovementSpeed,
            &mut VelocityIntent,
            &mut Facing,
            Option<&RetreatCycle>,
            Option<&SummonCaster>,
        ),
        Without<Dead>,
    >,
    mut cues: EventWriter<PresentationCue>,
) {
    for (
        entity,
        state,
        transform,
        perception,
        senses,
        chase,
        speed,
        mut intent,
        mut facing,
        retreat,
        caster,
    ) in actors.iter_mut()
    {
        if *state != ControllerState::Chase {
            continue;
        }

        let position = planar(transform);
        let offset = senses.offset_from(position);

        // Отступая, смотрим на цель
        if let Some(velocity) = retreat.and_then(|retreat| {
            retreat.steer(position, senses.target_position, speed.speed, facing.0)
        }) {
            intent.set(velocity);
            if let Some(offset) = offset {
                turn_towards(entity, &mut facing, offset, &mut cues);
            }
            continue;
        }

        if caster.is_some_and(|caster| caster.is_casting()) {
            intent.clear();
            if let Some(offset) = offset {
                turn_towards(entity, &mut facing, offset, &mut cues);
            }
            continue;
        }

        let stop_distance = perception.attack_range + chase.stop_buffer;
        let velocity = chase_velocity(offset, stop_distance, speed.speed, chase.steering);
        intent.set(velocity);

        if let Some(offset) = offset {
            turn_towards(entity, &mut facing, offset, &mut cues);
        }
    }
}

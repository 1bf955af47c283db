//! Spawn helpers: archetype → полный набор компонентов актора
//!
//! ```text
//! Actor (required: Transform, Health, intent/facing/knockback слоты)
//!   + Perception (required: Senses)
//!   + AiController (required: ControllerState)
//!   + AttackMachine (required: ActiveHitboxes)
//!   + опционально: SummonCaster, PhaseController, RetreatCycle, ContactDamage
//! ```

use bevy::prelude::*;

use crate::ai::{AiController, ChaseBehavior, ControllerState, WanderBehavior};
use crate::boss::{PhaseController, RetreatCycle, SummonCaster};
use crate::combat::{ActiveHitboxes, AttackMachine, ContactDamage, Dead, Defense, DespawnAfter};
use crate::components::{Actor, Health, MovementSpeed, VelocityIntent};
use crate::config::ArchetypeConfig;
use crate::perception::{Perception, Senses};
use crate::physics::{Knockback, ResolvedVelocity, Stun};

/// Spawn AI актора по archetype
pub fn spawn_archetype(commands: &mut Commands, config: &ArchetypeConfig, position: Vec2) -> Entity {
    let mut entity = commands.spawn((
        Transform::from_translation(position.extend(0.0)),
        Actor::hostile(config.body_radius),
        Health::new(config.max_health),
        Defense {
            armor: config.armor,
        },
        MovementSpeed {
            speed: config.move_speed,
        },
        Knockback::with_decay(config.knockback_decay),
        Perception::from(config.perception),
        AiController::new(config.default_state),
        ControllerState::from(config.default_state),
        AttackMachine::new(config.attack.clone()),
        ChaseBehavior::from(config.chase),
        WanderBehavior::new(position, config.wander),
    ));

    if let Some(summon) = config.summon {
        entity.insert(SummonCaster::new(summon));
    }
    if let Some(phase) = config.phase {
        entity.insert(PhaseController::new(&phase));
        if let Some(retreat) = phase.retreat {
            entity.insert(RetreatCycle::new(retreat));
        }
    }
    if let Some(contact) = config.contact {
        entity.insert(ContactDamage::from(contact));
    }

    let id = entity.id();
    crate::log(&format!("🧟 spawned '{}' {:?} at {:?}", config.name, id, position));
    id
}

/// Spawn цели (игрок): без AI, только тело на PLAYER слое
pub fn spawn_player(commands: &mut Commands, position: Vec2, max_health: u32) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Actor::player(),
            Health::new(max_health),
        ))
        .id()
}

/// Запрос respawn'а актора в точке
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RespawnRequested {
    pub actor: Entity,
    pub position: Vec2,
}

/// Система respawn: полный HP, чистый ledger, default state
pub fn respawn_actors(
    mut commands: Commands,
    mut requests: EventReader<RespawnRequested>,
    mut actors: Query<(
        &mut Transform,
        &mut Health,
        &mut VelocityIntent,
        &mut Knockback,
        &mut Stun,
        &mut ResolvedVelocity,
        Option<&mut Senses>,
        Option<(&AiController, &mut ControllerState)>,
        Option<(&mut AttackMachine, &mut ActiveHitboxes)>,
        Option<&mut WanderBehavior>,
        Option<&mut SummonCaster>,
        Option<&mut PhaseController>,
        Option<&mut RetreatCycle>,
    )>,
) {
    for request in requests.read() {
        let Ok((
            mut transform,
            mut health,
            mut intent,
            mut knockback,
            mut stun,
            mut resolved,
            senses,
            controller,
            attack,
            wander,
            summon,
            phase,
            retreat,
        )) = actors.get_mut(request.actor)
        else {
            continue;
        };

        transform.translation = request.position.extend(transform.translation.z);
        health.current = health.max;
        intent.clear();
        knockback.clear();
        *stun = Stun::default();
        resolved.0 = Vec2::ZERO;

        if let Some(mut senses) = senses {
            *senses = Senses::default();
        }
        if let Some((controller, mut state)) = controller {
            *state = controller.default_state;
        }
        if let Some((mut machine, mut hitboxes)) = attack {
            machine.cancel();
            machine.ledger.reset();
            hitboxes.clear();
        }
        if let Some(mut wander) = wander {
            wander.center = request.position;
            wander.reset();
        }
        if let Some(mut summon) = summon {
            summon.cancel();
            summon.next_ready_at = 0.0;
        }
        if let Some(mut phase) = phase {
            phase.triggered = false;
        }
        if let Some(mut retreat) = retreat {
            *retreat = RetreatCycle::new(retreat.config);
        }

        commands
            .entity(request.actor)
            .remove::<(Dead, DespawnAfter)>();

        crate::log_info(&format!(
            "✨ {:?} respawned at {:?}",
            request.actor, request.position
        ));
    }
}

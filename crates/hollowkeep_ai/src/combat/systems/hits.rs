//! Hit resolution: hitboxes и contact damage → HitLanded

use bevy::prelude::*;

use crate::combat::contact::ContactDamage;
use crate::combat::events::HitLanded;
use crate::combat::hitbox::ActiveHitboxes;
use crate::combat::Dead;
use crate::components::{planar, Actor, Facing, Health};
use crate::perception::Perception;

/// Система: overlap открытых hitboxes с целями
///
/// Одна цель получает hit instant не больше одного раза (per-swing guard).
pub fn resolve_hitboxes(
    time: Res<Time<Fixed>>,
    mut attackers: Query<
        (Entity, &Transform, &Facing, &Perception, &mut ActiveHitboxes),
        Without<Dead>,
    >,
    targets: Query<(Entity, &Transform, &Actor, &Health), Without<Dead>>,
    mut hits: EventWriter<HitLanded>,
) {
    let now = time.elapsed_secs();

    for (attacker, transform, facing, perception, mut hitboxes) in attackers.iter_mut() {
        if hitboxes.is_empty() {
            continue;
        }
        let position = planar(transform);

        for hitbox in hitboxes.boxes.iter_mut() {
            let center = hitbox.center(position, facing.0);

            for (target, target_transform, actor, health) in targets.iter() {
                if target == attacker
                    || !health.is_alive()
                    || !actor.layer.intersects(perception.target_layers)
                {
                    continue;
                }
                let target_position = planar(target_transform);
                if !hitbox.overlaps(center, target_position, actor.body_radius) {
                    continue;
                }
                if !hitbox.register(target) {
                    continue;
                }

                hits.write(HitLanded {
                    attacker,
                    target,
                    damage: hitbox.spec.damage,
                    knockback: hitbox.knockback_for(center, target_position, facing.0),
                    stun: hitbox.spec.stun,
                });
            }
        }

        hitboxes.boxes.retain(|hitbox| !hitbox.expired(now));
    }
}

/// Система: contact damage при касании тел
pub fn apply_contact_damage(
    time: Res<Time<Fixed>>,
    mut sources: Query<
        (Entity, &Transform, &Actor, &Perception, &mut ContactDamage),
        Without<Dead>,
    >,
    targets: Query<(Entity, &Transform, &Actor, &Health), Without<Dead>>,
    mut hits: EventWriter<HitLanded>,
) {
    let now = time.elapsed_secs();

    for (source, transform, body, perception, mut contact) in sources.iter_mut() {
        let position = planar(transform);

        let touching: Vec<Entity> = targets
            .iter()
            .filter(|(target, target_transform, actor, health)| {
                *target != source
                    && health.is_alive()
                    && actor.layer.intersects(perception.target_layers)
                    && {
                        let reach = body.body_radius + actor.body_radius;
                        position.distance_squared(planar(target_transform)) <= reach * reach
                    }
            })
            .map(|(target, ..)| target)
            .collect();

        if touching.is_empty() || !contact.try_trigger(now) {
            continue;
        }

        for target in touching {
            hits.write(HitLanded {
                attacker: source,
                target,
                damage: contact.damage,
                knockback: Vec2::ZERO,
                stun: 0.0,
            });
        }
    }
}

//! Damage, heal и death handling
//!
//! ```text
//! HitLanded → apply_hits → Health (armor mitigation) → ActorDamaged
//!                        → ApplyKnockback / ApplyStun
//! Health == 0 → handle_deaths → Dead, ActorDied, routine cancel
//! ```

use bevy::prelude::*;

use crate::ai::{ControllerState, PresentationCue};
use crate::boss::SummonCaster;
use crate::components::{Health, VelocityIntent};
use crate::physics::{ApplyKnockback, ApplyStun, Knockback, ResolvedVelocity};

use super::attack::AttackMachine;
use super::events::{ActorDamaged, ActorDied, ActorHealed, HealRequested, HitLanded};
use super::hitbox::ActiveHitboxes;

/// Сколько труп остаётся в мире (fade window презентации)
pub const CORPSE_LIFETIME: f32 = 1.5;

/// Маркер мёртвого актора (AI отключён навсегда)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Despawn в момент `at` (секунды симуляции)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub at: f32,
}

/// Защита актора (armor в процентах)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Defense {
    pub armor: f32,
}

/// Итоговый урон после armor: `round(raw × (1 − clamp01(armor / 100)))`
pub fn calculate_damage(raw: u32, armor: f32) -> u32 {
    let mitigation = (armor / 100.0).clamp(0.0, 1.0);
    (raw as f32 * (1.0 - mitigation)).round() as u32
}

/// Система: применить HitLanded к Health
pub fn apply_hits(
    mut hits: EventReader<HitLanded>,
    mut targets: Query<(&mut Health, Option<&Defense>), Without<Dead>>,
    mut damaged: EventWriter<ActorDamaged>,
    mut knockbacks: EventWriter<ApplyKnockback>,
    mut stuns: EventWriter<ApplyStun>,
) {
    for hit in hits.read() {
        let Ok((mut health, defense)) = targets.get_mut(hit.target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let armor = defense.map_or(0.0, |defense| defense.armor);
        let amount = health.take_damage(calculate_damage(hit.damage, armor));

        crate::log(&format!(
            "💥 {:?} hit {:?} for {} ({} left)",
            hit.attacker, hit.target, amount, health.current
        ));

        damaged.write(ActorDamaged {
            actor: hit.target,
            amount,
            remaining: health.current,
        });

        if hit.knockback != Vec2::ZERO {
            knockbacks.write(ApplyKnockback {
                target: hit.target,
                impulse: hit.knockback,
            });
        }
        if hit.stun > 0.0 {
            stuns.write(ApplyStun {
                target: hit.target,
                duration: hit.stun,
            });
        }
    }
}

/// Система: лечение (clamp к max, мёртвых не лечим)
pub fn apply_heals(
    mut requests: EventReader<HealRequested>,
    mut targets: Query<&mut Health, Without<Dead>>,
    mut healed: EventWriter<ActorHealed>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            continue;
        };
        let amount = health.heal(request.amount);
        if amount > 0 {
            healed.write(ActorHealed {
                actor: request.target,
                amount,
                current: health.current,
            });
        }
    }
}

/// Система: терминальное выключение AI при HP == 0
///
/// Отменяет attack routine (без записи cooldowns), закрывает hitboxes,
/// обнуляет intent и knockback. Запускается первой в тике и ещё раз сразу
/// после применения урона, до Physics.
pub fn handle_deaths(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut actors: Query<
        (
            Entity,
            &Health,
            &mut VelocityIntent,
            &mut Knockback,
            &mut ResolvedVelocity,
            Option<&mut ControllerState>,
            Option<&mut AttackMachine>,
            Option<&mut ActiveHitboxes>,
            Option<&mut SummonCaster>,
        ),
        Without<Dead>,
    >,
    mut died: EventWriter<ActorDied>,
    mut cues: EventWriter<PresentationCue>,
) {
    let now = time.elapsed_secs();

    for (
        entity,
        health,
        mut intent,
        mut knockback,
        mut resolved,
        state,
        machine,
        hitboxes,
        summon,
    ) in actors.iter_mut()
    {
        if health.is_alive() {
            continue;
        }

        if let Some(mut machine) = machine {
            if let Some(routine) = machine.cancel() {
                crate::log(&format!(
                    "☠️ {:?} died mid-attack ({:?}, {:?}, {}/{} hits fired)",
                    entity,
                    routine.variant,
                    routine.phase,
                    routine.hits_fired(),
                    routine.fired.len()
                ));
            }
        }
        if let Some(mut hitboxes) = hitboxes {
            hitboxes.clear();
        }
        if let Some(mut summon) = summon {
            summon.cancel();
        }
        if let Some(mut state) = state {
            *state = ControllerState::Dead;
        }

        intent.clear();
        knockback.clear();
        resolved.0 = Vec2::ZERO;

        commands.entity(entity).insert((
            Dead,
            DespawnAfter {
                at: now + CORPSE_LIFETIME,
            },
        ));

        died.write(ActorDied { actor: entity });
        cues.write(PresentationCue::Died { actor: entity });

        crate::log_info(&format!("💀 {:?} died", entity));
    }
}

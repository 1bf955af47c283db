//! Combat module: attack sub-state machine, hitboxes, damage
//!
//! ECS ответственность:
//! - Attack routine: charge → dash → scripted hits → recovery
//! - Cooldown ledger (normal/special gates + recovery window)
//! - Hit resolution: hitbox overlap, contact damage → HitLanded
//! - Damage/heal/death (armor mitigation, terminal death)
//!
//! Внешний слой (анимации, FX) получает только `WeaponTriggered` и
//! `PresentationCue`, обратно ничего не читается.

use bevy::prelude::*;

use crate::physics::{apply_impulses, compose_velocity, ApplyKnockback, ApplyStun};
use crate::SimulationSet;

pub mod attack;
pub mod contact;
pub mod cooldown;
pub mod damage;
pub mod dash;
pub mod events;
pub mod hitbox;
pub mod systems;


// Re-export основных типов
pub use attack::{AttackContext, AttackGeometry, AttackMachine, AttackPhase, AttackTick, AttackVariant};
pub use contact::ContactDamage;
pub use cooldown::CooldownLedger;
pub use damage::{calculate_damage, Dead, Defense, DespawnAfter, CORPSE_LIFETIME};
pub use dash::{face_spot, DashPlan};
pub use events::{ActorDamaged, ActorDied, ActorHealed, HealRequested, HitLanded, WeaponTriggered};
pub use hitbox::{ActiveHitboxes, Hitbox, HitboxAnchor};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. handle_deaths (Death): терминальное выключение AI, до любых решений
/// 2. tick_attack_routines (Attack): продвижение routine, hit instants
/// 3. resolve_hitboxes → apply_contact_damage → apply_hits → apply_heals → handle_deaths (Hits)
/// 4. apply_impulses → compose_velocity (Physics): intent + knockback
///
/// handle_deaths стоит дважды: умерший от удара в этом тике гасится до Physics,
/// то есть в тот же тик не двигается и не атакует.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<WeaponTriggered>()
            .add_event::<HitLanded>()
            .add_event::<ActorDamaged>()
            .add_event::<HealRequested>()
            .add_event::<ActorHealed>()
            .add_event::<ActorDied>()
            .add_event::<ApplyKnockback>()
            .add_event::<ApplyStun>();

        app.add_systems(
            FixedUpdate,
            damage::handle_deaths
                .after(crate::spawn::respawn_actors)
                .after(crate::ai::systems::ensure_controller_dependencies)
                .in_set(SimulationSet::Death),
        );

        app.add_systems(
            FixedUpdate,
            systems::tick_attack_routines.in_set(SimulationSet::Attack),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::resolve_hitboxes,
                systems::apply_contact_damage,
                damage::apply_hits,
                damage::apply_heals,
                damage::handle_deaths,
            )
                .chain()
                .in_set(SimulationSet::Hits),
        );

        app.add_systems(
            FixedUpdate,
            (apply_impulses, compose_velocity)
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}

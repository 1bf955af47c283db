//! HOLLOWKEEP combat AI
//!
//! ECS-симуляция на Bevy 0.16: perception, controller (Idle / Wander / Chase / Attack),
//! attack sub-state machine, boss escalation, knockback.
//!
//! Граница с движком:
//! - AI пишет `VelocityIntent` + presentation cues
//! - physics stepper читает `ResolvedVelocity` (intent + knockback)
//! - для headless прогона есть `HeadlessPhysicsPlugin`

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod boss;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod perception;
pub mod physics;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AiController, ControllerState, Degraded, PresentationCue};
pub use boss::{BossPlugin, MinionArchetype, PhaseController, RetreatCycle, SummonCaster, SummonRequested};
pub use combat::{
    calculate_damage, ActorDamaged, ActorDied, ActorHealed, AttackMachine, AttackVariant,
    CombatPlugin, Dead, HealRequested, HitLanded, WeaponTriggered,
};
pub use components::*;
pub use config::{ArchetypeConfig, ArchetypeLibrary, ConfigError};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use perception::{Perception, Senses};
pub use physics::{ApplyKnockback, ApplyStun, HeadlessPhysicsPlugin, Knockback, ResolvedVelocity};
pub use spawn::{spawn_archetype, spawn_player, RespawnRequested};

/// Фазы тика (FixedUpdate), выполняются строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Смерть и degraded акторы: до любых решений
    Death,
    Perception,
    /// Boss phase / retreat / summon
    Escalation,
    /// Controller transitions + старт атак
    Decision,
    /// Attack routines
    Attack,
    /// Idle / Wander / Chase intent
    Intent,
    /// Hitboxes, contact damage, health
    Hits,
    /// Knockback/stun + composition
    Physics,
    /// Интеграция позиции, despawn, spawn призванных
    Integrate,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Физика не включена: `HeadlessPhysicsPlugin` добавляется отдельно
/// (в игре ResolvedVelocity читает движок).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
        if !app.world().contains_resource::<Time<Fixed>>() {
            app.insert_resource(Time::<Fixed>::from_hz(60.0));
        }
        // Детерминистичный RNG (seed по умолчанию, если app не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Death,
                SimulationSet::Perception,
                SimulationSet::Escalation,
                SimulationSet::Decision,
                SimulationSet::Attack,
                SimulationSet::Intent,
                SimulationSet::Hits,
                SimulationSet::Physics,
                SimulationSet::Integrate,
            )
                .chain(),
        );

        app.add_event::<RespawnRequested>().add_systems(
            FixedUpdate,
            spawn::respawn_actors.in_set(SimulationSet::Death),
        );

        // Подсистемы
        app.add_plugins((CombatPlugin, AIPlugin, BossPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один fixed тик длиной `dt` (детерминированно, без wall clock)
///
/// `FixedUpdate` запускается напрямую, поэтому event буферы переключаем здесь
/// же, как `First` делает в `App::update`: событие видно два тика, затем уходит.
pub fn advance_fixed(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(FixedUpdate);
    update_simulation_events(app.world_mut());
}

fn update_simulation_events(world: &mut World) {
    fn swap<E: Event>(world: &mut World) {
        if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
            events.update();
        }
    }

    swap::<RespawnRequested>(world);
    swap::<PresentationCue>(world);
    swap::<SummonRequested>(world);
    swap::<WeaponTriggered>(world);
    swap::<HitLanded>(world);
    swap::<ActorDamaged>(world);
    swap::<HealRequested>(world);
    swap::<ActorHealed>(world);
    swap::<ActorDied>(world);
    swap::<ApplyKnockback>(world);
    swap::<ApplyStun>(world);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

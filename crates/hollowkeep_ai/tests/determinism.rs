//! Тесты детерминизма
//!
//! Одинаковый seed → идентичные результаты (wander и summon используют
//! DeterministicRng, время: только fixed ticks).

use bevy::prelude::*;
use hollowkeep_ai::*;

const DT: f32 = 1.0 / 60.0;

/// Запускает бой и возвращает snapshot позиций + здоровья
fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessPhysicsPlugin));
    app.insert_resource(MinionArchetype(ArchetypeConfig::grunt()));

    {
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, Vec2::new(3.0, 0.0), 1000);
        spawn_archetype(&mut commands, &ArchetypeConfig::grunt(), Vec2::new(-2.0, 1.0));
        spawn_archetype(&mut commands, &ArchetypeConfig::grunt(), Vec2::new(8.0, -1.0));
        spawn_archetype(&mut commands, &ArchetypeConfig::duelist(), Vec2::new(7.0, 0.2));
        spawn_archetype(&mut commands, &ArchetypeConfig::summoner(), Vec2::new(-6.0, 0.0));
    }
    app.world_mut().flush();

    for _ in 0..tick_count {
        advance_fixed(&mut app, DT);
    }

    let world = app.world_mut();
    (
        world_snapshot::<Transform>(world),
        world_snapshot::<Health>(world),
    )
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_simulation(SEED, 600);
    let second = run_simulation(SEED, 600);

    assert_eq!(
        first, second,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, 300)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

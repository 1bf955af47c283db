//! Headless симуляция HOLLOWKEEP
//!
//! Загружает archetypes (встроенные + data/archetypes.ron), ставит игрока
//! против нескольких врагов и прогоняет фиксированное число тиков.

use bevy::prelude::*;
use hollowkeep_ai::*;

const TICK: f32 = 1.0 / 60.0;
const TICKS: u32 = 1200;

fn main() {
    let seed = 42;
    init_logger();
    log_info(&format!("Starting HOLLOWKEEP headless simulation (seed: {})", seed));

    let mut library = ArchetypeLibrary::builtin();
    if let Err(error) = library.merge_ron(include_str!("../data/archetypes.ron")) {
        log_error(&format!("failed to load archetypes: {}", error));
        std::process::exit(1);
    }

    let roster = ["grunt", "swordmaster", "summoner", "bone_knight"];
    let mut configs = Vec::new();
    for name in roster {
        match library.get(name) {
            Ok(config) => configs.push(config.clone()),
            Err(error) => {
                log_error(&format!("{}", error));
                std::process::exit(1);
            }
        }
    }

    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessPhysicsPlugin));
    if let Ok(minion) = library.get("skeleton") {
        app.insert_resource(MinionArchetype(minion.clone()));
    }

    let player = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::ZERO, 500);
        for (index, config) in configs.iter().enumerate() {
            let position = Vec2::new(4.0 + index as f32 * 2.5, index as f32 * 0.3);
            spawn_archetype(&mut commands, config, position);
        }
        player
    };
    app.world_mut().flush();

    // Прогоняем тики (20 sec при 60Hz)
    for tick in 0..TICKS {
        advance_fixed(&mut app, TICK);

        if tick % 120 == 0 {
            let world = app.world_mut();
            let alive = world
                .query_filtered::<Entity, (With<AiController>, Without<Dead>)>()
                .iter(world)
                .count();
            let player_health = world
                .get::<Health>(player)
                .map_or(0, |health| health.current);
            log_info(&format!(
                "Tick {}: {} hostile actors alive, player HP {}",
                tick, alive, player_health
            ));
        }
    }

    log_info("Simulation complete!");
}

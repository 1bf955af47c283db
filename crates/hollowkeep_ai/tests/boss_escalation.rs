//! Boss escalation: phase 2 one-shot, retreat cycle, summon routine

use bevy::prelude::*;
use hollowkeep_ai::boss::RetreatPhase;
use hollowkeep_ai::*;

const DT: f32 = 1.0 / 60.0;

fn create_boss_app() -> App {
    let mut app = create_headless_app(7);
    app.add_plugins((SimulationPlugin, HeadlessPhysicsPlugin));
    track::<SummonRequested>(&mut app);
    track::<PresentationCue>(&mut app);
    app
}

fn run_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        advance_fixed(app, DT);
    }
}

/// Все события `E` за прогон (буферы живут только два тика)
#[derive(Resource)]
struct Recorded<E: Event>(Vec<E>);

fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

fn track<E: Event + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<E>(Vec::new()));
    app.add_systems(FixedUpdate, record::<E>.after(SimulationSet::Integrate));
}

fn collect_events<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

fn intent(app: &App, entity: Entity) -> Vec2 {
    app.world().get::<VelocityIntent>(entity).expect("intent").0
}

fn retreat_phase(app: &App, boss: Entity) -> RetreatPhase {
    app.world().get::<RetreatCycle>(boss).expect("retreat").phase
}

fn place(app: &mut App, entity: Entity, position: Vec2) {
    app.world_mut()
        .get_mut::<Transform>(entity)
        .expect("transform")
        .translation = position.extend(0.0);
}

fn emergency_requests(app: &App) -> Vec<SummonRequested> {
    collect_events::<SummonRequested>(app)
        .into_iter()
        .filter(|request| request.emergency)
        .collect()
}

fn hit(app: &mut App, attacker: Entity, target: Entity, damage: u32) {
    app.world_mut().send_event(HitLanded {
        attacker,
        target,
        damage,
        knockback: Vec2::ZERO,
        stun: 0.0,
    });
}

/// Summoner с 100 HP; игрок далеко (никаких кастов и атак)
fn spawn_wounded_boss(app: &mut App) -> (Entity, Entity) {
    let mut config = ArchetypeConfig::summoner();
    config.max_health = 100;

    let mut commands = app.world_mut().commands();
    let boss = spawn_archetype(&mut commands, &config, Vec2::ZERO);
    let player = spawn_player(&mut commands, Vec2::new(50.0, 0.0), 100);
    app.world_mut().flush();

    app.world_mut().entity_mut(boss).insert(Health {
        current: 25,
        max: 100,
    });
    (boss, player)
}

#[test]
fn test_phase_two_fires_once_on_threshold() {
    let mut app = create_boss_app();
    let (boss, player) = spawn_wounded_boss(&mut app);

    advance_fixed(&mut app, DT);
    assert!(!app.world().get::<PhaseController>(boss).expect("phase").triggered);

    // 7 × 0.95 → 7: 25 → 18 (ratio 0.18)
    hit(&mut app, player, boss, 7);
    run_ticks(&mut app, 2);

    assert_eq!(app.world().get::<Health>(boss).map(|h| h.current), Some(18));
    assert!(app.world().get::<PhaseController>(boss).expect("phase").triggered);

    let requests = emergency_requests(&app);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].summoner, boss);
    assert_eq!(requests[0].spawns.len(), 5);

    let retreat = app.world().get::<RetreatCycle>(boss).expect("retreat");
    assert!(matches!(retreat.phase, RetreatPhase::Retreating { .. }));
}

#[test]
fn test_phase_two_never_rearms_after_heal() {
    let mut app = create_boss_app();
    let (boss, player) = spawn_wounded_boss(&mut app);

    hit(&mut app, player, boss, 7);
    run_ticks(&mut app, 2);
    assert_eq!(emergency_requests(&app).len(), 1);

    // Лечимся выше порога и снова падаем ниже
    app.world_mut().send_event(HealRequested {
        target: boss,
        amount: 40,
    });
    run_ticks(&mut app, 2);
    assert_eq!(app.world().get::<Health>(boss).map(|h| h.current), Some(58));

    hit(&mut app, player, boss, 48);
    run_ticks(&mut app, 5);
    assert!(app.world().get::<Health>(boss).map(|h| h.current) < Some(20));

    assert_eq!(emergency_requests(&app).len(), 1);
    let escalations = collect_events::<PresentationCue>(&app)
        .into_iter()
        .filter(|cue| matches!(cue, PresentationCue::PhaseEscalated { .. }))
        .count();
    assert_eq!(escalations, 1);
}

#[test]
fn test_periodic_summon_spawns_minions() {
    let mut app = create_boss_app();
    app.insert_resource(MinionArchetype(ArchetypeConfig::grunt()));

    let config = ArchetypeConfig::summoner();
    let (boss, _player) = {
        let mut commands = app.world_mut().commands();
        let boss = spawn_archetype(&mut commands, &config, Vec2::ZERO);
        let player = spawn_player(&mut commands, Vec2::new(6.0, 0.0), 100);
        (boss, player)
    };
    app.world_mut().flush();

    advance_fixed(&mut app, DT);
    assert!(app.world().get::<SummonCaster>(boss).expect("caster").is_casting());
    // Каст: стоим на месте
    assert_eq!(intent(&app, boss), Vec2::ZERO);

    // idle delay 1.0 + cast window 2.5: до 3.5 сек никого не зовём
    run_ticks(&mut app, 200);
    assert!(collect_events::<SummonRequested>(&app).is_empty());
    assert!(app.world().get::<SummonCaster>(boss).expect("caster").is_casting());
    assert_eq!(
        app.world().get::<Transform>(boss).expect("transform").translation,
        Vec3::ZERO
    );

    run_ticks(&mut app, 15);

    let requests = collect_events::<SummonRequested>(&app);
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].emergency);
    assert_eq!(requests[0].spawns.len(), 3);
    assert!(!app.world().get::<SummonCaster>(boss).expect("caster").is_casting());

    let world = app.world_mut();
    let controllers = world
        .query_filtered::<Entity, With<AiController>>()
        .iter(world)
        .count();
    assert_eq!(controllers, 4);
}

#[test]
fn test_retreat_cycle_overrides_chase_intent() {
    let mut app = create_boss_app();
    let (boss, player) = spawn_wounded_boss(&mut app);
    // Игрок в detection и ближе trigger_distance (4.0)
    place(&mut app, player, Vec2::new(3.0, 0.0));

    hit(&mut app, player, boss, 7);
    run_ticks(&mut app, 2);
    assert_eq!(app.world().get::<ControllerState>(boss), Some(&ControllerState::Chase));

    // move_speed 1.8 × speed_multiplier 0.7
    let retreat_speed = 1.8 * 0.7;
    let mut retreat_ticks = 0;
    while matches!(retreat_phase(&app, boss), RetreatPhase::Retreating { .. }) {
        let velocity = intent(&app, boss);
        assert!(velocity.x < 0.0, "retreat must point away from target: {:?}", velocity);
        assert!((velocity.length() - retreat_speed).abs() < 1e-4);

        advance_fixed(&mut app, DT);
        retreat_ticks += 1;
        assert!(retreat_ticks <= 200, "retreat window never closed");
    }
    assert!(matches!(retreat_phase(&app, boss), RetreatPhase::Cooldown { .. }));
    assert!(retreat_ticks >= 170);

    // Cooldown: окно уязвимости, стоим
    let mut cooldown_ticks = 0;
    while matches!(retreat_phase(&app, boss), RetreatPhase::Cooldown { .. }) {
        assert_eq!(intent(&app, boss), Vec2::ZERO);

        advance_fixed(&mut app, DT);
        cooldown_ticks += 1;
        assert!(cooldown_ticks <= 150, "cooldown window never closed");
    }
    assert!(cooldown_ticks >= 110);

    // Armed, цель далеко (3.0 + ~3.8 отступа): обычный chase к цели
    assert_eq!(retreat_phase(&app, boss), RetreatPhase::Armed);
    assert!(intent(&app, boss).x > 0.0);

    // Цель снова ближе trigger_distance: новый отступ
    let boss_position = app
        .world()
        .get::<Transform>(boss)
        .expect("transform")
        .translation
        .truncate();
    place(&mut app, player, boss_position + Vec2::new(2.0, 0.0));
    advance_fixed(&mut app, DT);

    assert!(matches!(retreat_phase(&app, boss), RetreatPhase::Retreating { .. }));
    let velocity = intent(&app, boss);
    assert!(velocity.x < 0.0);
    assert!((velocity.length() - retreat_speed).abs() < 1e-4);
}

//! Призыв союзников
//!
//! ```text
//! ready + цель видна → IdleDelay (стоим) → Cast window → spawn → cooldown
//! ```
//!
//! AI только выбирает позиции и количество. Жизненный цикл призванных -
//! внешний (spawn factory), либо `spawn_summoned_minions`, если задан
//! `MinionArchetype`.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::PresentationCue;
use crate::combat::{AttackMachine, Dead};
use crate::components::planar;
use crate::config::{ArchetypeConfig, SummonConfig};
use crate::perception::Senses;
use crate::physics::Knockback;
use crate::DeterministicRng;

/// Одна точка призыва
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummonSpawn {
    pub position: Vec2,
    /// Начальная скорость "выброса" наружу
    pub launch_velocity: Vec2,
}

/// Spawn factory request
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SummonRequested {
    pub summoner: Entity,
    /// true: emergency burst фазы 2
    pub emergency: bool,
    pub spawns: Vec<SummonSpawn>,
}

/// Archetype, которым `spawn_summoned_minions` наполняет призывы
#[derive(Resource, Debug, Clone)]
pub struct MinionArchetype(pub ArchetypeConfig);

/// Радиальный паттерн: `count` точек на окружности, равномерно, со сдвигом `rotation`
pub fn summon_ring(
    origin: Vec2,
    count: u32,
    radius: f32,
    launch_speed: f32,
    rotation: f32,
) -> Vec<SummonSpawn> {
    (0..count)
        .map(|index| {
            let angle = rotation + TAU * index as f32 / count as f32;
            let direction = Vec2::from_angle(angle);
            SummonSpawn {
                position: origin + direction * radius,
                launch_velocity: direction * launch_speed,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummonCast {
    pub started_at: f32,
}

/// Что произошло за тик каста
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummonStep {
    Waiting,
    /// Cast window закончился: зовём союзников, каст завершён
    Spawn,
}

/// Периодический призыв (normal escalation)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SummonCaster {
    pub config: SummonConfig,
    pub next_ready_at: f32,
    pub cast: Option<SummonCast>,
}

impl SummonCaster {
    pub fn new(config: SummonConfig) -> Self {
        Self {
            config,
            next_ready_at: 0.0,
            cast: None,
        }
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }

    /// Начать каст, если cooldown прошёл. Повторный старт во время каста игнорируется.
    pub fn try_start(&mut self, now: f32) -> bool {
        if self.is_casting() || now < self.next_ready_at {
            return false;
        }
        self.cast = Some(SummonCast { started_at: now });
        true
    }

    /// Spawn только после idle delay и всего cast window
    pub fn tick(&mut self, now: f32) -> SummonStep {
        let Some(cast) = self.cast else {
            return SummonStep::Waiting;
        };

        if now - cast.started_at < self.config.idle_delay + self.config.cast_time {
            return SummonStep::Waiting;
        }

        self.cast = None;
        self.next_ready_at = now + self.config.cooldown;
        SummonStep::Spawn
    }

    /// Смерть: каст обрывается без призыва
    pub fn cancel(&mut self) {
        self.cast = None;
    }

    pub fn ring(&self, origin: Vec2, count: u32, rng: &mut impl Rng) -> Vec<SummonSpawn> {
        let rotation = rng.gen_range(0.0..TAU);
        summon_ring(
            origin,
            count,
            self.config.spawn_radius,
            self.config.launch_speed,
            rotation,
        )
    }
}

/// Система: периодический призыв
pub fn tick_summon_casters(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut casters: Query<
        (Entity, &Transform, &Senses, Option<&AttackMachine>, &mut SummonCaster),
        Without<Dead>,
    >,
    mut summons: EventWriter<SummonRequested>,
    mut cues: EventWriter<PresentationCue>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, senses, machine, mut caster) in casters.iter_mut() {
        let attacking = machine.is_some_and(|machine| machine.is_attacking());
        if !caster.is_casting() && senses.in_detect && !attacking && caster.try_start(now) {
            crate::log(&format!("🔮 {:?} starts summoning", entity));
            cues.write(PresentationCue::SummonCast { actor: entity });
        }

        match caster.tick(now) {
            SummonStep::Spawn => {
                let count = caster.config.normal_count;
                let spawns = caster.ring(planar(transform), count, &mut rng.rng);
                crate::log_info(&format!("🔮 {:?} summons {} allies", entity, count));
                summons.write(SummonRequested {
                    summoner: entity,
                    emergency: false,
                    spawns,
                });
            }
            SummonStep::Waiting => {}
        }
    }
}

/// Система: встроенная spawn factory (archetype из `MinionArchetype`)
pub fn spawn_summoned_minions(
    mut commands: Commands,
    mut requests: EventReader<SummonRequested>,
    minion: Res<MinionArchetype>,
) {
    for request in requests.read() {
        for spawn in &request.spawns {
            let entity = crate::spawn_archetype(&mut commands, &minion.0, spawn.position);
            let mut knockback = Knockback::with_decay(minion.0.knockback_decay);
            knockback.add_impulse(spawn.launch_velocity);
            commands.entity(entity).insert(knockback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ring_is_evenly_spaced() {
        let spawns = summon_ring(Vec2::new(1.0, 1.0), 4, 2.0, 6.0, 0.0);

        assert_eq!(spawns.len(), 4);
        for spawn in &spawns {
            assert!((spawn.position.distance(Vec2::new(1.0, 1.0)) - 2.0).abs() < 1e-4);
            assert!((spawn.launch_velocity.length() - 6.0).abs() < 1e-4);
        }
        assert!(spawns[0].position.abs_diff_eq(Vec2::new(3.0, 1.0), 1e-4));
        assert!(spawns[1].position.abs_diff_eq(Vec2::new(1.0, 3.0), 1e-4));
    }

    #[test]
    fn test_cast_timeline() {
        let mut caster = SummonCaster::new(SummonConfig::default());
        assert!(caster.try_start(1.0));
        assert!(!caster.try_start(1.5));

        // idle delay 1.0, cast window 2.5: spawn не раньше 4.5
        assert_eq!(caster.tick(2.0), SummonStep::Waiting);
        assert_eq!(caster.tick(4.4), SummonStep::Waiting);
        assert!(caster.is_casting());
        assert_eq!(caster.tick(4.5), SummonStep::Spawn);

        assert!(!caster.is_casting());
        assert_eq!(caster.next_ready_at, 16.5);
        assert_eq!(caster.tick(5.0), SummonStep::Waiting);
        assert!(!caster.try_start(10.0));
        assert!(caster.try_start(16.5));
    }

    #[test]
    fn test_spawn_waits_for_whole_cast_window() {
        let mut caster = SummonCaster::new(SummonConfig::default());
        assert!(caster.try_start(0.0));

        let dt = 1.0 / 60.0;
        let mut spawned_at = None;
        for tick in 1..=300 {
            let now = tick as f32 * dt;
            if caster.tick(now) == SummonStep::Spawn {
                spawned_at = Some(now);
                break;
            }
        }

        let spawned_at = spawned_at.expect("summon should fire");
        assert!(spawned_at >= 3.5 - 1e-4, "spawned too early: {}", spawned_at);
        assert!(spawned_at < 3.5 + dt + 1e-4);
    }

    #[test]
    fn test_ring_uses_rng_rotation() {
        let caster = SummonCaster::new(SummonConfig::default());
        let mut first = ChaCha8Rng::seed_from_u64(3);
        let mut second = ChaCha8Rng::seed_from_u64(3);

        assert_eq!(
            caster.ring(Vec2::ZERO, 3, &mut first),
            caster.ring(Vec2::ZERO, 3, &mut second)
        );
    }
}

//! Phase-2 retreat cycle
//!
//! ```text
//! Dormant ──enable──▶ Retreating ──duration──▶ Cooldown ──cooldown──▶ Armed
//!                        ▲                                          │
//!                        └──────── цель ближе trigger_distance ─────┘
//! ```
//!
//! Cooldown: окно уязвимости, стоим на месте.

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::planar;
use crate::config::RetreatConfig;
use crate::perception::Senses;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetreatPhase {
    /// Фаза 2 ещё не наступила
    Dormant,
    Retreating { until: f32 },
    Cooldown { until: f32 },
    /// Обычный chase, ждём цель ближе trigger_distance
    Armed,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RetreatCycle {
    pub config: RetreatConfig,
    pub phase: RetreatPhase,
}

impl RetreatCycle {
    pub fn new(config: RetreatConfig) -> Self {
        Self {
            config,
            phase: RetreatPhase::Dormant,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.phase != RetreatPhase::Dormant
    }

    /// Включить цикл (один раз при входе в фазу 2)
    pub fn enable(&mut self, now: f32) {
        if self.phase == RetreatPhase::Dormant {
            self.start_retreat(now);
        }
    }

    fn start_retreat(&mut self, now: f32) {
        self.phase = RetreatPhase::Retreating {
            until: now + self.config.duration,
        };
    }

    /// Продвинуть окна. `target_distance`: None, если цели нет.
    pub fn tick(&mut self, now: f32, target_distance: Option<f32>) {
        if let RetreatPhase::Retreating { until } = self.phase {
            if now >= until {
                self.phase = RetreatPhase::Cooldown {
                    until: now + self.config.cooldown,
                };
            }
        }

        if let RetreatPhase::Cooldown { until } = self.phase {
            if now >= until {
                self.phase = RetreatPhase::Armed;
            }
        }

        if self.phase == RetreatPhase::Armed {
            if target_distance.is_some_and(|distance| distance < self.config.trigger_distance) {
                self.start_retreat(now);
            }
        }
    }

    /// Перехват chase intent (Some = цикл управляет движением, None = обычный chase)
    pub fn steer(&self, position: Vec2, target: Option<Vec2>, speed: f32, facing: Vec2) -> Option<Vec2> {
        match self.phase {
            RetreatPhase::Retreating { .. } => {
                let away = target
                    .and_then(|target| (position - target).try_normalize())
                    .unwrap_or(-facing);
                Some(away * speed * self.config.speed_multiplier)
            }
            RetreatPhase::Cooldown { .. } => Some(Vec2::ZERO),
            RetreatPhase::Dormant | RetreatPhase::Armed => None,
        }
    }
}

/// Система: окна retreat cycle (работает независимо от активного sub-state)
pub fn tick_retreat_cycles(
    time: Res<Time<Fixed>>,
    mut bosses: Query<(&Transform, &Senses, &mut RetreatCycle), Without<Dead>>,
) {
    let now = time.elapsed_secs();

    for (transform, senses, mut cycle) in bosses.iter_mut() {
        if !cycle.is_enabled() {
            continue;
        }
        let before = cycle.phase;
        let distance = senses.target_position.map(|target| target.distance(planar(transform)));
        cycle.tick(now, distance);

        if std::mem::discriminant(&before) != std::mem::discriminant(&cycle.phase) {
            crate::log(&format!("🏃 retreat cycle: {:?} → {:?}", before, cycle.phase));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle() -> RetreatCycle {
        RetreatCycle::new(RetreatConfig {
            trigger_distance: 4.0,
            duration: 3.0,
            cooldown: 2.0,
            speed_multiplier: 0.7,
        })
    }

    #[test]
    fn test_dormant_until_enabled() {
        let mut cycle = cycle();
        cycle.tick(1.0, Some(1.0));
        assert_eq!(cycle.phase, RetreatPhase::Dormant);
        assert_eq!(cycle.steer(Vec2::ZERO, Some(Vec2::X), 2.0, Vec2::X), None);
    }

    #[test]
    fn test_full_cycle_rearms_when_target_close() {
        let mut cycle = cycle();
        cycle.enable(10.0);
        assert_eq!(cycle.phase, RetreatPhase::Retreating { until: 13.0 });

        cycle.tick(12.9, Some(1.0));
        assert!(matches!(cycle.phase, RetreatPhase::Retreating { .. }));

        cycle.tick(13.0, Some(1.0));
        assert_eq!(cycle.phase, RetreatPhase::Cooldown { until: 15.0 });

        // Цель близко после cooldown → снова отступаем
        cycle.tick(15.0, Some(3.0));
        assert_eq!(cycle.phase, RetreatPhase::Retreating { until: 18.0 });
    }

    #[test]
    fn test_armed_resumes_chase_when_target_far() {
        let mut cycle = cycle();
        cycle.enable(0.0);
        cycle.tick(3.0, None);
        cycle.tick(5.0, Some(6.0));
        assert_eq!(cycle.phase, RetreatPhase::Armed);
        assert_eq!(cycle.steer(Vec2::ZERO, Some(Vec2::X), 2.0, Vec2::X), None);

        cycle.tick(6.0, Some(3.5));
        assert!(matches!(cycle.phase, RetreatPhase::Retreating { .. }));
    }

    #[test]
    fn test_steer_moves_away_then_stands_still() {
        let mut cycle = cycle();
        cycle.enable(0.0);

        let velocity = cycle.steer(Vec2::ZERO, Some(Vec2::new(2.0, 0.0)), 2.0, Vec2::X);
        assert_eq!(velocity, Some(Vec2::new(-1.4, 0.0)));

        cycle.tick(3.0, Some(1.0));
        assert_eq!(cycle.steer(Vec2::ZERO, Some(Vec2::X), 2.0, Vec2::X), Some(Vec2::ZERO));
    }
}

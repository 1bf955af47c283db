//! Perception: range queries против target layer
//!
//! Каждый тик:
//! - attack circle (radius = attack_range)
//! - detection circle (radius = detection_range), только если attack circle пуст
//!
//! Пишет только `Senses` (флаги, цель, dwell timer). Никаких других side effects.

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{planar, Actor, Health, LayerMask};
use crate::config::PerceptionConfig;

/// Параметры perception актора
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Senses)]
pub struct Perception {
    pub attack_range: f32,
    pub detection_range: f32,
    pub target_layers: LayerMask,
    /// Dwell в attack circle до готовности normal атаки
    pub attack_start_buffer: f32,
}

impl Default for Perception {
    fn default() -> Self {
        Self::from(PerceptionConfig::default())
    }
}

impl From<PerceptionConfig> for Perception {
    fn from(config: PerceptionConfig) -> Self {
        Self {
            attack_range: config.attack_range,
            detection_range: config.detection_range.max(config.attack_range),
            target_layers: config.target_layers,
            attack_start_buffer: config.attack_start_buffer,
        }
    }
}

/// Результат perception на текущий тик
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Senses {
    pub in_attack: bool,
    pub in_detect: bool,
    /// Weak reference: None, если цель потеряна или мертва
    pub target: Option<Entity>,
    pub target_position: Option<Vec2>,
    /// Сколько цель непрерывно находится в attack circle
    pub in_range_time: f32,
}

impl Senses {
    /// Normal атака готова по геометрии (attack circle + dwell buffer)
    pub fn melee_ready(&self, attack_start_buffer: f32) -> bool {
        self.in_attack && self.in_range_time >= attack_start_buffer
    }

    /// target - self
    pub fn offset_from(&self, position: Vec2) -> Option<Vec2> {
        self.target_position.map(|target| target - position)
    }

    fn lose_target(&mut self) {
        self.in_attack = false;
        self.in_detect = false;
        self.target = None;
        self.target_position = None;
        self.in_range_time = 0.0;
    }
}

/// Результат одного scan
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanResult {
    pub in_attack: bool,
    pub in_detect: bool,
    pub target: Option<(Entity, Vec2)>,
}

/// Кандидат в цели: entity, позиция, радиус тела
pub type Candidate = (Entity, Vec2, f32);

/// Чистая функция scan: ближайший кандидат в attack circle, иначе в detection circle.
///
/// Круг "видит" цель, если задевает её тело (distance ≤ range + radius).
/// Attack hit переиспользуется как detection result (второй query не нужен).
/// При равной дистанции побеждает меньший entity index (детерминизм).
pub fn scan(
    origin: Vec2,
    attack_range: f32,
    detection_range: f32,
    candidates: impl IntoIterator<Item = Candidate>,
) -> ScanResult {
    let mut attack_hit: Option<(Entity, Vec2, f32)> = None;
    let mut detect_hit: Option<(Entity, Vec2, f32)> = None;

    for (entity, position, radius) in candidates {
        let distance = origin.distance(position);
        let slot = if distance <= attack_range + radius {
            &mut attack_hit
        } else if distance <= detection_range + radius {
            &mut detect_hit
        } else {
            continue;
        };
        if is_closer(*slot, entity, distance) {
            *slot = Some((entity, position, distance));
        }
    }

    match (attack_hit, detect_hit) {
        (Some((entity, position, _)), _) => ScanResult {
            in_attack: true,
            in_detect: true,
            target: Some((entity, position)),
        },
        (None, Some((entity, position, _))) => ScanResult {
            in_attack: false,
            in_detect: true,
            target: Some((entity, position)),
        },
        (None, None) => ScanResult::default(),
    }
}

fn is_closer(best: Option<(Entity, Vec2, f32)>, entity: Entity, distance: f32) -> bool {
    match best {
        None => true,
        Some((best, _, best_distance)) => {
            distance < best_distance || (distance == best_distance && entity.index() < best.index())
        }
    }
}

/// Система: обновить Senses всех AI акторов
pub fn sense_targets(
    time: Res<Time<Fixed>>,
    mut observers: Query<(Entity, &Transform, &Perception, &mut Senses), Without<Dead>>,
    candidates: Query<(Entity, &Transform, &Actor, &Health), Without<Dead>>,
) {
    let dt = time.delta_secs();

    for (entity, transform, perception, mut senses) in observers.iter_mut() {
        if perception.target_layers.is_empty() {
            senses.lose_target();
            continue;
        }

        let origin = planar(transform);
        let visible = candidates
            .iter()
            .filter(|(candidate, _, actor, health)| {
                *candidate != entity
                    && health.is_alive()
                    && actor.layer.intersects(perception.target_layers)
            })
            .map(|(candidate, transform, actor, _)| (candidate, planar(transform), actor.body_radius));

        let result = scan(
            origin,
            perception.attack_range,
            perception.detection_range,
            visible,
        );

        let previous_target = senses.target;
        match result.target {
            Some((target, position)) => {
                senses.target = Some(target);
                senses.target_position = Some(position);
                senses.in_attack = result.in_attack;
                senses.in_detect = result.in_detect;

                if result.in_attack && previous_target == Some(target) {
                    senses.in_range_time += dt;
                } else if result.in_attack {
                    senses.in_range_time = dt;
                } else {
                    senses.in_range_time = 0.0;
                }
            }
            None => senses.lose_target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_scan_prefers_attack_circle_hit() {
        let result = scan(
            Vec2::ZERO,
            1.6,
            10.0,
            [(entity(1), Vec2::new(5.0, 0.0), 0.0), (entity(2), Vec2::new(1.0, 0.5), 0.0)],
        );

        assert!(result.in_attack);
        assert!(result.in_detect);
        assert_eq!(result.target.map(|(e, _)| e), Some(entity(2)));
    }

    #[test]
    fn test_scan_detection_only() {
        let result = scan(Vec2::ZERO, 1.6, 10.0, [(entity(1), Vec2::new(2.0, 0.0), 0.3)]);

        assert!(!result.in_attack);
        assert!(result.in_detect);
        assert_eq!(result.target, Some((entity(1), Vec2::new(2.0, 0.0))));
    }

    #[test]
    fn test_scan_nothing_in_range() {
        let result = scan(Vec2::ZERO, 1.6, 10.0, [(entity(1), Vec2::new(12.0, 0.0), 0.3)]);
        assert_eq!(result, ScanResult::default());
    }

    #[test]
    fn test_scan_tie_breaks_by_index() {
        let result = scan(
            Vec2::ZERO,
            1.0,
            5.0,
            [(entity(9), Vec2::new(3.0, 0.0), 0.3), (entity(4), Vec2::new(-3.0, 0.0), 0.3)],
        );
        assert_eq!(result.target.map(|(e, _)| e), Some(entity(4)));
    }

    #[test]
    fn test_attack_circle_touches_body() {
        // 1.6 + 0.5 ≥ 2.0
        let result = scan(Vec2::ZERO, 1.6, 10.0, [(entity(1), Vec2::new(2.0, 0.0), 0.5)]);
        assert!(result.in_attack);
    }

    #[test]
    fn test_attack_hit_beats_nearer_detection_hit() {
        // e1 ближе по центру, но только e2 (толстое тело) задевает attack circle
        let result = scan(
            Vec2::ZERO,
            1.6,
            10.0,
            [(entity(1), Vec2::new(1.9, 0.0), 0.0), (entity(2), Vec2::new(2.0, 0.0), 0.5)],
        );

        assert!(result.in_attack);
        assert!(result.in_detect);
        assert_eq!(result.target, Some((entity(2), Vec2::new(2.0, 0.0))));
    }

    #[test]
    fn test_melee_ready_waits_for_buffer() {
        let mut senses = Senses {
            in_attack: true,
            in_detect: true,
            in_range_time: 0.1,
            ..Default::default()
        };
        assert!(!senses.melee_ready(0.2));

        senses.in_range_time = 0.2;
        assert!(senses.melee_ready(0.2));
        assert!(senses.melee_ready(0.0));
    }
}

//! Movement компоненты: velocity intent, facing, скорость

use bevy::prelude::*;

/// Желаемая скорость от AI на этот тик (единственный writer: активный sub-state)
///
/// Physics consumer складывает её с knockback (см. `physics::compose_velocity`).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct VelocityIntent(pub Vec2);

impl VelocityIntent {
    pub fn set(&mut self, velocity: Vec2) {
        self.0 = velocity;
    }

    pub fn clear(&mut self) {
        self.0 = Vec2::ZERO;
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Vec2::ZERO
    }
}

/// Последнее направление взгляда (нормализовано)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub Vec2);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec2::X)
    }
}

impl Facing {
    /// Обновляет facing, если direction не нулевой. Возвращает true при изменении.
    pub fn look_along(&mut self, direction: Vec2) -> bool {
        let Some(dir) = direction.try_normalize() else {
            return false;
        };
        if dir.abs_diff_eq(self.0, 1e-4) {
            return false;
        }
        self.0 = dir;
        true
    }
}

/// Скорость движения актора (метры/сек)
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 2.0 } // 2 m/s: базовая скорость ходьбы
    }
}

/// Позиция актора в 2D плоскости симуляции
pub fn planar(transform: &Transform) -> Vec2 {
    transform.translation.truncate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_ignores_zero_direction() {
        let mut facing = Facing::default();
        assert!(!facing.look_along(Vec2::ZERO));
        assert_eq!(facing.0, Vec2::X);

        assert!(facing.look_along(Vec2::new(0.0, -3.0)));
        assert_eq!(facing.0, Vec2::NEG_Y);
        assert!(!facing.look_along(Vec2::new(0.0, -1.0)));
    }
}

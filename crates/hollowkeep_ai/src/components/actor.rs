//! Базовые компоненты акторов: Actor, LayerMask, Health

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::{Knockback, ResolvedVelocity, Stun};
use super::movement::{Facing, VelocityIntent};

/// Битовая маска слоёв (на каком слое актор / какие слои считаются целями)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const PLAYER: LayerMask = LayerMask(1 << 0);
    pub const HOSTILE: LayerMask = LayerMask(1 << 1);

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Актор (игрок, враг, босс): базовый компонент для живых существ
///
/// Автоматически добавляет Health, Transform и movement слоты через Required Components.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform, Health, VelocityIntent, Facing, Knockback, Stun, ResolvedVelocity)]
pub struct Actor {
    /// Слой, на котором актор виден perception'у других
    pub layer: LayerMask,
    /// Радиус тела (contact damage, overlap с hitbox)
    pub body_radius: f32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            layer: LayerMask::HOSTILE,
            body_radius: 0.4,
        }
    }
}

impl Actor {
    pub fn player() -> Self {
        Self {
            layer: LayerMask::PLAYER,
            body_radius: 0.3,
        }
    }

    pub fn hostile(body_radius: f32) -> Self {
        Self {
            layer: LayerMask::HOSTILE,
            body_radius,
        }
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Доля оставшегося HP в [0, 1] (max == 0 считается мёртвым)
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Возвращает фактически снятое HP. Мёртвого не бьём.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    /// Возвращает фактически восстановленное HP (clamp к max).
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);

        assert_eq!(health.take_damage(30), 30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        assert_eq!(health.take_damage(100), 70); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());

        // Мёртвый больше не получает урон
        assert_eq!(health.take_damage(10), 0);
    }

    #[test]
    fn test_health_heal_clamped() {
        let mut health = Health::new(100);
        health.take_damage(50);

        assert_eq!(health.heal(30), 30);
        assert_eq!(health.current, 80);

        assert_eq!(health.heal(100), 20);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_health_ratio() {
        let mut health = Health::new(200);
        health.take_damage(150);
        assert!((health.ratio() - 0.25).abs() < 1e-6);

        assert_eq!(Health { current: 0, max: 0 }.ratio(), 0.0);
    }

    #[test]
    fn test_layer_mask() {
        let targets = LayerMask(LayerMask::PLAYER.0 | LayerMask::HOSTILE.0);
        assert!(targets.intersects(LayerMask::PLAYER));
        assert!(!LayerMask::PLAYER.intersects(LayerMask::HOSTILE));
        assert!(LayerMask::NONE.is_empty());
    }
}

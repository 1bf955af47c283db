//! Melee/AoE hitboxes, открытые scripted hits
//!
//! Каждый hit instant открывает свой hitbox с собственным already-hit списком:
//! цель, стоящая в overlap N тиков подряд, получает урон один раз на hit instant.

use bevy::prelude::*;

use crate::config::{HitShape, HitSpec};

use super::attack::AttackVariant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitboxAnchor {
    /// Едет вместе с атакующим (melee swing)
    Attacker,
    /// Зафиксирован в точке (landing AoE)
    Fixed(Vec2),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    pub variant: AttackVariant,
    pub hit_index: usize,
    pub spec: HitSpec,
    pub anchor: HitboxAnchor,
    pub expires_at: f32,
    /// Per-swing guard
    pub already_hit: Vec<Entity>,
}

impl Hitbox {
    /// Открыть hitbox в момент hit instant
    pub fn open(
        variant: AttackVariant,
        hit_index: usize,
        spec: HitSpec,
        attacker_position: Vec2,
        now: f32,
    ) -> Self {
        let anchor = match spec.shape {
            HitShape::Melee { .. } => HitboxAnchor::Attacker,
            HitShape::Area { offset_y, .. } => {
                HitboxAnchor::Fixed(attacker_position + Vec2::new(0.0, offset_y))
            }
        };

        Self {
            variant,
            hit_index,
            spec,
            anchor,
            expires_at: now + spec.active_window.max(0.0),
            already_hit: Vec::new(),
        }
    }

    pub fn center(&self, attacker_position: Vec2, facing: Vec2) -> Vec2 {
        match (self.anchor, self.spec.shape) {
            (HitboxAnchor::Fixed(point), _) => point,
            (HitboxAnchor::Attacker, HitShape::Melee { reach, .. }) => {
                attacker_position + facing * reach
            }
            (HitboxAnchor::Attacker, HitShape::Area { offset_y, .. }) => {
                attacker_position + Vec2::new(0.0, offset_y)
            }
        }
    }

    pub fn radius(&self) -> f32 {
        match self.spec.shape {
            HitShape::Melee { radius, .. } | HitShape::Area { radius, .. } => radius,
        }
    }

    pub fn overlaps(&self, center: Vec2, target_position: Vec2, target_radius: f32) -> bool {
        let reach = self.radius() + target_radius;
        center.distance_squared(target_position) <= reach * reach
    }

    /// Knockback по цели (melee по facing, AoE радиально от центра)
    pub fn knockback_for(&self, center: Vec2, target_position: Vec2, facing: Vec2) -> Vec2 {
        if self.spec.knockback <= 0.0 {
            return Vec2::ZERO;
        }
        let direction = match self.anchor {
            HitboxAnchor::Attacker => facing,
            HitboxAnchor::Fixed(_) => (target_position - center).try_normalize().unwrap_or(facing),
        };
        direction * self.spec.knockback
    }

    /// Регистрирует попадание; false, если эта цель уже получила этот hit
    pub fn register(&mut self, target: Entity) -> bool {
        if self.already_hit.contains(&target) {
            return false;
        }
        self.already_hit.push(target);
        true
    }

    pub fn expired(&self, now: f32) -> bool {
        now > self.expires_at
    }
}

/// Открытые hitboxes актора
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveHitboxes {
    pub boxes: Vec<Hitbox>,
}

impl ActiveHitboxes {
    pub fn push(&mut self, hitbox: Hitbox) {
        self.boxes.push(hitbox);
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

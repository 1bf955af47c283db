//! Combat events (fire-and-forget границы с damage/weapon системами)

use bevy::prelude::*;

use super::attack::AttackVariant;

/// Weapon trigger: attack machine дошла до scripted hit instant
///
/// Ровно одно событие на hit instant. Внешний weapon/animation слой может
/// проигрывать по нему swing; урон считает hitbox resolution.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponTriggered {
    pub attacker: Entity,
    pub facing: Vec2,
    pub variant: AttackVariant,
    pub combo_index: u32,
    /// Индекс hit instant внутри атаки (0: основной, 1+: follow-ups)
    pub hit_index: usize,
}

/// Hit попал в цель (hitbox overlap, contact damage или внешний источник)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitLanded {
    pub attacker: Entity,
    pub target: Entity,
    /// Сырой урон до armor
    pub damage: u32,
    pub knockback: Vec2,
    pub stun: f32,
}

/// Health notification: урон применён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorDamaged {
    pub actor: Entity,
    pub amount: u32,
    pub remaining: u32,
}

/// Запрос лечения (зелья, регенерация: внешние системы)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealRequested {
    pub target: Entity,
    pub amount: u32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorHealed {
    pub actor: Entity,
    pub amount: u32,
    pub current: u32,
}

/// Health notification: HP дошло до 0 (один раз на актора)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorDied {
    pub actor: Entity,
}

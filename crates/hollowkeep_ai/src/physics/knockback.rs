//! Knockback / stun: внешние возмущения поверх AI intent
//!
//! ```text
//! resolved = (stunned ? 0 : intent) + knockback
//! knockback *= exp(-decay × dt)
//! ```
//!
//! Knockback никогда не трогает состояние AI: controller продолжает писать
//! свой intent, два сигнала просто складываются на границе physics.

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::VelocityIntent;

/// Ниже этой скорости knockback обнуляется
pub const KNOCKBACK_REST_SPEED: f32 = 0.01;

/// Накопленный внешний импульс
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Knockback {
    pub velocity: Vec2,
    /// 1/сек
    pub decay_rate: f32,
}

impl Default for Knockback {
    fn default() -> Self {
        Self::with_decay(8.0)
    }
}

impl Knockback {
    pub fn with_decay(decay_rate: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            decay_rate,
        }
    }

    /// Импульсы аддитивны
    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
    }

    pub fn decay(&mut self, dt: f32) {
        self.velocity *= (-self.decay_rate.max(0.0) * dt).exp();
        if self.velocity.length_squared() < KNOCKBACK_REST_SPEED * KNOCKBACK_REST_SPEED {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn clear(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// Stun: intent игнорируется до `until`
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Stun {
    pub until: f32,
}

impl Stun {
    /// Продлевает stun, никогда не укорачивает
    pub fn extend(&mut self, now: f32, duration: f32) {
        self.until = self.until.max(now + duration.max(0.0));
    }

    pub fn is_stunned(&self, now: f32) -> bool {
        now < self.until
    }
}

/// Итоговая скорость для physics stepper
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ResolvedVelocity(pub Vec2);

/// Запрос knockback от weapon/damage системы
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ApplyKnockback {
    pub target: Entity,
    pub impulse: Vec2,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ApplyStun {
    pub target: Entity,
    pub duration: f32,
}

/// Система: применить накопленные knockback/stun запросы
pub fn apply_impulses(
    time: Res<Time<Fixed>>,
    mut knockbacks: EventReader<ApplyKnockback>,
    mut stuns: EventReader<ApplyStun>,
    mut targets: Query<(&mut Knockback, Option<&mut Stun>), Without<Dead>>,
    mut commands: Commands,
) {
    let now = time.elapsed_secs();

    for request in knockbacks.read() {
        if let Ok((mut knockback, _)) = targets.get_mut(request.target) {
            knockback.add_impulse(request.impulse);
        }
    }

    for request in stuns.read() {
        let Ok((_, stun)) = targets.get_mut(request.target) else {
            continue;
        };
        match stun {
            Some(mut stun) => stun.extend(now, request.duration),
            None => {
                let mut stun = Stun::default();
                stun.extend(now, request.duration);
                commands.entity(request.target).insert(stun);
            }
        }
    }
}

/// Система: intent + knockback → ResolvedVelocity, затем затухание knockback
pub fn compose_velocity(
    time: Res<Time<Fixed>>,
    mut bodies: Query<(
        &VelocityIntent,
        &mut Knockback,
        &mut ResolvedVelocity,
        Option<&Stun>,
        Has<Dead>,
    )>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for (intent, mut knockback, mut resolved, stun, dead) in bodies.iter_mut() {
        if dead {
            resolved.0 = Vec2::ZERO;
            continue;
        }

        let stunned = stun.is_some_and(|stun| stun.is_stunned(now));
        let base = if stunned { Vec2::ZERO } else { intent.0 };

        resolved.0 = base + knockback.velocity;
        knockback.decay(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_accumulates_and_decays() {
        let mut knockback = Knockback::with_decay(8.0);
        knockback.add_impulse(Vec2::new(4.0, 0.0));
        knockback.add_impulse(Vec2::new(0.0, 3.0));
        assert_eq!(knockback.velocity, Vec2::new(4.0, 3.0));

        knockback.decay(0.1);
        let expected = 5.0 * (-0.8f32).exp();
        assert!((knockback.velocity.length() - expected).abs() < 1e-4);

        // Через секунду гаснет до нуля
        for _ in 0..60 {
            knockback.decay(1.0 / 60.0);
        }
        assert_eq!(knockback.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_stun_extends_never_shortens() {
        let mut stun = Stun::default();
        stun.extend(1.0, 0.5);
        assert_eq!(stun.until, 1.5);

        stun.extend(1.1, 0.1);
        assert_eq!(stun.until, 1.5);

        stun.extend(1.2, 1.0);
        assert!(stun.is_stunned(2.1));
        assert!(!stun.is_stunned(2.2));
    }
}

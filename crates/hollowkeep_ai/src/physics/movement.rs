//! Headless интеграция движения (без внешнего physics stepper)
//!
//! В игре `ResolvedVelocity` читает движок. Для headless симуляции и тестов
//! интегрируем сами: position += velocity × dt.

use bevy::prelude::*;

use crate::combat::DespawnAfter;
use crate::SimulationSet;

use super::knockback::ResolvedVelocity;

/// Система интеграции ResolvedVelocity → Transform
pub fn integrate_resolved_velocity(
    mut bodies: Query<(&ResolvedVelocity, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (velocity, mut transform) in bodies.iter_mut() {
        transform.translation += velocity.0.extend(0.0) * delta;
    }
}

/// Система: убрать трупы после fade window
pub fn despawn_expired(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    corpses: Query<(Entity, &DespawnAfter)>,
) {
    let now = time.elapsed_secs();

    for (entity, despawn) in corpses.iter() {
        if now >= despawn.at {
            commands.entity(entity).despawn();
        }
    }
}

/// Plugin headless физики
///
/// Регистрирует интеграцию после compose_velocity (SimulationSet::Integrate).
pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (integrate_resolved_velocity, despawn_expired)
                .chain()
                .in_set(SimulationSet::Integrate),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_logic() {
        let mut transform = Transform::from_xyz(1.0, 2.0, 0.0);
        let velocity = ResolvedVelocity(Vec2::new(6.0, -3.0));
        let delta = 0.5;

        transform.translation += velocity.0.extend(0.0) * delta;

        assert_eq!(transform.translation, Vec3::new(4.0, 0.5, 0.0));
    }
}

//! Physics consumer boundary
//!
//! AI пишет только `VelocityIntent`. Здесь он складывается с внешним
//! knockback в `ResolvedVelocity`, который читает physics stepper.
//! `HeadlessPhysicsPlugin`: простой интегратор для headless симуляции и тестов.

pub mod knockback;
pub mod movement;

// Re-export основных типов
pub use knockback::{
    apply_impulses, compose_velocity, ApplyKnockback, ApplyStun, Knockback, ResolvedVelocity, Stun,
};
pub use movement::{despawn_expired, integrate_resolved_velocity, HeadlessPhysicsPlugin};

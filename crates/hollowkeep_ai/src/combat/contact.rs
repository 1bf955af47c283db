//! Contact damage (тело актора само наносит урон при касании)

use bevy::prelude::*;

use crate::config::ContactConfig;

/// Урон при касании тел, не чаще раза в `tick` секунд
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ContactDamage {
    pub damage: u32,
    pub tick: f32,
    pub ready_at: f32,
}

impl From<ContactConfig> for ContactDamage {
    fn from(config: ContactConfig) -> Self {
        Self {
            damage: config.damage,
            tick: config.tick,
            ready_at: 0.0,
        }
    }
}

impl ContactDamage {
    /// true: можно бить сейчас; следующий тик урона откладывается
    pub fn try_trigger(&mut self, now: f32) -> bool {
        if now < self.ready_at {
            return false;
        }
        self.ready_at = now + self.tick;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_tick_interval() {
        let mut contact = ContactDamage::from(ContactConfig {
            damage: 5,
            tick: 1.0,
        });

        assert!(contact.try_trigger(0.0));
        assert!(!contact.try_trigger(0.5));
        assert!(contact.try_trigger(1.0));
    }
}

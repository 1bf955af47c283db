//! Cooldown ledger: per-actor часы готовности атак
//!
//! Пишется только attack machine (на завершении routine). Все значения -
//! абсолютные timestamps симуляции (`Time<Fixed>::elapsed_secs`).

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct CooldownLedger {
    pub next_normal_ready_at: f32,
    pub next_special_ready_at: f32,
    pub recovery_end_at: f32,
}

impl CooldownLedger {
    /// Recovery блокирует любые новые атаки
    pub fn is_recovering(&self, now: f32) -> bool {
        now < self.recovery_end_at
    }

    pub fn normal_ready(&self, now: f32) -> bool {
        now >= self.next_normal_ready_at
    }

    pub fn special_ready(&self, now: f32, shares_normal_gate: bool) -> bool {
        now >= self.next_special_ready_at && (!shares_normal_gate || self.normal_ready(now))
    }

    /// Normal атака завершилась
    pub fn record_normal(&mut self, now: f32, cooldown: f32, recovery: f32) {
        self.next_normal_ready_at = self.next_normal_ready_at.max(now + cooldown);
        self.recovery_end_at = self.recovery_end_at.max(now + recovery);
    }

    /// Special завершилась: normal pacing тоже сдвигается
    pub fn record_special(&mut self, now: f32, cooldown: f32, special_cooldown: f32, recovery: f32) {
        self.record_normal(now, cooldown, recovery);
        self.next_special_ready_at = self.next_special_ready_at.max(now + special_cooldown);
    }

    /// Respawn
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_blocks_until_passed() {
        let mut ledger = CooldownLedger::default();
        ledger.record_normal(2.0, 1.0, 0.5);

        assert!(ledger.is_recovering(2.4));
        assert!(!ledger.is_recovering(2.5));
        assert!(!ledger.normal_ready(2.9));
        assert!(ledger.normal_ready(3.0));
    }

    #[test]
    fn test_special_shares_normal_gate() {
        let mut ledger = CooldownLedger::default();
        ledger.record_special(1.0, 1.1, 8.0, 1.5);

        assert!(!ledger.special_ready(5.0, true));
        assert!(!ledger.special_ready(5.0, false));
        assert!(ledger.special_ready(9.0, true));

        // Normal атака после special: special gate остаётся, normal двигается
        ledger.record_normal(9.5, 1.1, 0.0);
        assert!(!ledger.special_ready(10.0, true));
        assert!(ledger.special_ready(10.0, false));
    }

    #[test]
    fn test_ledger_is_monotonic() {
        let mut ledger = CooldownLedger::default();
        ledger.record_special(0.0, 1.0, 8.0, 0.0);
        let special_at = ledger.next_special_ready_at;

        // Более ранний timestamp не откатывает часы назад
        ledger.record_special(-5.0, 1.0, 1.0, 0.0);
        assert_eq!(ledger.next_special_ready_at, special_at);

        ledger.reset();
        assert_eq!(ledger, CooldownLedger::default());
    }
}

//! Boss phase controller (one-shot эскалация по HP)
//!
//! Health ratio ≤ threshold → emergency burst призыва + включение retreat cycle.
//! Срабатывает ровно один раз за жизнь, лечение выше порога не re-arm'ит.

use bevy::prelude::*;

use crate::ai::PresentationCue;
use crate::combat::Dead;
use crate::components::{planar, Health};
use crate::config::{PhaseConfig, SummonConfig};
use crate::DeterministicRng;

use super::retreat::RetreatCycle;
use super::summon::{SummonCaster, SummonRequested};

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhaseController {
    pub threshold: f32,
    pub emergency_count: u32,
    pub triggered: bool,
}

impl PhaseController {
    pub fn new(config: &PhaseConfig) -> Self {
        Self {
            threshold: config.threshold,
            emergency_count: config.emergency_count,
            triggered: false,
        }
    }

    /// true ровно в тот тик, когда порог пересечён впервые
    pub fn observe(&mut self, health_ratio: f32) -> bool {
        if self.triggered || health_ratio > self.threshold {
            return false;
        }
        self.triggered = true;
        true
    }
}

/// Система: проверка порога фазы 2
pub fn update_phase_controllers(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &Health,
            &mut PhaseController,
            Option<&mut RetreatCycle>,
            Option<&SummonCaster>,
        ),
        Without<Dead>,
    >,
    mut summons: EventWriter<SummonRequested>,
    mut cues: EventWriter<PresentationCue>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, health, mut phase, retreat, caster) in bosses.iter_mut() {
        if !phase.observe(health.ratio()) {
            continue;
        }

        crate::log_info(&format!(
            "🔥 {:?} enters phase 2 at {}/{} HP",
            entity, health.current, health.max
        ));
        cues.write(PresentationCue::PhaseEscalated { actor: entity });

        if phase.emergency_count > 0 {
            let caster = caster
                .copied()
                .unwrap_or_else(|| SummonCaster::new(SummonConfig::default()));
            let spawns = caster.ring(planar(transform), phase.emergency_count, &mut rng.rng);
            summons.write(SummonRequested {
                summoner: entity,
                emergency: true,
                spawns,
            });
        }

        if let Some(mut retreat) = retreat {
            retreat.enable(now);
        }
    }
}

//! Boss escalation
//!
//! - phase: one-shot переход по HP ratio (emergency summon + retreat cycle)
//! - retreat: Retreating → Cooldown → re-arm, поверх chase
//! - summon: периодический призыв (normal escalation), не зависит от фазы

use bevy::prelude::*;

use crate::SimulationSet;

pub mod phase;
pub mod retreat;
pub mod summon;

pub use phase::{update_phase_controllers, PhaseController};
pub use retreat::{tick_retreat_cycles, RetreatCycle, RetreatPhase};
pub use summon::{
    spawn_summoned_minions, summon_ring, tick_summon_casters, MinionArchetype, SummonCast,
    SummonCaster, SummonRequested, SummonSpawn, SummonStep,
};

/// Boss Plugin
///
/// Порядок выполнения (SimulationSet::Escalation):
/// 1. update_phase_controllers: HP threshold → emergency escalation
/// 2. tick_retreat_cycles: окна retreat/cooldown/re-arm
/// 3. tick_summon_casters: периодический призыв
///
/// spawn_summoned_minions работает только при наличии `MinionArchetype`.
pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SummonRequested>();

        app.add_systems(
            FixedUpdate,
            (
                update_phase_controllers,
                tick_retreat_cycles,
                tick_summon_casters,
            )
                .chain()
                .in_set(SimulationSet::Escalation),
        );

        app.add_systems(
            FixedUpdate,
            spawn_summoned_minions
                .run_if(resource_exists::<MinionArchetype>)
                .after(crate::physics::despawn_expired)
                .in_set(SimulationSet::Integrate),
        );
    }
}

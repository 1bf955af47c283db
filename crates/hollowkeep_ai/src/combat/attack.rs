//! Attack sub-state machine (normal + special, все archetypes)
//!
//! # Architecture
//!
//! Routine: явное resumable состояние (фаза + elapsed), которое controller
//! продвигает раз в тик. Ничего не блокирует, ожидания: это сравнение
//! elapsed с offsets из `AttackSpec`.
//!
//! ```text
//! select (gate) → begin
//!   ↓
//! Charging (facing залочен, intent = 0)
//!   ↓ elapsed ≥ charge_time: commit
//! Dashing (если есть dash: DashPlan, intent = direction × speed)
//!   ↓ reached / окно кончилось
//! Striking (ждём scripted hits)
//!   ↓ все hits отработали
//! Recovering (хвост clip)
//!   ↓ elapsed ≥ clip_length
//! finish → CooldownLedger (next ready + recovery window)
//! ```
//!
//! Смерть единственная отмена, `cancel` сбрасывает routine без записи в ledger.

use bevy::prelude::*;

use crate::config::{
    AttackProfile, AttackSpec, DashSpeedMode, HitTiming, RangeBound, RangeMetric, SpecialRange,
};

use super::cooldown::CooldownLedger;
use super::dash::{face_spot, DashPlan};
use super::hitbox::ActiveHitboxes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AttackVariant {
    Normal,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackPhase {
    /// Telegraph
    Charging,
    Dashing,
    /// Ждём оставшиеся scripted hits
    Striking,
    /// Все hits отработали, доигрываем clip
    Recovering,
}

/// Геометрия цели на этот тик (для gate'а)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackGeometry {
    /// target - self
    pub offset: Vec2,
    pub attack_range: f32,
    pub detection_range: f32,
    /// Цель в attack circle дольше attack start buffer
    pub melee_ready: bool,
}

/// Запись текущей атаки (живёт от begin до finish/cancel)
#[derive(Debug, Clone, PartialEq)]
pub struct AttackContext {
    pub variant: AttackVariant,
    pub phase: AttackPhase,
    pub started_at: f32,
    pub elapsed: f32,
    /// Направление, захваченное в момент begin
    pub facing: Vec2,
    pub target: Option<Entity>,
    /// Последняя известная позиция цели
    pub target_position: Vec2,
    pub dash: Option<DashPlan>,
    /// Флаг на каждый scripted hit
    pub fired: Vec<bool>,
}

impl AttackContext {
    pub fn hits_fired(&self) -> usize {
        self.fired.iter().filter(|fired| **fired).count()
    }

    fn all_fired(&self) -> bool {
        self.fired.iter().all(|fired| *fired)
    }
}

/// Результат одного `advance`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackTick {
    /// Intent, который attack state пишет в этот тик
    pub velocity: Vec2,
    /// Индексы hits (в `AttackSpec::hits`), сработавших в этот тик
    pub fired: Vec<usize>,
    pub dash_started: Option<DashPlan>,
    /// Clip закончился: вызывающий должен сделать `finish`
    pub finished: bool,
}

/// Attack machine актора: профиль, ledger, текущая routine
#[derive(Component, Debug, Clone)]
#[require(ActiveHitboxes)]
pub struct AttackMachine {
    pub profile: AttackProfile,
    pub ledger: CooldownLedger,
    routine: Option<AttackContext>,
}

impl AttackMachine {
    pub fn new(profile: AttackProfile) -> Self {
        Self {
            profile,
            ledger: CooldownLedger::default(),
            routine: None,
        }
    }

    /// IsAttacking
    pub fn is_attacking(&self) -> bool {
        self.routine.is_some()
    }

    pub fn routine(&self) -> Option<&AttackContext> {
        self.routine.as_ref()
    }

    pub fn spec(&self, variant: AttackVariant) -> Option<&AttackSpec> {
        spec_for(&self.profile, variant)
    }

    /// Какую атаку можно начать прямо сейчас (special приоритетнее).
    ///
    /// None: gate закрыт (атакуем, recovery, cooldown, alignment, range).
    pub fn select(&self, now: f32, geometry: &AttackGeometry) -> Option<AttackVariant> {
        if self.is_attacking() || self.ledger.is_recovering(now) {
            return None;
        }

        if let Some(cap) = self.profile.y_hard_cap {
            if geometry.offset.y.abs() > cap {
                return None;
            }
        }

        if let Some(special) = &self.profile.special {
            let reach = special.attack.dash_reach();
            if self.ledger.special_ready(now, special.shares_normal_gate)
                && special.range.contains(geometry, reach)
            {
                return Some(AttackVariant::Special);
            }
        }

        if self.ledger.normal_ready(now) && geometry.melee_ready {
            return Some(AttackVariant::Normal);
        }

        None
    }

    /// Начать routine. Повторный запрос во время атаки игнорируется (false).
    pub fn begin(
        &mut self,
        variant: AttackVariant,
        now: f32,
        facing: Vec2,
        target: Option<Entity>,
        target_position: Vec2,
    ) -> bool {
        if self.is_attacking() {
            return false;
        }
        let Some(spec) = self.spec(variant) else {
            return false;
        };

        self.routine = Some(AttackContext {
            variant,
            phase: AttackPhase::Charging,
            started_at: now,
            elapsed: 0.0,
            facing,
            target,
            target_position,
            dash: None,
            fired: vec![false; spec.hits.len()],
        });
        true
    }

    /// Продвинуть routine до `now`.
    ///
    /// `target_position`: текущая позиция цели, если она ещё видна; до commit
    /// она уточняет точку прицеливания dash.
    pub fn advance(&mut self, now: f32, position: Vec2, target_position: Option<Vec2>) -> AttackTick {
        let mut tick = AttackTick::default();

        let Some(ctx) = self.routine.as_mut() else {
            return tick;
        };
        let Some(spec) = spec_for(&self.profile, ctx.variant) else {
            tick.finished = true;
            return tick;
        };

        ctx.elapsed = (now - ctx.started_at).max(0.0);

        if ctx.phase == AttackPhase::Charging {
            if let Some(target_position) = target_position {
                ctx.target_position = target_position;
            }

            if ctx.elapsed >= spec.charge_time {
                match spec.dash {
                    Some(dash) => {
                        let aim = match dash.stop_short {
                            Some(stop_short) => face_spot(position, ctx.target_position, stop_short),
                            None => ctx.target_position,
                        };
                        let plan = match dash.speed_mode {
                            DashSpeedMode::Fixed => {
                                DashPlan::solve(position, aim, dash.speed, spec.dash_time(), ctx.facing)
                            }
                            DashSpeedMode::FitWindow => DashPlan::solve_fitted(
                                position,
                                aim,
                                dash.speed,
                                spec.dash_time(),
                                ctx.facing,
                            ),
                        };
                        ctx.dash = Some(plan);
                        ctx.phase = AttackPhase::Dashing;
                        tick.dash_started = Some(plan);
                        fire_matching(spec, ctx, &mut tick, |at| at == HitTiming::DashStart);
                    }
                    None => ctx.phase = AttackPhase::Striking,
                }
            }
        }

        if ctx.phase == AttackPhase::Dashing {
            let reached = ctx.dash.map_or(true, |plan| plan.reached(position));
            if reached || ctx.elapsed >= spec.dash_deadline() {
                ctx.phase = AttackPhase::Striking;
                fire_matching(spec, ctx, &mut tick, |at| at == HitTiming::DashEnd);
            } else if let Some(plan) = ctx.dash {
                tick.velocity = plan.velocity();
            }
        }

        let elapsed = ctx.elapsed;
        fire_matching(spec, ctx, &mut tick, |at| {
            matches!(at, HitTiming::Offset(offset) if elapsed >= offset)
        });

        if ctx.phase == AttackPhase::Striking && ctx.all_fired() {
            ctx.phase = AttackPhase::Recovering;
        }

        if ctx.elapsed >= spec.clip_length {
            tick.velocity = Vec2::ZERO;
            tick.finished = true;
        }

        tick
    }

    /// Успешное завершение: пишем ledger, сбрасываем routine
    pub fn finish(&mut self, now: f32) -> Option<AttackVariant> {
        let ctx = self.routine.take()?;
        let cooldown = self.profile.cooldown;

        match ctx.variant {
            AttackVariant::Normal => {
                self.ledger
                    .record_normal(now, cooldown, self.profile.normal.recovery);
            }
            AttackVariant::Special => {
                if let Some(special) = &self.profile.special {
                    self.ledger.record_special(
                        now,
                        cooldown,
                        special.cooldown,
                        special.attack.recovery,
                    );
                }
            }
        }

        Some(ctx.variant)
    }

    /// Отмена (смерть): ledger не трогаем
    pub fn cancel(&mut self) -> Option<AttackContext> {
        self.routine.take()
    }
}

fn spec_for(profile: &AttackProfile, variant: AttackVariant) -> Option<&AttackSpec> {
    match variant {
        AttackVariant::Normal => Some(&profile.normal),
        AttackVariant::Special => profile.special.as_ref().map(|special| &special.attack),
    }
}

fn fire_matching(
    spec: &AttackSpec,
    ctx: &mut AttackContext,
    tick: &mut AttackTick,
    due: impl Fn(HitTiming) -> bool,
) {
    for (index, hit) in spec.hits.iter().enumerate() {
        if ctx.fired[index] || !due(hit.at) {
            continue;
        }
        ctx.fired[index] = true;
        tick.fired.push(index);
    }
}

impl RangeBound {
    pub fn resolve(&self, attack_range: f32, detection_range: f32, dash_reach: f32) -> f32 {
        match *self {
            RangeBound::AttackRange(scale) => attack_range * scale,
            RangeBound::DetectionRange => detection_range,
            RangeBound::DashReach => attack_range + dash_reach,
            RangeBound::Fixed(distance) => distance,
        }
    }
}

impl SpecialRange {
    /// inner ≤ distance ≤ outer
    pub fn contains(&self, geometry: &AttackGeometry, dash_reach: f32) -> bool {
        let distance = match self.metric {
            RangeMetric::Euclidean => geometry.offset.length(),
            RangeMetric::Horizontal => geometry.offset.x.abs(),
        };
        let inner = self
            .inner
            .resolve(geometry.attack_range, geometry.detection_range, dash_reach);
        let outer = self
            .outer
            .resolve(geometry.attack_range, geometry.detection_range, dash_reach);

        distance >= inner && distance <= outer
    }
}

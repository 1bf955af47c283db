//! Archetype configuration (один record на вид врага/босса)
//!
//! Все варианты врагов и боссов: это один параметризованный controller +
//! attack machine. Различия между ними живут здесь, в данных:
//! - ranges, скорости, длительности фаз атаки
//! - dash (скорость, окно, stop-short)
//! - scripted hit instants (offset / dash start / dash end)
//! - правило special range (annulus от dash reach или фиксированный диапазон)
//! - phase-2 escalation (emergency summon, retreat cycle)
//!
//! Записи сериализуются через serde (RON data files, см. `library`).

use serde::{Deserialize, Serialize};

use crate::components::LayerMask;

pub mod library;
pub mod presets;


pub use library::{ArchetypeLibrary, ConfigError};

/// Полная конфигурация archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeConfig {
    /// Уникальное имя (ключ в `ArchetypeLibrary`)
    pub name: String,
    pub max_health: u32,
    /// Armor в процентах (0..100, clamp при расчёте урона)
    pub armor: f32,
    pub body_radius: f32,
    pub move_speed: f32,
    /// Скорость затухания knockback (1/сек, экспонента)
    pub knockback_decay: f32,
    pub perception: PerceptionConfig,
    /// Состояние, в которое controller падает без цели
    pub default_state: DefaultState,
    pub wander: WanderConfig,
    pub chase: ChaseConfig,
    pub attack: AttackProfile,
    pub summon: Option<SummonConfig>,
    pub phase: Option<PhaseConfig>,
    pub contact: Option<ContactConfig>,
}

impl Default for ArchetypeConfig {
    fn default() -> Self {
        Self::grunt()
    }
}

/// Ranges и target layer для perception
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    pub attack_range: f32,
    pub detection_range: f32,
    pub target_layers: LayerMask,
    /// Сколько цель должна простоять в attack circle до первой normal атаки
    pub attack_start_buffer: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            attack_range: 1.2,
            detection_range: 3.0,
            target_layers: LayerMask::PLAYER,
            attack_start_buffer: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefaultState {
    #[default]
    Idle,
    Wander,
}

/// Блуждание по периметру прямоугольника вокруг точки спавна
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub width: f32,
    pub height: f32,
    /// Пауза между переходами (секунды)
    pub pause: f32,
    pub arrive_distance: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 4.0,
            pause: 1.0,
            arrive_distance: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    /// Запас к attack range, внутри которого chase стоит на месте
    pub stop_buffer: f32,
    pub steering: ChaseSteering,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            stop_buffer: 0.1,
            steering: ChaseSteering::Direct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChaseSteering {
    /// Прямо на цель
    Direct,
    /// Сначала выравниваемся по вертикали, если |dy| > band
    AlignFirst { y_align_band: f32 },
}

/// Набор атак актора + общий pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    /// Cooldown normal атаки (общий pacing floor)
    pub cooldown: f32,
    /// |target.y - self.y| ≤ cap; None: без vertical gate
    pub y_hard_cap: Option<f32>,
    pub normal: AttackSpec,
    pub special: Option<SpecialSpec>,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self {
            cooldown: 1.0,
            y_hard_cap: None,
            normal: AttackSpec::default(),
            special: None,
        }
    }
}

/// Тайминги одной атаки (все offsets: от начала routine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackSpec {
    /// Telegraph: facing залочен, движения нет
    pub charge_time: f32,
    /// Полная длина routine (IsAttacking == true всё это время)
    pub clip_length: f32,
    /// Окно уязвимости после завершения
    pub recovery: f32,
    /// Передаётся в weapon trigger
    pub combo_index: u32,
    pub dash: Option<DashSpec>,
    pub hits: Vec<HitSpec>,
}

impl Default for AttackSpec {
    fn default() -> Self {
        Self {
            charge_time: 0.15,
            clip_length: 0.45,
            recovery: 0.0,
            combo_index: 0,
            dash: None,
            hits: vec![HitSpec::default()],
        }
    }
}

impl AttackSpec {
    /// Момент окончания dash окна (или commit, если dash нет)
    pub fn dash_deadline(&self) -> f32 {
        match &self.dash {
            Some(dash) => (self.charge_time + dash.window).min(self.clip_length),
            None => self.charge_time,
        }
    }

    /// Время движения после commit (окно, обрезанное концом clip)
    pub fn dash_time(&self) -> f32 {
        (self.dash_deadline() - self.charge_time).max(0.0)
    }

    /// Сколько dash успевает пройти; 0 без dash
    pub fn dash_reach(&self) -> f32 {
        self.dash
            .map(|dash| dash.speed * self.dash_time())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialSpec {
    pub cooldown: f32,
    /// Special дополнительно ждёт normal cooldown
    pub shares_normal_gate: bool,
    pub range: SpecialRange,
    pub attack: AttackSpec,
}

/// Dash, запускаемый в момент commit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashSpec {
    /// Максимальная скорость (м/с)
    pub speed: f32,
    /// Доступное время движения (секунды после commit)
    pub window: f32,
    pub speed_mode: DashSpeedMode,
    /// Останавливаемся на этом расстоянии по X до цели (face spot)
    pub stop_short: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashSpeedMode {
    /// Всегда `speed`
    Fixed,
    /// Скорость подбирается так, чтобы прийти ровно к концу окна (≤ speed)
    FitWindow,
}

/// Когда срабатывает hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitTiming {
    /// Секунды от начала routine
    Offset(f32),
    /// В момент commit (начало dash)
    DashStart,
    /// Когда dash остановился (landing)
    DashEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitShape {
    /// Круг перед атакующим, едет вместе с ним
    Melee { reach: f32, radius: f32 },
    /// Круг вокруг точки приземления (фиксируется в момент hit)
    Area { radius: f32, offset_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitSpec {
    pub at: HitTiming,
    pub damage: u32,
    pub shape: HitShape,
    /// Сколько hitbox остаётся активным после срабатывания
    pub active_window: f32,
    /// Импульс knockback по цели (м/с)
    pub knockback: f32,
    pub stun: f32,
}

impl Default for HitSpec {
    fn default() -> Self {
        Self {
            at: HitTiming::Offset(0.15),
            damage: 10,
            shape: HitShape::Melee {
                reach: 0.6,
                radius: 0.6,
            },
            active_window: 0.1,
            knockback: 0.0,
            stun: 0.0,
        }
    }
}

/// Annulus для special: inner ≤ distance ≤ outer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialRange {
    pub inner: RangeBound,
    pub outer: RangeBound,
    pub metric: RangeMetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeBound {
    /// attack_range × scale
    AttackRange(f32),
    DetectionRange,
    /// attack_range + dash reach
    DashReach,
    Fixed(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMetric {
    Euclidean,
    /// Только |dx| (вертикаль отдана y_hard_cap)
    Horizontal,
}

/// Периодический призыв союзников (normal escalation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummonConfig {
    pub cooldown: f32,
    /// Стоим на месте перед кастом
    pub idle_delay: f32,
    pub cast_time: f32,
    pub normal_count: u32,
    pub spawn_radius: f32,
    pub launch_speed: f32,
}

impl Default for SummonConfig {
    fn default() -> Self {
        Self {
            cooldown: 12.0,
            idle_delay: 1.0,
            cast_time: 2.5,
            normal_count: 3,
            spawn_radius: 2.0,
            launch_speed: 6.0,
        }
    }
}

/// Boss phase 2 (one-shot по HP ratio)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub threshold: f32,
    pub emergency_count: u32,
    pub retreat: Option<RetreatConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetreatConfig {
    /// Цель ближе: снова отступаем после cooldown
    pub trigger_distance: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub speed_multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    pub damage: u32,
    /// Минимальный интервал между тиками урона
    pub tick: f32,
}

impl ArchetypeConfig {
    /// Проверка согласованности record'а (вызывается при загрузке)
    pub fn validate(&self) -> Result<(), String> {
        let perception = &self.perception;
        if perception.attack_range < 0.0 {
            return Err("attack_range must be non-negative".into());
        }
        if perception.detection_range < perception.attack_range {
            return Err(format!(
                "detection_range {} is smaller than attack_range {}",
                perception.detection_range, perception.attack_range
            ));
        }
        if self.move_speed < 0.0 {
            return Err("move_speed must be non-negative".into());
        }

        validate_attack("normal", &self.attack.normal)?;
        if let Some(special) = &self.attack.special {
            validate_attack("special", &special.attack)?;
            if special.cooldown <= 0.0 {
                return Err("special cooldown must be positive".into());
            }
        }
        if self.attack.cooldown <= 0.0 {
            return Err("attack cooldown must be positive".into());
        }

        if let Some(phase) = &self.phase {
            if phase.threshold <= 0.0 || phase.threshold >= 1.0 {
                return Err(format!("phase threshold {} outside (0, 1)", phase.threshold));
            }
        }
        if let Some(summon) = &self.summon {
            if summon.cooldown <= 0.0 {
                return Err("summon cooldown must be positive".into());
            }
        }
        Ok(())
    }
}

fn validate_attack(label: &str, spec: &AttackSpec) -> Result<(), String> {
    if spec.clip_length <= 0.0 {
        return Err(format!("{label} clip_length must be positive"));
    }
    if spec.charge_time < 0.0 || spec.charge_time > spec.clip_length {
        return Err(format!("{label} charge_time must lie inside the clip"));
    }
    if let Some(dash) = &spec.dash {
        if dash.speed <= 0.0 || dash.window <= 0.0 {
            return Err(format!("{label} dash needs positive speed and window"));
        }
    }
    for hit in &spec.hits {
        match hit.at {
            HitTiming::Offset(at) if at < 0.0 || at > spec.clip_length => {
                return Err(format!("{label} hit at {at} falls outside the clip"));
            }
            HitTiming::DashStart | HitTiming::DashEnd if spec.dash.is_none() => {
                return Err(format!("{label} dash-timed hit without a dash"));
            }
            _ => {}
        }
    }
    Ok(())
}

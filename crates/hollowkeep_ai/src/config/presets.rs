//! Встроенные archetypes
//!
//! Числа сняты с настроенных в игре врагов. Data files (`data/archetypes.ron`)
//! могут переопределить любой из них по имени.

use super::*;

impl ArchetypeConfig {
    /// Обычный melee враг: блуждает, догоняет, бьёт один раз
    pub fn grunt() -> Self {
        Self {
            name: "grunt".into(),
            max_health: 30,
            armor: 0.0,
            body_radius: 0.4,
            move_speed: 1.5,
            knockback_decay: 8.0,
            perception: PerceptionConfig::default(),
            default_state: DefaultState::Wander,
            wander: WanderConfig::default(),
            chase: ChaseConfig::default(),
            attack: AttackProfile {
                cooldown: 1.0,
                y_hard_cap: None,
                normal: AttackSpec {
                    charge_time: 0.15,
                    clip_length: 0.45,
                    recovery: 0.0,
                    combo_index: 0,
                    dash: None,
                    hits: vec![HitSpec {
                        at: HitTiming::Offset(0.15),
                        damage: 10,
                        shape: HitShape::Melee {
                            reach: 0.6,
                            radius: 0.6,
                        },
                        active_window: 0.1,
                        knockback: 3.0,
                        stun: 0.0,
                    }],
                },
                special: None,
            },
            summon: None,
            phase: None,
            contact: Some(ContactConfig {
                damage: 5,
                tick: 1.0,
            }),
        }
    }

    /// Дуэлянт: normal удар + рывок через весь detection band
    pub fn duelist() -> Self {
        Self {
            name: "duelist".into(),
            max_health: 300,
            armor: 10.0,
            body_radius: 0.5,
            move_speed: 2.0,
            knockback_decay: 10.0,
            perception: PerceptionConfig {
                attack_range: 1.5,
                detection_range: 8.0,
                target_layers: LayerMask::PLAYER,
                attack_start_buffer: 0.0,
            },
            default_state: DefaultState::Idle,
            wander: WanderConfig::default(),
            chase: ChaseConfig {
                stop_buffer: 0.1,
                steering: ChaseSteering::AlignFirst { y_align_band: 0.35 },
            },
            attack: AttackProfile {
                cooldown: 1.1,
                y_hard_cap: Some(0.55),
                normal: AttackSpec {
                    charge_time: 0.25,
                    clip_length: 0.45,
                    recovery: 0.5,
                    combo_index: 1,
                    dash: None,
                    hits: vec![HitSpec {
                        at: HitTiming::Offset(0.25),
                        damage: 15,
                        shape: HitShape::Melee {
                            reach: 0.8,
                            radius: 0.7,
                        },
                        active_window: 0.1,
                        knockback: 4.0,
                        stun: 0.0,
                    }],
                },
                special: Some(SpecialSpec {
                    cooldown: 8.0,
                    shares_normal_gate: true,
                    range: SpecialRange {
                        inner: RangeBound::AttackRange(1.0),
                        outer: RangeBound::DetectionRange,
                        metric: RangeMetric::Euclidean,
                    },
                    attack: AttackSpec {
                        charge_time: 0.5,
                        clip_length: 1.5,
                        recovery: 1.5,
                        combo_index: 2,
                        dash: Some(DashSpec {
                            speed: 9.0,
                            window: 1.0,
                            speed_mode: DashSpeedMode::Fixed,
                            stop_short: None,
                        }),
                        hits: vec![HitSpec {
                            at: HitTiming::DashStart,
                            damage: 20,
                            shape: HitShape::Melee {
                                reach: 0.6,
                                radius: 0.8,
                            },
                            active_window: 1.0,
                            knockback: 6.0,
                            stun: 0.3,
                        }],
                    },
                }),
            },
            summon: None,
            phase: None,
            contact: None,
        }
    }

    /// Мастер меча: special только если рывок реально дотягивается,
    /// останавливается перед целью и бьёт дважды
    pub fn swordmaster() -> Self {
        let charge = 0.5;
        let hit_time = 1.05;
        let pre_hit_bias = 0.02;
        let follow_up_gap = 0.14;

        Self {
            name: "swordmaster".into(),
            max_health: 400,
            armor: 15.0,
            body_radius: 0.5,
            move_speed: 2.0,
            knockback_decay: 10.0,
            perception: PerceptionConfig {
                attack_range: 1.4,
                detection_range: 10.0,
                target_layers: LayerMask::PLAYER,
                attack_start_buffer: 0.0,
            },
            default_state: DefaultState::Idle,
            wander: WanderConfig::default(),
            chase: ChaseConfig {
                stop_buffer: 0.1,
                steering: ChaseSteering::AlignFirst { y_align_band: 0.35 },
            },
            attack: AttackProfile {
                cooldown: 1.1,
                y_hard_cap: Some(0.55),
                normal: AttackSpec {
                    charge_time: 0.25,
                    clip_length: 0.45,
                    recovery: 0.0,
                    combo_index: 1,
                    dash: None,
                    hits: vec![HitSpec {
                        at: HitTiming::Offset(0.25),
                        damage: 15,
                        shape: HitShape::Melee {
                            reach: 0.8,
                            radius: 0.7,
                        },
                        active_window: 0.1,
                        knockback: 4.0,
                        stun: 0.0,
                    }],
                },
                special: Some(SpecialSpec {
                    cooldown: 8.0,
                    shares_normal_gate: true,
                    range: SpecialRange {
                        inner: RangeBound::AttackRange(1.2),
                        outer: RangeBound::DashReach,
                        metric: RangeMetric::Horizontal,
                    },
                    attack: AttackSpec {
                        charge_time: charge,
                        clip_length: 1.5,
                        recovery: 0.0,
                        combo_index: 2,
                        dash: Some(DashSpec {
                            speed: 9.0,
                            window: (hit_time - charge - pre_hit_bias).max(0.0),
                            speed_mode: DashSpeedMode::Fixed,
                            stop_short: Some(0.96),
                        }),
                        hits: vec![
                            HitSpec {
                                at: HitTiming::Offset(hit_time),
                                damage: 18,
                                shape: HitShape::Melee {
                                    reach: 0.8,
                                    radius: 0.8,
                                },
                                active_window: 0.1,
                                knockback: 5.0,
                                stun: 0.0,
                            },
                            HitSpec {
                                at: HitTiming::Offset(hit_time + follow_up_gap),
                                damage: 12,
                                shape: HitShape::Melee {
                                    reach: 0.8,
                                    radius: 0.8,
                                },
                                active_window: 0.1,
                                knockback: 7.0,
                                stun: 0.2,
                            },
                        ],
                    },
                }),
            },
            summon: None,
            phase: None,
            contact: None,
        }
    }

    /// Джаггернаут: долгий telegraph + таран, special: прыжок с AoE при приземлении
    pub fn juggernaut() -> Self {
        Self {
            name: "juggernaut".into(),
            max_health: 500,
            armor: 25.0,
            body_radius: 0.7,
            move_speed: 1.6,
            knockback_decay: 6.0,
            perception: PerceptionConfig {
                attack_range: 3.0,
                detection_range: 9.0,
                target_layers: LayerMask::PLAYER,
                attack_start_buffer: 0.0,
            },
            default_state: DefaultState::Idle,
            wander: WanderConfig::default(),
            chase: ChaseConfig::default(),
            attack: AttackProfile {
                cooldown: 2.0,
                y_hard_cap: Some(0.55),
                normal: AttackSpec {
                    charge_time: 2.0,
                    clip_length: 2.35,
                    recovery: 0.5,
                    combo_index: 1,
                    dash: Some(DashSpec {
                        speed: 9.0,
                        window: 0.35,
                        speed_mode: DashSpeedMode::Fixed,
                        stop_short: Some(0.8),
                    }),
                    hits: vec![HitSpec {
                        at: HitTiming::DashStart,
                        damage: 20,
                        shape: HitShape::Melee {
                            reach: 0.7,
                            radius: 0.9,
                        },
                        active_window: 0.35,
                        knockback: 6.0,
                        stun: 0.2,
                    }],
                },
                special: Some(SpecialSpec {
                    cooldown: 8.0,
                    shares_normal_gate: false,
                    range: SpecialRange {
                        inner: RangeBound::Fixed(0.0),
                        outer: RangeBound::DetectionRange,
                        metric: RangeMetric::Euclidean,
                    },
                    attack: AttackSpec {
                        charge_time: 3.0,
                        clip_length: 5.0,
                        recovery: 1.0,
                        combo_index: 2,
                        dash: Some(DashSpec {
                            speed: 12.0,
                            window: 2.0,
                            speed_mode: DashSpeedMode::Fixed,
                            stop_short: None,
                        }),
                        hits: vec![HitSpec {
                            at: HitTiming::DashEnd,
                            damage: 25,
                            shape: HitShape::Area {
                                radius: 1.8,
                                offset_y: -1.0,
                            },
                            active_window: 0.1,
                            knockback: 8.0,
                            stun: 0.5,
                        }],
                    },
                }),
            },
            summon: None,
            phase: None,
            contact: Some(ContactConfig {
                damage: 10,
                tick: 1.0,
            }),
        }
    }

    /// Громила: джаггернаут, чей прыжок подгоняет скорость под окно
    pub fn brute() -> Self {
        let mut config = Self::juggernaut();
        config.name = "brute".into();
        config.max_health = 650;
        if let Some(special) = config.attack.special.as_mut() {
            if let Some(dash) = special.attack.dash.as_mut() {
                dash.speed_mode = DashSpeedMode::FitWindow;
                dash.speed = 14.0;
            }
        }
        config
    }

    /// Призыватель: периодически зовёт миньонов, во второй фазе отступает
    pub fn summoner() -> Self {
        Self {
            name: "summoner".into(),
            max_health: 250,
            armor: 5.0,
            body_radius: 0.5,
            move_speed: 1.8,
            knockback_decay: 8.0,
            perception: PerceptionConfig {
                attack_range: 1.0,
                detection_range: 12.0,
                target_layers: LayerMask::PLAYER,
                attack_start_buffer: 0.2,
            },
            default_state: DefaultState::Idle,
            wander: WanderConfig::default(),
            chase: ChaseConfig {
                stop_buffer: 0.1,
                steering: ChaseSteering::AlignFirst { y_align_band: 0.35 },
            },
            attack: AttackProfile {
                cooldown: 1.5,
                y_hard_cap: Some(0.55),
                normal: AttackSpec {
                    charge_time: 0.3,
                    clip_length: 0.6,
                    recovery: 0.3,
                    combo_index: 0,
                    dash: None,
                    hits: vec![HitSpec {
                        at: HitTiming::Offset(0.3),
                        damage: 8,
                        shape: HitShape::Melee {
                            reach: 0.6,
                            radius: 0.6,
                        },
                        active_window: 0.1,
                        knockback: 3.0,
                        stun: 0.0,
                    }],
                },
                special: None,
            },
            summon: Some(SummonConfig::default()),
            phase: Some(PhaseConfig {
                threshold: 0.2,
                emergency_count: 5,
                retreat: Some(RetreatConfig {
                    trigger_distance: 4.0,
                    duration: 3.0,
                    cooldown: 2.0,
                    speed_multiplier: 0.7,
                }),
            }),
            contact: None,
        }
    }

    /// Все встроенные archetypes
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::grunt(),
            Self::duelist(),
            Self::swordmaster(),
            Self::juggernaut(),
            Self::brute(),
            Self::summoner(),
        ]
    }
}

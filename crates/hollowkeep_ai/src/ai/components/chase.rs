//! Chase: intent к цели с остановкой у attack range

use bevy::prelude::*;

use crate::config::{ChaseConfig, ChaseSteering};

/// Вес горизонтали, пока выравниваемся по вертикали
const ALIGN_HORIZONTAL_WEIGHT: f32 = 0.6;
/// Вес вертикали, когда уже выровнены
const ALIGNED_VERTICAL_WEIGHT: f32 = 0.35;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ChaseBehavior {
    pub stop_buffer: f32,
    pub steering: ChaseSteering,
}

impl Default for ChaseBehavior {
    fn default() -> Self {
        Self::from(ChaseConfig::default())
    }
}

impl From<ChaseConfig> for ChaseBehavior {
    fn from(config: ChaseConfig) -> Self {
        Self {
            stop_buffer: config.stop_buffer,
            steering: config.steering,
        }
    }
}

/// Желаемая скорость chase.
///
/// - нет цели → 0
/// - ближе `stop_distance` → 0 (дальше работает Attack)
/// - иначе нормализованное направление × speed
pub fn chase_velocity(
    offset: Option<Vec2>,
    stop_distance: f32,
    speed: f32,
    steering: ChaseSteering,
) -> Vec2 {
    let Some(offset) = offset else {
        return Vec2::ZERO;
    };
    if offset.length_squared() <= stop_distance * stop_distance {
        return Vec2::ZERO;
    }

    let direction = match steering {
        ChaseSteering::Direct => offset,
        ChaseSteering::AlignFirst { y_align_band } => {
            let sign_x = offset.x.signum();
            let sign_y = offset.y.signum();
            if offset.y.abs() > y_align_band {
                Vec2::new(sign_x * ALIGN_HORIZONTAL_WEIGHT, sign_y)
            } else {
                Vec2::new(sign_x, sign_y * ALIGNED_VERTICAL_WEIGHT)
            }
        }
    };

    direction.normalize_or_zero() * speed
}

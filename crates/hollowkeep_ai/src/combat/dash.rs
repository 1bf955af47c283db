//! Dash motion solver
//!
//! ```text
//! start ──direction──▶ destination ······ aim
//!       |← travel →|
//! travel = min(|aim - start|, speed × available_time)
//! ```
//!
//! Clamp дистанции: единственная защита от overshoot. `reached` ловит
//! "проскочили точку" через знак dot product, точное равенство на дискретных
//! тиках не работает.

use bevy::prelude::*;

/// Квадрат радиуса "уже на месте" (0.02 м)
pub const REACH_EPSILON_SQ: f32 = 0.0004;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPlan {
    pub start: Vec2,
    pub direction: Vec2,
    pub travel_distance: f32,
    pub destination: Vec2,
    /// speed × available_time
    pub reach: f32,
    /// Скорость, с которой реально двигаемся
    pub speed: f32,
}

impl DashPlan {
    /// Рассчитать dash к `aim`.
    ///
    /// `fallback_direction` используется, когда aim совпадает со start.
    pub fn solve(
        start: Vec2,
        aim: Vec2,
        speed: f32,
        available_time: f32,
        fallback_direction: Vec2,
    ) -> Self {
        let speed = speed.max(0.0);
        let available_time = available_time.max(0.0);
        let reach = speed * available_time;

        let to_aim = aim - start;
        let distance = to_aim.length();
        let direction = to_aim
            .try_normalize()
            .or_else(|| fallback_direction.try_normalize())
            .unwrap_or(Vec2::X);

        let travel_distance = distance.min(reach);

        Self {
            start,
            direction,
            travel_distance,
            destination: start + direction * travel_distance,
            reach,
            speed,
        }
    }

    /// Как `solve`, но скорость подбирается так, чтобы пройти travel ровно за окно
    pub fn solve_fitted(
        start: Vec2,
        aim: Vec2,
        max_speed: f32,
        available_time: f32,
        fallback_direction: Vec2,
    ) -> Self {
        let mut plan = Self::solve(start, aim, max_speed, available_time, fallback_direction);
        if available_time > 0.0 {
            plan.speed = plan.travel_distance / available_time;
        }
        plan
    }

    /// Прошли destination (или стоим в epsilon от неё)
    pub fn reached(&self, position: Vec2) -> bool {
        let remaining = self.destination - position;
        remaining.dot(self.direction) <= 0.0 || remaining.length_squared() <= REACH_EPSILON_SQ
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }
}

/// Точка, чуть не доходя до цели по X (чтобы не влезать в неё)
pub fn face_spot(start: Vec2, target: Vec2, stop_short: f32) -> Vec2 {
    let side = if target.x >= start.x { 1.0 } else { -1.0 };
    Vec2::new(target.x - side * stop_short, target.y)
}

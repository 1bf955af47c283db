//! Wander: пауза → точка на периметре прямоугольника вокруг спавна → пауза

use bevy::prelude::*;
use rand::Rng;

use crate::config::WanderConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WanderPhase {
    Paused { remaining: f32 },
    Moving { destination: Vec2 },
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WanderBehavior {
    /// Центр области (точка спавна)
    pub center: Vec2,
    pub config: WanderConfig,
    pub phase: WanderPhase,
}

impl WanderBehavior {
    pub fn new(center: Vec2, config: WanderConfig) -> Self {
        Self {
            center,
            config,
            phase: WanderPhase::Paused {
                remaining: config.pause,
            },
        }
    }

    /// Sub-state выключен: начинаем заново с паузы
    pub fn reset(&mut self) {
        self.phase = WanderPhase::Paused {
            remaining: self.config.pause,
        };
    }

    /// Случайная точка на одной из четырёх сторон прямоугольника
    pub fn pick_destination(&self, rng: &mut impl Rng) -> Vec2 {
        let half_width = self.config.width * 0.5;
        let half_height = self.config.height * 0.5;
        let t: f32 = rng.gen_range(-1.0..=1.0);

        let local = match rng.gen_range(0..4) {
            0 => Vec2::new(t * half_width, half_height),
            1 => Vec2::new(t * half_width, -half_height),
            2 => Vec2::new(-half_width, t * half_height),
            _ => Vec2::new(half_width, t * half_height),
        };

        self.center + local
    }

    /// Один тик wander. Возвращает желаемую скорость.
    pub fn tick(&mut self, dt: f32, position: Vec2, speed: f32, rng: &mut impl Rng) -> Vec2 {
        if let WanderPhase::Paused { remaining } = self.phase {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.phase = WanderPhase::Paused { remaining };
                return Vec2::ZERO;
            }
            self.phase = WanderPhase::Moving {
                destination: self.pick_destination(rng),
            };
        }

        let WanderPhase::Moving { destination } = self.phase else {
            return Vec2::ZERO;
        };

        let offset = destination - position;
        let distance = offset.length();
        if distance <= self.config.arrive_distance {
            self.reset();
            return Vec2::ZERO;
        }

        // Последний шаг не перелетает точку
        if dt > 0.0 && distance < speed * dt {
            return offset / dt;
        }
        offset / distance * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_destination_lies_on_rectangle_edge() {
        let wander = WanderBehavior::new(Vec2::new(10.0, -2.0), WanderConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let local = wander.pick_destination(&mut rng) - wander.center;
            let on_vertical_edge = (local.x.abs() - 3.0).abs() < 1e-4 && local.y.abs() <= 2.0 + 1e-4;
            let on_horizontal_edge = (local.y.abs() - 2.0).abs() < 1e-4 && local.x.abs() <= 3.0 + 1e-4;
            assert!(on_vertical_edge || on_horizontal_edge, "off edge: {:?}", local);
        }
    }

    #[test]
    fn test_pause_then_move_then_arrive() {
        let config = WanderConfig {
            pause: 0.5,
            ..WanderConfig::default()
        };
        let mut wander = WanderBehavior::new(Vec2::ZERO, config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dt = 0.125;

        // Пауза
        for _ in 0..3 {
            assert_eq!(wander.tick(dt, Vec2::ZERO, 2.0, &mut rng), Vec2::ZERO);
        }

        let velocity = wander.tick(dt, Vec2::ZERO, 2.0, &mut rng);
        let WanderPhase::Moving { destination } = wander.phase else {
            panic!("expected Moving, got {:?}", wander.phase);
        };
        assert!((velocity.length() - 2.0).abs() < 1e-4);

        // Прибыли → снова пауза
        let velocity = wander.tick(dt, destination + Vec2::new(0.05, 0.0), 2.0, &mut rng);
        assert_eq!(velocity, Vec2::ZERO);
        assert_eq!(wander.phase, WanderPhase::Paused { remaining: 0.5 });
    }

    #[test]
    fn test_reset_restarts_pause() {
        let mut wander = WanderBehavior::new(Vec2::ZERO, WanderConfig::default());
        wander.phase = WanderPhase::Moving {
            destination: Vec2::ONE,
        };
        wander.reset();
        assert_eq!(wander.phase, WanderPhase::Paused { remaining: 1.0 });
    }
}

//! ECS Components для акторов
//!
//! Организация по доменам:
//! - actor: базовые характеристики (layer, health)
//! - movement: velocity intent, facing, скорость

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;

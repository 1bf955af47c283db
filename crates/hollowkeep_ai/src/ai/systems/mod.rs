//! AI systems (decision + intent layer)

pub mod controller;
pub mod intent;

// Re-export all systems
pub use controller::*;
pub use intent::*;

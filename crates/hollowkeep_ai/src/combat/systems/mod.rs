//! Combat systems

pub mod attack;
pub mod hits;

pub use attack::*;
pub use hits::*;

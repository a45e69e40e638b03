//! Simulation module
//!
//! All gameplay logic lives here:
//! - Per-frame physics only (gravity constants are per-frame deltas)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::point_in_fruit;
pub use state::{Fruit, FruitKind, GamePhase, GameState, Particle};
pub use tick::{FrameInput, frame, step_fruits, step_particles};

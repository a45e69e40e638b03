//! Slice detection
//!
//! The pointer is a zero-radius point tested against each fruit's circle.
//! This is a discrete per-frame check, not a swept test: a pointer moving
//! fast enough to jump across a fruit between two frames will pass through
//! without slicing. That limitation is part of the game's scoring feel and
//! is kept deliberately.

use glam::Vec2;

use super::state::Fruit;

/// Point-in-circle containment via squared distance (no sqrt needed)
#[inline]
pub fn point_in_fruit(point: Vec2, fruit: &Fruit) -> bool {
    let radius = fruit.radius();
    point.distance_squared(fruit.pos) < radius * radius
}

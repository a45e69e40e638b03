//! Decaying pointer trail
//!
//! A short ribbon of recent pointer positions rendered behind the cursor.
//! Capped length, exponential opacity decay, and a hard clear when the frame
//! has no position at all (the one place stickiness does not apply).

use glam::Vec2;

use crate::consts::{TRAIL_DECAY, TRAIL_LENGTH, TRAIL_MIN_OPACITY, TRAIL_START_OPACITY};

#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Default)]
pub struct Trail {
    points: Vec<TrailPoint>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Advance the trail by one frame.
    ///
    /// With a position: append it at full opacity, trim the oldest past the
    /// cap, and decay every pre-existing point. Without one (no hand ever
    /// seen): drop the whole trail.
    pub fn update(&mut self, position: Option<Vec2>) {
        let Some(pos) = position else {
            self.points.clear();
            return;
        };

        self.points.push(TrailPoint {
            pos,
            opacity: TRAIL_START_OPACITY,
        });
        if self.points.len() > TRAIL_LENGTH {
            self.points.remove(0);
        }

        let newest = self.points.len() - 1;
        for point in &mut self.points[..newest] {
            point.opacity *= TRAIL_DECAY;
        }
        self.points.retain(|p| p.opacity > TRAIL_MIN_OPACITY);
    }
}

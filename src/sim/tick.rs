//! Per-frame simulation step
//!
//! One call to [`frame`] advances the whole simulation by one display frame:
//! spawn roll, fruit and particle physics, then slice resolution against the
//! current pointer. Physics is plain per-frame Euler with no substepping,
//! matching the original tuning (gravity constants are per-frame deltas).

use glam::Vec2;
use rand::Rng;

use super::collision::point_in_fruit;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input for a single frame step
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Current pointer position (sticky last-known already applied), if any
    pub pointer: Option<Vec2>,
    /// Wall-clock timestamp for this frame (ms); every slice event in the
    /// frame shares it
    pub now_ms: f64,
}

/// Advance the simulation by one frame. Does nothing outside `Playing`.
pub fn frame(state: &mut GameState, input: &FrameInput) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if state.rng().random::<f32>() < FRUIT_SPAWN_PROBABILITY {
        state.spawn_fruit();
    }

    step_fruits(state);
    step_particles(state);

    if let Some(pointer) = input.pointer
        && pointer.x.is_finite()
        && pointer.y.is_finite()
    {
        resolve_slices(state, pointer, input.now_ms);
    }
}

/// Integrate fruit physics and cull fruit that fell fully below the surface.
///
/// Removal uses filter semantics: no fruit's update depends on another's
/// removal.
pub fn step_fruits(state: &mut GameState) {
    for fruit in &mut state.fruits {
        fruit.vel.y += FRUIT_GRAVITY;
        fruit.pos += fruit.vel;
    }
    let floor = state.height;
    state.fruits.retain(|f| f.pos.y < floor + f.radius() * 2.0);
}

/// Integrate particle physics (gravity + drag), age, and cull dead particles
pub fn step_particles(state: &mut GameState) {
    for p in &mut state.particles {
        p.vel.y += PARTICLE_GRAVITY;
        p.vel *= PARTICLE_DRAG;
        p.pos += p.vel;
        p.life -= 1.0;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Test the pointer against every active fruit and slice all hits.
///
/// Iterates in reverse so removal during the scan is safe. Several fruit can
/// be sliced in a single frame; each slice re-runs the combo window check
/// against the timestamp the previous slice just wrote, so same-frame
/// multi-slices chain the combo.
fn resolve_slices(state: &mut GameState, pointer: Vec2, now_ms: f64) {
    for i in (0..state.fruits.len()).rev() {
        if point_in_fruit(pointer, &state.fruits[i]) {
            slice_fruit(state, i, now_ms);
        }
    }
}

fn slice_fruit(state: &mut GameState, index: usize, now_ms: f64) {
    let fruit = state.fruits.remove(index);

    if now_ms - state.last_slice_ms < COMBO_WINDOW_MS {
        state.combo += 1;
    } else {
        state.combo = 1;
    }
    state.last_slice_ms = now_ms;

    let points = BASE_SCORE
        + if state.combo > 1 {
            (state.combo - 1) * COMBO_BONUS
        } else {
            0
        };
    state.score += points;

    state.spawn_slice_burst(fruit.pos, fruit.color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Fruit, FruitKind, Particle};

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, 640.0, 480.0);
        state.ready();
        state.start_round(0.0);
        state
    }

    fn fruit_at(x: f32, y: f32) -> Fruit {
        Fruit {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            kind: FruitKind::Apple,
        }
    }

    #[test]
    fn test_fruit_euler_closed_form() {
        let mut state = playing_state(1);
        state.fruits.push(Fruit {
            pos: Vec2::new(300.0, 400.0),
            vel: Vec2::new(1.0, -12.0),
            kind: FruitKind::Banana,
        });

        let n = 25;
        for _ in 0..n {
            step_fruits(&mut state);
        }

        // vy_N = vy_0 + N * g
        let expected_vy = -12.0 + n as f32 * FRUIT_GRAVITY;
        assert!((state.fruits[0].vel.y - expected_vy).abs() < 1e-4);

        // y_N = y_0 + N*vy_0 + g * N(N+1)/2  (velocity updated before position)
        let n_f = n as f32;
        let expected_y = 400.0 + n_f * -12.0 + FRUIT_GRAVITY * n_f * (n_f + 1.0) / 2.0;
        assert!((state.fruits[0].pos.y - expected_y).abs() < 1e-3);
        // x has no forces at all
        assert!((state.fruits[0].pos.x - 325.0).abs() < 1e-4);
    }

    #[test]
    fn test_fruit_culled_below_surface() {
        let mut state = playing_state(1);
        // Fully below the cull line: y >= height + 2*radius
        state.fruits.push(Fruit {
            pos: Vec2::new(100.0, 480.0 + 41.0),
            vel: Vec2::ZERO,
            kind: FruitKind::Apple,
        });
        // Still visible
        state.fruits.push(fruit_at(100.0, 450.0));

        step_fruits(&mut state);
        assert_eq!(state.fruits.len(), 1);
        assert!(state.fruits[0].pos.y < 480.0 + 40.0);
    }

    #[test]
    fn test_particle_life_decrements_and_culls() {
        let mut state = playing_state(1);
        state.particles.push(Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(2.0, -1.0),
            radius: 2.0,
            color: [1.0; 4],
            life: 3.0,
        });

        step_particles(&mut state);
        assert_eq!(state.particles.len(), 1);
        assert!((state.particles[0].life - 2.0).abs() < 1e-6);
        // Drag applied to both components
        assert!(state.particles[0].vel.x < 2.0);

        step_particles(&mut state);
        step_particles(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_slice_scores_base_points() {
        let mut state = playing_state(1);
        state.fruits.push(fruit_at(100.0, 100.0));

        let input = FrameInput {
            pointer: Some(Vec2::new(110.0, 100.0)),
            now_ms: 0.0,
        };
        frame(&mut state, &input);

        assert_eq!(state.score, BASE_SCORE);
        assert_eq!(state.combo, 1);
        // Slice burst spawned in the fruit's color
        assert!(!state.particles.is_empty());
        assert_eq!(state.particles[0].color, FruitKind::Apple.color());
    }

    #[test]
    fn test_combo_sequence_resets_outside_window() {
        // Slices at t = 0, 200, 900 -> combos 1, 2, 1 (900 - 200 >= 600)
        let mut state = playing_state(1);
        let pointer = Some(Vec2::new(100.0, 100.0));

        for (now_ms, expected_combo, expected_score) in
            [(0.0, 1, 10), (200.0, 2, 25), (900.0, 1, 35)]
        {
            state.fruits.push(fruit_at(100.0, 100.0));
            frame(&mut state, &FrameInput { pointer, now_ms });
            assert_eq!(state.combo, expected_combo, "combo at t={now_ms}");
            assert_eq!(state.score, expected_score, "score at t={now_ms}");
        }
    }

    #[test]
    fn test_combo_scoring_cumulative() {
        // Combos 1, 2, 3 all in-window -> 10 + 15 + 20 = 45
        let mut state = playing_state(1);
        let pointer = Some(Vec2::new(100.0, 100.0));

        for now_ms in [0.0, 100.0, 200.0] {
            state.fruits.push(fruit_at(100.0, 100.0));
            frame(&mut state, &FrameInput { pointer, now_ms });
        }
        assert_eq!(state.combo, 3);
        assert_eq!(state.score, 45);
    }

    #[test]
    fn test_same_frame_multi_slice_chains_combo() {
        // Two overlapping fruit under the pointer in one frame: the second
        // slice sees a 0ms gap and continues the combo
        let mut state = playing_state(1);
        state.fruits.push(fruit_at(100.0, 100.0));
        state.fruits.push(fruit_at(105.0, 100.0));

        frame(
            &mut state,
            &FrameInput {
                pointer: Some(Vec2::new(102.0, 100.0)),
                now_ms: 1000.0,
            },
        );

        // Both target fruit gone (the spawn roll may have added fresh fruit
        // below the visible edge)
        assert!(state.fruits.iter().all(|f| f.pos.y > 480.0));
        assert_eq!(state.combo, 2);
        assert_eq!(state.score, 25);
    }

    #[test]
    fn test_no_pointer_no_slicing() {
        let mut state = playing_state(1);
        state.fruits.push(fruit_at(100.0, 100.0));

        frame(
            &mut state,
            &FrameInput {
                pointer: None,
                now_ms: 0.0,
            },
        );
        assert_eq!(state.score, 0);
        assert!(!state.fruits.is_empty());
    }

    #[test]
    fn test_non_finite_pointer_ignored() {
        let mut state = playing_state(1);
        state.fruits.push(fruit_at(100.0, 100.0));

        frame(
            &mut state,
            &FrameInput {
                pointer: Some(Vec2::new(f32::NAN, 100.0)),
                now_ms: 0.0,
            },
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_frame_is_noop_outside_playing() {
        let mut state = GameState::new(1, 640.0, 480.0);
        state.ready();
        state.fruits.push(fruit_at(100.0, 100.0));

        frame(
            &mut state,
            &FrameInput {
                pointer: Some(Vec2::new(100.0, 100.0)),
                now_ms: 0.0,
            },
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.fruits.len(), 1);
        assert_eq!(state.fruits[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_determinism_same_seed_same_trajectories() {
        let mut a = playing_state(99_999);
        let mut b = playing_state(99_999);
        let input = FrameInput::default();

        for _ in 0..120 {
            frame(&mut a, &input);
            frame(&mut b, &input);
        }

        assert_eq!(a.fruits.len(), b.fruits.len());
        for (fa, fb) in a.fruits.iter().zip(&b.fruits) {
            assert_eq!(fa.kind, fb.kind);
            assert!((fa.pos - fb.pos).length() < 1e-6);
            assert!((fa.vel - fb.vel).length() < 1e-6);
        }
    }
}

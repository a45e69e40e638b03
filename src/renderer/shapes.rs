//! Shape generation and per-frame scene assembly
//!
//! Everything is flat triangle lists in surface pixel coordinates; the
//! pipeline maps to NDC at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::{PARTICLE_BASE_LIFE, TRAIL_START_OPACITY};
use crate::input::keypoints::HAND_CONNECTIONS;
use crate::input::{Trail, TrackerFrame};
use crate::settings::Settings;
use crate::sim::GameState;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a line segment rendered as a thin quad
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = b - a;
    if dir.length_squared() < 1e-6 {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x).normalize() * (width / 2.0);

    let v1 = a + perp;
    let v2 = a - perp;
    let v3 = b + perp;
    let v4 = b - perp;

    vec![
        Vertex::new(v1.x, v1.y, color),
        Vertex::new(v2.x, v2.y, color),
        Vertex::new(v3.x, v3.y, color),
        Vertex::new(v3.x, v3.y, color),
        Vertex::new(v2.x, v2.y, color),
        Vertex::new(v4.x, v4.y, color),
    ]
}

/// A glowing dot: solid core plus two fading halo circles
pub fn glow_circle(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = circle(center, radius, color, 24);
    let halo = [color[0], color[1], color[2], color[3] * 0.25];
    vertices.extend(circle(center, radius * 1.6, halo, 24));
    let outer = [color[0], color[1], color[2], color[3] * 0.1];
    vertices.extend(circle(center, radius * 2.2, outer, 24));
    vertices
}

fn fruit_vertices(state: &GameState, out: &mut Vec<Vertex>) {
    for fruit in &state.fruits {
        out.extend(circle(fruit.pos, fruit.radius(), fruit.color(), 24));
    }
}

fn particle_vertices(state: &GameState, out: &mut Vec<Vertex>) {
    for p in &state.particles {
        let alpha = (p.life / PARTICLE_BASE_LIFE).clamp(0.0, 1.0);
        let color = [p.color[0], p.color[1], p.color[2], alpha];
        out.extend(circle(p.pos, p.radius, color, 8));
    }
}

fn trail_vertices(trail: &Trail, out: &mut Vec<Vertex>) {
    for point in trail.points() {
        // Newer points are larger as well as brighter
        let radius = 2.0 + (point.opacity / TRAIL_START_OPACITY) * 4.0;
        let [r, g, b] = colors::TRAIL;
        out.extend(circle(point.pos, radius, [r, g, b, point.opacity], 10));
    }
}

fn skeleton_vertices(keypoints: &[Vec2], out: &mut Vec<Vertex>) {
    for &(a, b) in HAND_CONNECTIONS.iter() {
        if let (Some(&ka), Some(&kb)) = (keypoints.get(a), keypoints.get(b)) {
            out.extend(line(ka, kb, 1.0, colors::BONE));
        }
    }
    for &kp in keypoints {
        out.extend(circle(kp, 3.0, colors::LANDMARK, 8));
    }
}

/// Assemble the whole frame: fruit, particles, trail, skeleton, pointer.
/// Draw order matters only for overlap; the pointer goes on top.
pub fn scene_vertices(
    state: &GameState,
    frame: &TrackerFrame,
    trail: &Trail,
    settings: &Settings,
) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    fruit_vertices(state, &mut vertices);
    if settings.particles {
        particle_vertices(state, &mut vertices);
    }
    if settings.show_skeleton
        && let Some(ref keypoints) = frame.keypoints
    {
        skeleton_vertices(keypoints, &mut vertices);
    }
    if settings.show_trail {
        trail_vertices(trail, &mut vertices);
    }
    if let Some(pointer) = frame.pointer
        && pointer.x.is_finite()
        && pointer.y.is_finite()
    {
        vertices.extend(glow_circle(pointer, 10.0, colors::POINTER));
    }

    vertices
}

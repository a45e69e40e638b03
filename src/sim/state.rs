//! Session state and entity types
//!
//! Everything a round owns lives here: the fruit and particle pools, score
//! and combo state, and the countdown. Pools are owned exclusively by
//! `GameState` and cleared wholesale on round start.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Camera and detector still initializing; simulation suspended
    Loading,
    /// Idle start screen, waiting for the player
    Intro,
    /// Active round
    Playing,
    /// Round ended, waiting for replay
    GameOver,
}

/// Fruit varieties with their fixed radius/color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitKind {
    Apple,
    Banana,
    Watermelon,
}

impl FruitKind {
    pub const ALL: [FruitKind; 3] = [FruitKind::Apple, FruitKind::Banana, FruitKind::Watermelon];

    #[inline]
    pub fn radius(self) -> f32 {
        match self {
            FruitKind::Apple => 20.0,
            FruitKind::Banana => 18.0,
            FruitKind::Watermelon => 25.0,
        }
    }

    #[inline]
    pub fn color(self) -> [f32; 4] {
        match self {
            FruitKind::Apple => [1.0, 0.196, 0.196, 1.0],
            FruitKind::Banana => [1.0, 0.882, 0.196, 1.0],
            FruitKind::Watermelon => [0.196, 0.784, 0.196, 1.0],
        }
    }
}

/// A fruit in flight
#[derive(Debug, Clone)]
pub struct Fruit {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: FruitKind,
}

impl Fruit {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.kind.color()
    }
}

/// A slice-burst particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    /// Remaining frames; decremented once per step, culled at <= 0
    pub life: f32,
}

/// Complete session state, passed explicitly to every subsystem call
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    /// Consecutive slices inside the combo window
    pub combo: u32,
    /// Timestamp of the most recent slice (ms)
    pub last_slice_ms: f64,
    /// Whole seconds remaining in the round, clamped at 0
    pub time_left: u32,
    /// Wall-clock timestamp the round started (ms)
    pub round_start_ms: f64,
    /// Set when the finished round beat the persisted best
    pub new_high_score: bool,
    pub fruits: Vec<Fruit>,
    pub particles: Vec<Particle>,
    /// Play surface dimensions (camera resolution)
    pub width: f32,
    pub height: f32,
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl GameState {
    /// Create a new session in `Loading` with the given seed and surface size
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self {
            phase: GamePhase::Loading,
            score: 0,
            combo: 0,
            last_slice_ms: 0.0,
            time_left: ROUND_DURATION_SECS,
            round_start_ms: 0.0,
            new_high_score: false,
            fruits: Vec::new(),
            particles: Vec::new(),
            width,
            height,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Initialization finished: Loading -> Intro
    pub fn ready(&mut self) {
        if self.phase == GamePhase::Loading {
            self.phase = GamePhase::Intro;
        }
    }

    /// Start (or restart) a round.
    ///
    /// Legal from Intro, GameOver, and Playing; calling while already Playing
    /// performs the same full reset, so no fruit or score leaks between
    /// rounds. Ignored while Loading - the simulation cannot run before the
    /// camera and detector are up.
    pub fn start_round(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Loading {
            return;
        }
        self.score = 0;
        self.combo = 0;
        self.last_slice_ms = 0.0;
        self.time_left = ROUND_DURATION_SECS;
        self.round_start_ms = now_ms;
        self.new_high_score = false;
        self.fruits.clear();
        self.particles.clear();
        self.phase = GamePhase::Playing;
    }

    /// Recompute the countdown from wall-clock elapsed time.
    ///
    /// Deriving from `round_start_ms` rather than decrementing resists drift
    /// when the tab is throttled. Returns true on the single Playing ->
    /// GameOver transition; later calls are no-ops.
    pub fn update_timer(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let elapsed_secs = ((now_ms - self.round_start_ms) / 1000.0).floor().max(0.0) as u32;
        self.time_left = ROUND_DURATION_SECS.saturating_sub(elapsed_secs);
        if self.time_left == 0 {
            self.phase = GamePhase::GameOver;
            return true;
        }
        false
    }

    /// Session RNG (seeded; spawn rolls and burst jitter draw from it)
    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Spawn one fruit at the bottom edge with an upward, slightly drifting
    /// launch velocity
    pub fn spawn_fruit(&mut self) {
        let kind = FruitKind::ALL[self.rng.random_range(0..FruitKind::ALL.len())];
        let x = self.width * (SPAWN_EDGE_MARGIN + self.rng.random::<f32>() * 0.6);
        let y = self.height + kind.radius() + 10.0;
        let vx = (self.rng.random::<f32>() - 0.5) * 3.0;
        let vy = -9.0 - self.rng.random::<f32>() * 6.0;
        self.fruits.push(Fruit {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            kind,
        });
    }

    /// Spawn a 15-24 particle burst at a slice point, tinted with the sliced
    /// fruit's color
    pub fn spawn_slice_burst(&mut self, at: Vec2, color: [f32; 4]) {
        let count = 15 + self.rng.random_range(0..10);
        for _ in 0..count {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 3.0 + self.rng.random::<f32>() * 5.0;
            // Slight upward bias so bursts read as "juice" flying up
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 1.5);
            let radius = self.rng.random::<f32>() * 2.5 + 1.5;
            let life = PARTICLE_BASE_LIFE + self.rng.random::<f32>() * (PARTICLE_BASE_LIFE / 2.0);
            self.particles.push(Particle {
                pos: at,
                vel,
                radius,
                color,
                life,
            });
        }
    }
}

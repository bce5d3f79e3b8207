//! Object spawner and launch solver
//!
//! The spawn interval shrinks by one tick per batch down to a floor, and the
//! batch grows with score. Launch velocities are solved vertical-first: the
//! apex height fixes the vertical speed and the time to apex, and the
//! horizontal speed is whatever carries the object to its target x in that
//! time.

use glam::Vec2;
use rand::Rng;

use super::state::{BOMB_GLYPH, FRUIT_GLYPHS, ObjectKind, POOP_GLYPH};
use crate::PlayField;
use crate::consts::*;

/// Spawn timer and interval
#[derive(Debug, Clone)]
pub struct Spawner {
    timer: u32,
    interval: u32,
    initial_interval: u32,
    min_interval: u32,
}

impl Spawner {
    pub fn new(initial_interval: u32, min_interval: u32) -> Self {
        Self {
            timer: 0,
            interval: initial_interval,
            initial_interval,
            min_interval: min_interval.min(initial_interval),
        }
    }

    /// Current interval in ticks
    #[inline]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Advance one tick. Returns the batch size when a spawn is due.
    pub fn tick(&mut self, score: i64) -> Option<u32> {
        self.timer += 1;
        if self.timer <= self.interval {
            return None;
        }

        self.timer = 0;
        let batch = batch_size(score);
        self.interval = self.interval.saturating_sub(1).max(self.min_interval);
        Some(batch)
    }

    /// Back to the initial interval (the timer keeps counting)
    pub fn reset_interval(&mut self) {
        self.interval = self.initial_interval;
    }
}

/// Objects per spawn: one more for every 80 points, at most five
pub fn batch_size(score: i64) -> u32 {
    let steps = score.max(0) / SCORE_PER_BATCH_STEP;
    (1 + steps).min(MAX_BATCH_SIZE as i64) as u32
}

/// Vertical launch speed that peaks exactly `apex_height` above the start
#[inline]
pub fn launch_velocity_y(gravity: f32, apex_height: f32) -> f32 {
    (2.0 * gravity * apex_height).sqrt()
}

/// Ticks from launch to apex
#[inline]
pub fn time_to_apex(velocity_y: f32, gravity: f32) -> f32 {
    velocity_y / gravity
}

/// Initial kinematics for one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation_speed: f32,
    /// Height above the spawn line the arc peaks at
    pub apex_height: f32,
}

/// Solve a launch for `gravity` (a positive magnitude) on `field`.
/// The apex height is measured up from the spawn line, not from the origin.
pub fn plan_launch<R: Rng + ?Sized>(field: &PlayField, gravity: f32, rng: &mut R) -> Launch {
    let start_x = (rng.random::<f32>() - 0.5) * field.width * SPAWN_WIDTH_FRACTION;
    let start = Vec2::new(start_x, field.spawn_line());

    let fraction = APEX_MIN_FRACTION + rng.random::<f32>() * (APEX_MAX_FRACTION - APEX_MIN_FRACTION);
    let apex_height = fraction * field.height;

    let vy = launch_velocity_y(gravity, apex_height);
    let t = time_to_apex(vy, gravity);

    let target_x = (rng.random::<f32>() - 0.5) * APEX_X_JITTER;
    let vx = (target_x - start_x) / t;

    Launch {
        pos: start,
        vel: Vec2::new(vx, vy),
        rotation_speed: (rng.random::<f32>() - 0.5) * ROTATION_SPREAD,
        apex_height,
    }
}

/// Pick what to launch and its glyph
pub fn pick_kind<R: Rng + ?Sized>(rng: &mut R) -> (ObjectKind, &'static str) {
    match ObjectKind::from_roll(rng.random()) {
        ObjectKind::Bomb => (ObjectKind::Bomb, BOMB_GLYPH),
        ObjectKind::Poop => (ObjectKind::Poop, POOP_GLYPH),
        ObjectKind::Fruit => (
            ObjectKind::Fruit,
            FRUIT_GLYPHS[rng.random_range(0..FRUIT_GLYPHS.len())],
        ),
    }
}

//! Fruit Slash - a gesture-controlled slicing arcade game
//!
//! Core modules:
//! - `input`: Hand-landmark detections to cut points
//! - `sim`: Game engine (blade trail, spawning, physics, collisions, scoring)
//! - `audio`: Procedural tone synthesis for game events
//! - `renderer`: Output contract handed to the drawing backend
//! - `platform`: Staged bootstrap and the per-frame game loop
//! - `persistence`: Key-value storage boundary

pub mod audio;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HistoryScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Outer border of the normalized camera frame treated as a dead zone
    pub const SAFETY_MARGIN: f32 = 0.05;
    /// Vertical acceleration added to every object each tick (world units/tick²)
    pub const GRAVITY: f32 = -0.015;

    /// Blade ribbon defaults
    pub const BLADE_BASE_WIDTH: f32 = 1.2;
    pub const BLADE_LENGTH: usize = 20;

    /// Spawn interval in ticks at the start of a run
    pub const INITIAL_SPAWN_RATE: u32 = 80;
    /// Fastest the spawn interval can get
    pub const MIN_SPAWN_RATE: u32 = 20;
    /// Largest number of objects launched per spawn
    pub const MAX_BATCH_SIZE: u32 = 5;
    /// Score needed for each extra object per batch
    pub const SCORE_PER_BATCH_STEP: i64 = 80;
    /// Delay between objects of the same batch (ms)
    pub const SPAWN_STAGGER_MS: f64 = 150.0;

    /// Visible field height in world units (width follows the aspect ratio)
    pub const FRUSTUM_SIZE: f32 = 20.0;
    /// Spawn line sits this far below the bottom edge
    pub const SPAWN_LINE_DROP: f32 = 2.0;
    /// Objects below this height are culled
    pub const CULL_Y: f32 = -15.0;
    /// Apex height range as a fraction of the field height
    pub const APEX_MIN_FRACTION: f32 = 0.5;
    pub const APEX_MAX_FRACTION: f32 = 0.8;
    /// Horizontal apex target spread around the center
    pub const APEX_X_JITTER: f32 = 5.0;
    /// Fraction of the field width used for launch positions
    pub const SPAWN_WIDTH_FRACTION: f32 = 0.9;
    /// Spread of per-object rotation speed (radians/tick)
    pub const ROTATION_SPREAD: f32 = 0.15;

    /// Object defaults
    pub const OBJECT_RADIUS: f32 = 2.5;
    pub const EMOJI_SCALE: f32 = 5.5;

    /// Menu button
    pub const BUTTON_RADIUS: f32 = 1.5;
    pub const BUTTON_SCALE: f32 = 3.0;

    /// Scoring
    pub const FRUIT_POINTS: i64 = 10;
    pub const COMBO_BONUS: i64 = 2;
    pub const POOP_PENALTY: i64 = 20;
    pub const BOMB_PENALTY: i64 = 100;
    /// How long the "N COMBO!" banner stays up (ms)
    pub const COMBO_MESSAGE_MS: f64 = 800.0;

    /// Number of final scores kept in the history
    pub const HISTORY_LEN: usize = 3;

    /// Landmark index of the index fingertip
    pub const INDEX_FINGER_TIP: usize = 8;
}

/// The visible play field in world units, centered on the origin with +y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self::from_viewport(16.0, 9.0)
    }
}

impl PlayField {
    /// Field for a viewport of the given pixel size
    pub fn from_viewport(width_px: f32, height_px: f32) -> Self {
        let aspect = if height_px > 0.0 {
            width_px / height_px
        } else {
            1.0
        };
        Self {
            width: consts::FRUSTUM_SIZE * aspect,
            height: consts::FRUSTUM_SIZE,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        -self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        -self.height / 2.0
    }

    /// Height objects are launched from
    #[inline]
    pub fn spawn_line(&self) -> f32 {
        self.bottom() - consts::SPAWN_LINE_DROP
    }

    /// Map a normalized [0,1]² point (y up) into world space
    #[inline]
    pub fn to_world(&self, normalized: Vec2) -> Vec2 {
        Vec2::new(
            (normalized.x * 2.0 - 1.0) * self.width / 2.0,
            (normalized.y * 2.0 - 1.0) * self.height / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_viewport() {
        let field = PlayField::from_viewport(1600.0, 800.0);
        assert_eq!(field.height, 20.0);
        assert_eq!(field.width, 40.0);
        assert_eq!(field.spawn_line(), -12.0);
    }

    #[test]
    fn test_to_world_corners() {
        let field = PlayField::from_viewport(1000.0, 1000.0);
        assert_eq!(field.to_world(Vec2::new(0.5, 0.5)), Vec2::ZERO);
        assert_eq!(field.to_world(Vec2::new(1.0, 1.0)), Vec2::new(10.0, 10.0));
        assert_eq!(field.to_world(Vec2::new(0.0, 0.0)), Vec2::new(-10.0, -10.0));
    }

    #[test]
    fn test_zero_height_viewport() {
        let field = PlayField::from_viewport(640.0, 0.0);
        assert_eq!(field.width, field.height);
    }
}

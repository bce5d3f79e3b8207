//! Game settings and tuning
//!
//! Persisted separately from the score history.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Input ===
    /// Dead-zone width on every edge of the normalized camera frame
    pub safety_margin: f32,

    // === Physics ===
    /// Per-tick vertical acceleration (negative is down)
    pub gravity: f32,

    // === Blade ===
    /// Widest point of the blade ribbon (world units)
    pub blade_base_width: f32,
    /// Maximum number of points kept in the blade path
    pub blade_length: usize,

    // === Spawning ===
    /// Spawn interval in ticks at the start of a run
    pub initial_spawn_rate: u32,
    /// Fastest spawn interval in ticks
    pub min_spawn_rate: u32,
    /// Delay between objects of one batch (ms)
    pub spawn_stagger_ms: f64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Mute all sound effects
    pub muted: bool,

    // === HUD ===
    /// Draw the detected hand skeleton over the camera preview
    pub show_skeleton: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            safety_margin: SAFETY_MARGIN,
            gravity: GRAVITY,
            blade_base_width: BLADE_BASE_WIDTH,
            blade_length: BLADE_LENGTH,
            initial_spawn_rate: INITIAL_SPAWN_RATE,
            min_spawn_rate: MIN_SPAWN_RATE,
            spawn_stagger_ms: SPAWN_STAGGER_MS,
            master_volume: 0.3,
            muted: false,
            show_skeleton: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "fn_settings";

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        self.safety_margin = self.safety_margin.clamp(0.0, 0.45);
        if self.gravity >= 0.0 || self.gravity.is_nan() {
            log::warn!("gravity must pull down, using {GRAVITY}");
            self.gravity = GRAVITY;
        }
        self.blade_base_width = self.blade_base_width.max(0.0);
        self.blade_length = self.blade_length.max(2);
        self.initial_spawn_rate = self.initial_spawn_rate.max(1);
        self.min_spawn_rate = self.min_spawn_rate.clamp(1, self.initial_spawn_rate);
        self.spawn_stagger_ms = self.spawn_stagger_ms.max(0.0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self
    }

    /// Gravity as a positive magnitude
    #[inline]
    pub fn gravity_magnitude(&self) -> f32 {
        self.gravity.abs()
    }

    /// Load settings; missing or malformed data falls back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}

//! Browser bridge
//!
//! The JS host owns the camera, the landmark model and the drawing code. Each
//! animation frame it asks `needs_detection(video_time)`, runs the model only
//! on new video frames, hands over the video time and landmarks (or an empty
//! payload) and gets the render frame back as JSON. Scores persist to localStorage and
//! sounds go straight to Web Audio.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, WebAudioSink};
use crate::input::{Detection, HandLandmarker, InputAdapter, VideoSource};
use crate::persistence::LocalStorage;
use crate::renderer::as_floats;
use crate::sim::{GameSession, TickInput};
use crate::{PlayField, Settings};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Fruit Slash wasm module loaded");
}

/// Video time reported by the host this frame
struct HostVideo(f64);

impl VideoSource for HostVideo {
    fn current_time(&self) -> f64 {
        self.0
    }
}

/// Landmarks the host computed for this frame, parsed only if the frame is new
struct HostLandmarks<'a>(&'a str);

impl HandLandmarker for HostLandmarks<'_> {
    fn detect_for_video(&mut self, _timestamp_ms: f64) -> Detection {
        Detection::from_landmarks_json(self.0).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed landmarks: {e}");
            Detection::empty()
        })
    }
}

/// Game driven by a JS host
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    input: InputAdapter,
    audio: AudioManager,
    running: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let store = LocalStorage::new();
        let settings = Settings::load(&store);
        let seed = js_sys::Date::now() as u64;
        let audio = AudioManager::new(
            Box::new(WebAudioSink::new()),
            settings.master_volume,
            settings.muted,
        );
        log::info!("Game initialized with seed: {seed}");

        WebGame {
            input: InputAdapter::new(settings.safety_margin),
            session: GameSession::new(settings, PlayField::from_viewport(width, height), seed, Box::new(store)),
            audio,
            running: true,
        }
    }

    /// Whether the host should run the landmark model on the frame at
    /// `video_time`. When this is false, pass an empty payload to `frame`.
    pub fn needs_detection(&self, video_time: f64) -> bool {
        self.input.needs_detection(video_time)
    }

    /// Advance one frame. `landmarks_json` is the model's result
    /// (`{"landmarks": [[{x, y, z}, ...]]}`), or empty when the video has not
    /// advanced. Returns the render frame as JSON, or an empty string once
    /// shut down.
    pub fn frame(&mut self, now_ms: f64, video_time: f64, landmarks_json: &str) -> String {
        if !self.running {
            return String::new();
        }

        let poll = self
            .input
            .poll(&HostVideo(video_time), &mut HostLandmarks(landmarks_json), now_ms);
        let report = self.session.tick(&TickInput::from_poll(now_ms, &poll));
        self.audio.play_all(&report.sounds);
        if let Some(phase) = report.transition {
            log::info!("Entered {phase:?}");
        }

        serde_json::to_string(&self.session.render_frame()).unwrap_or_else(|e| {
            log::warn!("Failed to encode frame: {e}");
            String::new()
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.set_field(PlayField::from_viewport(width, height));
    }

    /// Mute or unmute; the choice is saved with the settings
    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
        self.session.set_audio_preferences(self.audio.master_volume(), muted);
    }

    /// Master volume (0.0 - 1.0); saved with the settings
    pub fn set_master_volume(&mut self, volume: f32) {
        self.audio.set_master_volume(volume);
        self.session
            .set_audio_preferences(self.audio.master_volume(), self.audio.is_muted());
    }

    /// Current ribbon as interleaved `x, y, r, g, b, a` floats
    pub fn ribbon(&self) -> Vec<f32> {
        as_floats(self.session.blade().ribbon()).to_vec()
    }

    /// Score as displayed
    pub fn score(&self) -> f64 {
        self.session.scoring().display_score() as f64
    }

    /// Stop the loop and close the audio context
    pub fn shutdown(&mut self) {
        self.running = false;
        self.audio.close();
        log::info!("Game shut down");
    }
}

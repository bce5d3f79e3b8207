//! Platform layer
//!
//! Boots the game in dependent stages (camera, then landmark model, then
//! renderer) and drives it one frame at a time. Each stage can fail with an
//! [`InitError`]; the loop only exists once every stage succeeded.

use thiserror::Error;

use crate::audio::{AudioManager, ToneSink};
use crate::input::{HandLandmarker, InputAdapter, VideoSource};
use crate::persistence::KeyValueStore;
use crate::renderer::Renderer;
use crate::sim::{GamePhase, GameSession, TickInput};
use crate::{PlayField, Settings};

/// Initialization failure, one variant per boot stage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("camera unavailable: {0}")]
    Camera(String),
    #[error("hand landmark model failed to load: {0}")]
    Model(String),
    #[error("renderer setup failed: {0}")]
    Renderer(String),
}

/// What the host shows while booting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootStatus {
    Loading,
    Running,
    /// Boot gave up; the host keeps showing the loading screen
    Failed(String),
}

impl BootStatus {
    pub fn from_result<T>(result: &Result<T, InitError>) -> Self {
        match result {
            Ok(_) => BootStatus::Running,
            Err(e) => BootStatus::Failed(e.to_string()),
        }
    }

    /// Anything but a running game looks like loading
    pub fn is_loading(&self) -> bool {
        !matches!(self, BootStatus::Running)
    }
}

/// Host capabilities the game needs
#[allow(async_fn_in_trait)]
pub trait Platform {
    type Video: VideoSource;
    type Model: HandLandmarker;
    type Renderer: Renderer;

    async fn acquire_camera(&mut self) -> Result<Self::Video, InitError>;
    async fn load_model(&mut self) -> Result<Self::Model, InitError>;
    async fn create_renderer(&mut self) -> Result<Self::Renderer, InitError>;

    fn store(&mut self) -> Box<dyn KeyValueStore>;
    fn tone_sink(&mut self) -> Box<dyn ToneSink>;
    /// Viewport size in pixels
    fn viewport(&self) -> (f32, f32);
    fn seed(&self) -> u64;
}

/// Run every boot stage in order. The first failure is returned and later
/// stages never run.
pub async fn boot<P: Platform>(platform: &mut P) -> Result<Game<P::Video, P::Model, P::Renderer>, InitError> {
    log::info!("Acquiring camera...");
    let video = platform.acquire_camera().await.inspect_err(|e| log::error!("{e}"))?;

    log::info!("Loading hand landmark model...");
    let model = platform.load_model().await.inspect_err(|e| log::error!("{e}"))?;

    log::info!("Creating renderer...");
    let renderer = platform.create_renderer().await.inspect_err(|e| log::error!("{e}"))?;

    let store = platform.store();
    let settings = Settings::load(store.as_ref());
    let (width, height) = platform.viewport();
    let seed = platform.seed();
    let audio = AudioManager::new(platform.tone_sink(), settings.master_volume, settings.muted);

    log::info!("Game initialized with seed: {seed}");
    Ok(Game {
        input: InputAdapter::new(settings.safety_margin),
        session: GameSession::new(settings, PlayField::from_viewport(width, height), seed, store),
        video,
        model,
        renderer,
        audio,
        running: true,
    })
}

/// A booted game: session plus the devices feeding and presenting it
pub struct Game<V, L, R> {
    session: GameSession,
    input: InputAdapter,
    video: V,
    model: L,
    renderer: R,
    audio: AudioManager,
    running: bool,
}

impl<V: VideoSource, L: HandLandmarker, R: Renderer> Game<V, L, R> {
    /// Run one frame. Returns false once the loop has been stopped.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        let poll = self.input.poll(&self.video, &mut self.model, now_ms);
        let report = self.session.tick(&TickInput::from_poll(now_ms, &poll));

        self.audio.play_all(&report.sounds);
        match report.transition {
            Some(GamePhase::GameOver) => {
                log::info!("Game over, history: {:?}", self.session.scoring().history().entries())
            }
            Some(phase) => log::info!("Entered {phase:?}"),
            None => {}
        }

        self.renderer.draw(&self.session.render_frame());
        true
    }

    /// Stop scheduling frames
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Game loop stopped");
        }
        self.running = false;
    }

    /// Stop and release the camera, audio and renderer
    pub fn shutdown(&mut self) {
        self.stop();
        self.video.release();
        self.audio.close();
        self.renderer.dispose();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Viewport changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.set_field(PlayField::from_viewport(width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogSink;
    use crate::input::Detection;
    use crate::persistence::MemoryStore;
    use crate::renderer::RenderFrame;

    #[derive(Default)]
    struct Clock {
        t: f64,
        released: bool,
    }

    impl VideoSource for Clock {
        fn current_time(&self) -> f64 {
            self.t
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    struct Center;

    impl HandLandmarker for Center {
        fn detect_for_video(&mut self, _timestamp_ms: f64) -> Detection {
            Detection::fingertip(0.5, 0.5)
        }
    }

    #[derive(Default)]
    struct FrameLog {
        frames: Vec<RenderFrame>,
        disposed: bool,
    }

    impl Renderer for FrameLog {
        fn draw(&mut self, frame: &RenderFrame) {
            self.frames.push(frame.clone());
        }

        fn dispose(&mut self) {
            self.disposed = true;
        }
    }

    #[derive(Default)]
    struct FakePlatform {
        fail_at: Option<&'static str>,
        stages: Vec<&'static str>,
    }

    impl FakePlatform {
        fn stage(&mut self, name: &'static str) -> Result<(), String> {
            self.stages.push(name);
            match self.fail_at {
                Some(at) if at == name => Err(format!("{name} refused")),
                _ => Ok(()),
            }
        }
    }

    impl Platform for FakePlatform {
        type Video = Clock;
        type Model = Center;
        type Renderer = FrameLog;

        async fn acquire_camera(&mut self) -> Result<Clock, InitError> {
            self.stage("camera").map_err(InitError::Camera)?;
            Ok(Clock::default())
        }

        async fn load_model(&mut self) -> Result<Center, InitError> {
            self.stage("model").map_err(InitError::Model)?;
            Ok(Center)
        }

        async fn create_renderer(&mut self) -> Result<FrameLog, InitError> {
            self.stage("renderer").map_err(InitError::Renderer)?;
            Ok(FrameLog::default())
        }

        fn store(&mut self) -> Box<dyn KeyValueStore> {
            Box::new(MemoryStore::new())
        }

        fn tone_sink(&mut self) -> Box<dyn ToneSink> {
            Box::new(LogSink::default())
        }

        fn viewport(&self) -> (f32, f32) {
            (1000.0, 1000.0)
        }

        fn seed(&self) -> u64 {
            1
        }
    }

    #[test]
    fn test_boot_runs_stages_in_order() {
        let mut platform = FakePlatform::default();
        let result = pollster::block_on(boot(&mut platform));
        assert!(result.is_ok());
        assert_eq!(platform.stages, vec!["camera", "model", "renderer"]);
        assert_eq!(BootStatus::from_result(&result), BootStatus::Running);
    }

    #[test]
    fn test_failed_stage_stops_boot() {
        let mut platform = FakePlatform {
            fail_at: Some("model"),
            ..Default::default()
        };
        let result = pollster::block_on(boot(&mut platform));
        assert_eq!(result.as_ref().err(), Some(&InitError::Model("model refused".into())));
        assert_eq!(platform.stages, vec!["camera", "model"]);

        let status = BootStatus::from_result(&result);
        assert!(status.is_loading());
        assert_eq!(
            status,
            BootStatus::Failed("hand landmark model failed to load: model refused".into())
        );
    }

    #[test]
    fn test_frames_until_stopped() {
        let mut platform = FakePlatform::default();
        let Ok(mut game) = pollster::block_on(boot(&mut platform)) else {
            panic!("boot failed");
        };

        // Same video time twice: second frame is stale but still renders
        assert!(game.frame(0.0));
        assert!(game.frame(16.0));
        game.video.t = 0.033;
        assert!(game.frame(33.0));
        assert_eq!(game.renderer().frames.len(), 3);
        assert_eq!(game.session().blade().len(), 2);
        // Two fresh points on the start button begin a run
        assert_eq!(game.session().phase(), GamePhase::Playing);

        game.shutdown();
        assert!(!game.frame(50.0));
        assert_eq!(game.renderer().frames.len(), 3);
        assert!(game.video.released);
        assert!(game.renderer().disposed);
    }
}

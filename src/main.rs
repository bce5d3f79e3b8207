//! Fruit Slash entry point
//!
//! The browser build is driven from JS through `fruit_slash::web`. Natively
//! this runs a headless demo: a scripted hand boots the game through the same
//! staged sequence, starts a run and slices whatever flies past.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::rc::Rc;

    use fruit_slash::audio::{LogSink, ToneSink};
    use fruit_slash::input::{Detection, HandLandmarker, VideoSource};
    use fruit_slash::persistence::{KeyValueStore, MemoryStore};
    use fruit_slash::platform::{BootStatus, InitError, Platform, boot};
    use fruit_slash::renderer::{RenderFrame, Renderer, TextureCache, TextureKey};

    /// Render rate of the demo loop
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// The camera delivers a new frame every other render frame
    const CAMERA_FRAME_S: f64 = 1.0 / 30.0;

    /// Camera whose presentation time follows a shared clock
    pub struct ScriptedCamera {
        clock: Rc<Cell<f64>>,
    }

    impl VideoSource for ScriptedCamera {
        fn current_time(&self) -> f64 {
            (self.clock.get() / CAMERA_FRAME_S).floor() * CAMERA_FRAME_S
        }

        fn release(&mut self) {
            log::info!("Camera released");
        }
    }

    /// Fingertip that parks on the start button, then sweeps the field
    pub struct ScriptedHand;

    impl HandLandmarker for ScriptedHand {
        fn detect_for_video(&mut self, timestamp_ms: f64) -> Detection {
            let t = timestamp_ms as f32;
            if t < 500.0 {
                return Detection::fingertip(0.5, 0.5);
            }
            // Hand leaves the frame for a while every few seconds
            if (t / 1000.0) as u32 % 5 == 4 {
                return Detection::empty();
            }
            // Raw frame coordinates; the adapter mirrors them
            let x = 0.5 + 0.4 * (t * 0.0041).sin();
            let y = 0.55 + 0.35 * (t * 0.0023).sin();
            Detection::fingertip(x, y)
        }
    }

    /// Logs a summary line once a second. Textures are plain labels and the
    /// vertex buffer is a float vector.
    #[derive(Default)]
    pub struct LogRenderer {
        frames: u64,
        textures: TextureCache<String>,
        ribbon_buffer: Vec<f32>,
    }

    fn label(key: &TextureKey) -> String {
        match key {
            TextureKey::Emoji(glyph) => (*glyph).to_string(),
            TextureKey::Text { text, font_size, .. } => format!("{text} @{font_size}px"),
        }
    }

    impl Renderer for LogRenderer {
        fn draw(&mut self, frame: &RenderFrame) {
            self.frames += 1;
            self.ribbon_buffer.clear();
            self.ribbon_buffer.extend_from_slice(frame.ribbon_floats());
            for sprite in &frame.sprites {
                self.textures.get_or_create(&sprite.texture, label);
            }
            if self.frames % 60 == 0 {
                log::info!(
                    "frame {}: {:?}, score {}, {} sprites{}",
                    self.frames,
                    frame.phase,
                    frame.score,
                    frame.sprites.len(),
                    frame
                        .combo_message
                        .as_deref()
                        .map(|m| format!(", {m}"))
                        .unwrap_or_default()
                );
            }
        }

        fn dispose(&mut self) {
            log::info!(
                "Renderer disposed after {} frames, {} textures",
                self.frames,
                self.textures.len()
            );
            self.textures.clear();
            self.ribbon_buffer = Vec::new();
        }
    }

    pub struct DemoPlatform {
        clock: Rc<Cell<f64>>,
        seed: u64,
    }

    impl DemoPlatform {
        pub fn new(seed: u64) -> Self {
            Self {
                clock: Rc::new(Cell::new(0.0)),
                seed,
            }
        }
    }

    impl Platform for DemoPlatform {
        type Video = ScriptedCamera;
        type Model = ScriptedHand;
        type Renderer = LogRenderer;

        async fn acquire_camera(&mut self) -> Result<ScriptedCamera, InitError> {
            Ok(ScriptedCamera {
                clock: self.clock.clone(),
            })
        }

        async fn load_model(&mut self) -> Result<ScriptedHand, InitError> {
            Ok(ScriptedHand)
        }

        async fn create_renderer(&mut self) -> Result<LogRenderer, InitError> {
            Ok(LogRenderer::default())
        }

        fn store(&mut self) -> Box<dyn KeyValueStore> {
            Box::new(MemoryStore::new())
        }

        fn tone_sink(&mut self) -> Box<dyn ToneSink> {
            Box::new(LogSink::default())
        }

        fn viewport(&self) -> (f32, f32) {
            (1280.0, 720.0)
        }

        fn seed(&self) -> u64 {
            self.seed
        }
    }

    pub fn run(frames: u32, seed: u64) {
        let mut platform = DemoPlatform::new(seed);
        let result = pollster::block_on(boot(&mut platform));
        let status = BootStatus::from_result(&result);
        let Ok(mut game) = result else {
            log::error!("Boot failed: {status:?}");
            return;
        };

        for i in 0..frames {
            let now_ms = i as f64 * FRAME_MS;
            platform.clock.set(now_ms / 1000.0);
            if !game.frame(now_ms) {
                break;
            }
        }

        let session = game.session();
        log::info!(
            "Finished {frames} frames in {:?}: score {}, history {:?}",
            session.phase(),
            session.scoring().display_score(),
            session.scoring().history().entries()
        );
        game.shutdown();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Slash (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let frames = args.next().and_then(|a| a.parse().ok()).unwrap_or(1800);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(7);
    demo::run(frames, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is fruit_slash::web::start, this is just to satisfy the compiler
}

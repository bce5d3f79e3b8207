//! Per-tick game state machine
//!
//! [`GameSession`] owns everything one game needs and advances it once per
//! rendered frame: deferred work, gesture input, collisions and scoring, then
//! spawning and physics while a run is in progress.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::blade::BladeTrail;
use super::collision::find_slices;
use super::deferred::{Deferred, DeferredQueue};
use super::physics;
use super::scoring::ScoringEngine;
use super::spawn::{Spawner, pick_kind, plan_launch};
use super::state::{Entity, GameObject, GamePhase, UiElement, UiTag};
use crate::audio::SoundEvent;
use crate::consts::*;
use crate::highscores::HistoryScores;
use crate::input::Poll;
use crate::persistence::KeyValueStore;
use crate::renderer::{RenderFrame, Sprite, TextureKey};
use crate::{PlayField, Settings};

pub const MENU_TITLE: &str = "🍉 Virtual Fruit Ninja";
pub const GAME_OVER_TITLE: &str = "Game Over";
pub const START_GLYPH: &str = "▶️";
pub const RESTART_GLYPH: &str = "🔄";

/// Gesture input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CutSignal {
    /// No new video frame; leave the blade alone
    #[default]
    Stale,
    /// New frame without a usable fingertip; the blade decays
    Absent,
    /// Normalized cut point (mirrored, y up)
    Point(Vec2),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall-clock time of this frame (ms)
    pub now_ms: f64,
    pub cut: CutSignal,
    /// Hand skeleton polylines from a fresh detection
    pub overlay: Option<Vec<Vec<Vec2>>>,
}

impl TickInput {
    /// Build the tick input from one camera poll
    pub fn from_poll(now_ms: f64, poll: &Poll) -> Self {
        match poll {
            Poll::Stale => Self {
                now_ms,
                ..Default::default()
            },
            Poll::Fresh { cut, detection } => Self {
                now_ms,
                cut: cut.map_or(CutSignal::Absent, CutSignal::Point),
                overlay: Some(crate::input::skeleton_polylines(detection)),
            },
        }
    }
}

/// Side effects of one tick for the host to act on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub sounds: Vec<SoundEvent>,
    /// Phase entered during this tick, if any
    pub transition: Option<GamePhase>,
    pub spawned: u32,
    pub culled: usize,
}

/// Active combo banner
#[derive(Debug, Clone, PartialEq)]
struct ComboMessage {
    serial: u32,
    text: String,
}

/// One game, from title screen through any number of runs
pub struct GameSession {
    settings: Settings,
    field: PlayField,
    phase: GamePhase,
    entities: Vec<Entity>,
    blade: BladeTrail,
    spawner: Spawner,
    scoring: ScoringEngine,
    deferred: DeferredQueue,
    rng: Pcg32,
    store: Box<dyn KeyValueStore>,
    next_object_id: u32,
    combo_message: Option<ComboMessage>,
    combo_serial: u32,
    overlay: Vec<Vec<Vec2>>,
}

impl GameSession {
    /// New session on the title screen. History is read from `store`.
    pub fn new(settings: Settings, field: PlayField, seed: u64, store: Box<dyn KeyValueStore>) -> Self {
        let settings = settings.sanitized();
        let history = HistoryScores::load(store.as_ref());

        let mut session = Self {
            blade: BladeTrail::new(settings.blade_length, settings.blade_base_width),
            spawner: Spawner::new(settings.initial_spawn_rate, settings.min_spawn_rate),
            settings,
            field,
            phase: GamePhase::Menu,
            entities: Vec::new(),
            scoring: ScoringEngine::new(history),
            deferred: DeferredQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            store,
            next_object_id: 1,
            combo_message: None,
            combo_serial: 0,
            overlay: Vec::new(),
        };
        session.build_menu_ui();
        session
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn field(&self) -> PlayField {
        self.field
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Live objects only
    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Physical(obj) => Some(obj),
            Entity::Ui(_) => None,
        })
    }

    pub fn ui_elements(&self) -> impl Iterator<Item = &UiElement> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Ui(ui) => Some(ui),
            Entity::Physical(_) => None,
        })
    }

    pub fn blade(&self) -> &BladeTrail {
        &self.blade
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    pub fn combo_message(&self) -> Option<&str> {
        self.combo_message.as_ref().map(|m| m.text.as_str())
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Update volume and mute in the settings and persist them
    pub fn set_audio_preferences(&mut self, master_volume: f32, muted: bool) {
        self.settings.master_volume = master_volume.clamp(0.0, 1.0);
        self.settings.muted = muted;
        self.settings.save(self.store.as_mut());
    }

    /// Resize the play field (viewport changed)
    pub fn set_field(&mut self, field: PlayField) {
        self.field = field;
    }

    /// Place an object directly (scripted scenes and tests)
    pub fn insert_object(&mut self, mut obj: GameObject) -> u32 {
        obj.id = self.allocate_id();
        let id = obj.id;
        self.entities.push(Entity::Physical(obj));
        id
    }

    // === Tick ===

    /// Advance the session by one frame
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let mut report = TickReport::default();

        self.run_deferred(input.now_ms, &mut report);

        if let Some(overlay) = input.overlay.as_ref().filter(|_| self.settings.show_skeleton) {
            self.overlay.clone_from(overlay);
        }

        match input.cut {
            CutSignal::Stale => {}
            CutSignal::Absent => {
                self.blade.decay();
            }
            CutSignal::Point(normalized) => {
                self.blade.push(self.field.to_world(normalized));
                self.check_collisions(input.now_ms, &mut report);
            }
        }

        if self.phase == GamePhase::Playing {
            self.update_spawner(input.now_ms);
            report.culled = physics::step(&mut self.entities, self.settings.gravity);
        }

        report
    }

    fn run_deferred(&mut self, now_ms: f64, report: &mut TickReport) {
        if self.deferred.is_empty() {
            return;
        }
        for work in self.deferred.take_due(now_ms) {
            match work {
                Deferred::Spawn => {
                    self.spawn_object();
                    report.spawned += 1;
                }
                Deferred::ExpireComboMessage { serial } => {
                    if self.combo_message.as_ref().is_some_and(|m| m.serial == serial) {
                        self.combo_message = None;
                    }
                }
            }
        }
    }

    fn update_spawner(&mut self, now_ms: f64) {
        let Some(batch) = self.spawner.tick(self.scoring.raw_score()) else {
            return;
        };
        log::debug!("Spawning batch of {batch}, next interval {}", self.spawner.interval());
        for i in 0..batch {
            let due = now_ms + i as f64 * self.settings.spawn_stagger_ms;
            self.deferred.schedule(due, Deferred::Spawn);
        }
    }

    fn spawn_object(&mut self) {
        let (kind, glyph) = pick_kind(&mut self.rng);
        let launch = plan_launch(&self.field, self.settings.gravity_magnitude(), &mut self.rng);
        let id = self.allocate_id();
        log::debug!("Spawned {kind:?} #{id} at x={:.2}", launch.pos.x);

        self.entities.push(Entity::Physical(GameObject {
            id,
            kind,
            glyph,
            pos: launch.pos,
            vel: launch.vel,
            rotation: 0.0,
            rotation_speed: launch.rotation_speed,
            radius: OBJECT_RADIUS,
            active: true,
        }));
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_object_id;
        self.next_object_id = self.next_object_id.wrapping_add(1);
        id
    }

    fn check_collisions(&mut self, now_ms: f64, report: &mut TickReport) {
        // A single point is not a stroke yet
        if self.blade.len() < 2 {
            return;
        }
        let Some(tip) = self.blade.tip() else {
            return;
        };

        // Indices are descending, so each removal leaves the rest valid. The
        // game-over UI rebuild only happens while playing, when there is no UI
        // to shift.
        for index in find_slices(tip, &self.entities) {
            if self.entities[index].is_ui() {
                report.sounds.push(SoundEvent::Slice);
                self.reset_game();
                report.transition = Some(GamePhase::Playing);
                return;
            }
            if let Entity::Physical(obj) = self.entities.remove(index) {
                self.slice_object(obj, now_ms, report);
            }
        }
    }

    fn slice_object(&mut self, obj: GameObject, now_ms: f64, report: &mut TickReport) {
        let outcome = self.scoring.apply(obj.kind);
        log::debug!("Sliced {:?} #{} for {} points", obj.kind, obj.id, outcome.points);
        report.sounds.push(outcome.sound);

        if let Some(text) = outcome.combo_message {
            self.combo_serial = self.combo_serial.wrapping_add(1);
            let serial = self.combo_serial;
            self.combo_message = Some(ComboMessage { serial, text });
            self.deferred
                .schedule(now_ms + COMBO_MESSAGE_MS, Deferred::ExpireComboMessage { serial });
        }

        if self.phase == GamePhase::Playing && self.scoring.is_depleted() {
            self.game_over();
            report.transition = Some(GamePhase::GameOver);
        }
    }

    /// Start a new run
    fn reset_game(&mut self) {
        self.scoring.reset();
        self.entities.clear();
        self.spawner.reset_interval();
        self.phase = GamePhase::Playing;
        log::info!("Run started");
    }

    fn game_over(&mut self) {
        let final_score = self.scoring.finish_run(self.store.as_mut());
        self.phase = GamePhase::GameOver;
        log::info!("Game over, final score {final_score}");
        self.build_menu_ui();
    }

    /// Replace all UI elements with the ones for the current phase
    pub fn build_menu_ui(&mut self) {
        self.entities.retain(|e| !e.is_ui());

        let (title, tag, glyph) = match self.phase {
            GamePhase::GameOver => (GAME_OVER_TITLE, UiTag::Restart, RESTART_GLYPH),
            _ => (MENU_TITLE, UiTag::Start, START_GLYPH),
        };
        self.entities.push(Entity::Ui(UiElement::text(title, "#fff", 80, 4.0)));
        self.entities.push(Entity::Ui(UiElement::button(tag, glyph)));

        if let Some(summary) = self.scoring.history().summary() {
            self.entities.push(Entity::Ui(UiElement::text(summary, "#aaa", 40, -4.0)));
        }
    }

    // === Output ===

    /// Snapshot for the renderer
    pub fn render_frame(&self) -> RenderFrame {
        let sprites = self
            .entities
            .iter()
            .map(|entity| match entity {
                Entity::Physical(obj) => Sprite {
                    position: obj.pos,
                    rotation: obj.rotation,
                    scale: Vec2::splat(EMOJI_SCALE),
                    texture: TextureKey::Emoji(obj.glyph),
                },
                Entity::Ui(ui) => Sprite {
                    position: ui.pos,
                    rotation: 0.0,
                    scale: ui.scale,
                    texture: ui.texture.clone(),
                },
            })
            .collect();

        RenderFrame {
            phase: self.phase,
            ribbon: self.blade.ribbon().to_vec(),
            sprites,
            score: self.scoring.display_score(),
            combo_message: self.combo_message().map(str::to_owned),
            skeleton: if self.settings.show_skeleton {
                self.overlay.clone()
            } else {
                Vec::new()
            },
        }
    }
}

//! Whole-session scenarios driven through `GameSession::tick`

use fruit_slash::audio::SoundEvent;
use fruit_slash::consts::*;
use fruit_slash::highscores::HistoryScores;
use fruit_slash::persistence::{KeyValueStore, MemoryStore};
use fruit_slash::sim::state::{FRUIT_GLYPHS, GameObject, ObjectKind, UiTag};
use fruit_slash::sim::{CutSignal, GamePhase, GameSession, TickInput};
use fruit_slash::{PlayField, Settings};
use glam::Vec2;

/// Square viewport: normalized (0.5, 0.5) is the world origin and one world
/// unit is 0.05 in normalized space
fn field() -> PlayField {
    PlayField::from_viewport(800.0, 800.0)
}

fn session_with(store: MemoryStore) -> GameSession {
    GameSession::new(Settings::default(), field(), 1234, Box::new(store))
}

fn cut_at(now_ms: f64, world: Vec2) -> TickInput {
    let normalized = world / 20.0 + Vec2::splat(0.5);
    TickInput {
        now_ms,
        cut: CutSignal::Point(normalized),
        overlay: None,
    }
}

fn object(kind: ObjectKind, pos: Vec2) -> GameObject {
    GameObject {
        id: 0,
        kind,
        glyph: FRUIT_GLYPHS[0],
        pos,
        vel: Vec2::ZERO,
        rotation: 0.0,
        rotation_speed: 0.0,
        radius: OBJECT_RADIUS,
        active: true,
    }
}

/// Slice the start button, leaving the blade resting at the origin
fn start_run(session: &mut GameSession) {
    session.tick(&cut_at(0.0, Vec2::ZERO));
    session.tick(&cut_at(16.0, Vec2::ZERO));
    assert_eq!(session.phase(), GamePhase::Playing);
}

/// Drop an object under the blade tip and cut once more
fn slice(session: &mut GameSession, kind: ObjectKind, now_ms: f64) -> Vec<SoundEvent> {
    session.insert_object(object(kind, Vec2::new(0.0, 1.0)));
    session.tick(&cut_at(now_ms, Vec2::ZERO)).sounds
}

#[test]
fn combo_chain_then_poop_reset() {
    let mut session = session_with(MemoryStore::new());
    start_run(&mut session);

    let mut scores = Vec::new();
    for i in 0..3 {
        slice(&mut session, ObjectKind::Fruit, 100.0 + i as f64 * 16.0);
        scores.push(session.scoring().raw_score());
    }
    assert_eq!(scores, vec![10, 24, 40]);
    assert_eq!(session.combo_message(), Some("3 COMBO!"));

    let sounds = slice(&mut session, ObjectKind::Poop, 200.0);
    assert_eq!(sounds, vec![SoundEvent::Poop]);
    assert_eq!(session.scoring().raw_score(), 20);
    assert_eq!(session.scoring().combo(), 0);

    let sounds = slice(&mut session, ObjectKind::Fruit, 216.0);
    assert_eq!(sounds, vec![SoundEvent::Fruit]);
    assert_eq!(session.scoring().raw_score(), 30);
    assert_eq!(session.phase(), GamePhase::Playing);
}

#[test]
fn bomb_ends_the_run_and_records_zero() {
    let mut store = MemoryStore::new();
    store.set(HistoryScores::STORAGE_KEY, "[90, 60, 30]");
    let mut session = session_with(store);
    start_run(&mut session);

    slice(&mut session, ObjectKind::Fruit, 100.0);
    slice(&mut session, ObjectKind::Fruit, 116.0);
    slice(&mut session, ObjectKind::Poop, 132.0);
    slice(&mut session, ObjectKind::Fruit, 148.0);
    assert_eq!(session.scoring().raw_score(), 14);

    session.insert_object(object(ObjectKind::Bomb, Vec2::ZERO));
    let report = session.tick(&cut_at(170.0, Vec2::ZERO));

    assert_eq!(report.sounds, vec![SoundEvent::Bomb]);
    assert_eq!(report.transition, Some(GamePhase::GameOver));
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.scoring().display_score(), 0);
    assert_eq!(session.scoring().history().entries(), &[0, 90, 60]);
    assert_eq!(session.store().get(HistoryScores::STORAGE_KEY).as_deref(), Some("[0,90,60]"));

    // Game-over screen with the history line
    let ui: Vec<_> = session.ui_elements().collect();
    assert_eq!(ui.len(), 3);
    assert!(ui.iter().any(|e| e.tag == UiTag::Restart));
}

#[test]
fn restart_button_starts_a_fresh_run() {
    let mut session = session_with(MemoryStore::new());
    start_run(&mut session);
    slice(&mut session, ObjectKind::Bomb, 100.0);
    assert_eq!(session.phase(), GamePhase::GameOver);

    // Blade tip still rests on the restart button
    let report = session.tick(&cut_at(200.0, Vec2::ZERO));
    assert_eq!(report.sounds, vec![SoundEvent::Slice]);
    assert_eq!(session.phase(), GamePhase::Playing);
    assert!(session.entities().is_empty());
    assert_eq!(session.spawner().interval(), INITIAL_SPAWN_RATE);
}

#[test]
fn slice_threshold_is_strict() {
    let mut session = session_with(MemoryStore::new());
    start_run(&mut session);

    session.insert_object(object(ObjectKind::Fruit, Vec2::new(OBJECT_RADIUS, 0.0)));
    let report = session.tick(&cut_at(100.0, Vec2::ZERO));
    assert!(report.sounds.is_empty());
    assert_eq!(session.objects().count(), 1);

    session.insert_object(object(ObjectKind::Fruit, Vec2::new(-(OBJECT_RADIUS - 0.01), 0.0)));
    let report = session.tick(&cut_at(116.0, Vec2::ZERO));
    assert_eq!(report.sounds, vec![SoundEvent::Fruit]);
    assert_eq!(session.objects().count(), 1);
}

#[test]
fn menu_rebuild_is_idempotent() {
    let mut store = MemoryStore::new();
    store.set(HistoryScores::STORAGE_KEY, "[5]");
    let mut session = session_with(store);

    let first: Vec<_> = session.ui_elements().cloned().collect();
    session.build_menu_ui();
    session.build_menu_ui();
    let again: Vec<_> = session.ui_elements().cloned().collect();

    assert_eq!(first, again);
    assert_eq!(again.len(), 3);
}

#[test]
fn staggered_spawns_survive_game_over() {
    let mut session = session_with(MemoryStore::new());
    start_run(&mut session);

    // 10 + 14 + 16 + 18 + 20 + 22: two objects per batch from here
    for i in 0..6 {
        slice(&mut session, ObjectKind::Fruit, 100.0 + i as f64 * 16.0);
    }
    assert_eq!(session.scoring().raw_score(), 100);

    // Idle until the first batch is queued
    let mut now = 200.0;
    while session.spawner().interval() == INITIAL_SPAWN_RATE {
        now += 16.0;
        session.tick(&TickInput {
            now_ms: now,
            ..Default::default()
        });
    }

    // First object launches at the start of this tick, then the bomb ends the run
    now += 16.0;
    slice(&mut session, ObjectKind::Bomb, now);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.objects().count(), 1);

    // The second object of the batch still arrives
    let report = session.tick(&TickInput {
        now_ms: now + 500.0,
        ..Default::default()
    });
    assert_eq!(report.spawned, 1);
    assert_eq!(session.objects().count(), 2);
}

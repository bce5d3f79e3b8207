//! Game phases and entity types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::renderer::TextureKey;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start button to be sliced
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for the restart button
    GameOver,
}

/// What a spawned object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Fruit,
    Poop,
    Bomb,
}

/// Fruit glyphs, picked uniformly
pub const FRUIT_GLYPHS: [&str; 9] = ["🍉", "🍊", "🍎", "🍌", "🥥", "🍍", "🥝", "🍓", "🍑"];
pub const POOP_GLYPH: &str = "💩";
pub const BOMB_GLYPH: &str = "💣";

impl ObjectKind {
    /// Weighted pick from a uniform draw in [0, 1): 15% bomb, 15% poop, 70% fruit
    pub fn from_roll(r: f32) -> Self {
        if r < 0.15 {
            ObjectKind::Bomb
        } else if r < 0.3 {
            ObjectKind::Poop
        } else {
            ObjectKind::Fruit
        }
    }
}

/// A launched object
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub glyph: &'static str,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current sprite rotation (radians)
    pub rotation: f32,
    /// Rotation added every tick (radians)
    pub rotation_speed: f32,
    /// Collision threshold around `pos`
    pub radius: f32,
    pub active: bool,
}

/// Role of a UI element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiTag {
    Start,
    Restart,
    Static,
}

/// Menu decoration: title, button or text
#[derive(Debug, Clone, PartialEq)]
pub struct UiElement {
    pub tag: UiTag,
    pub texture: TextureKey,
    pub pos: Vec2,
    pub scale: Vec2,
    /// Only interactive elements can be sliced
    pub hit_radius: Option<f32>,
}

impl UiElement {
    pub fn text(text: impl Into<String>, color: &'static str, font_size: u32, y: f32) -> Self {
        Self {
            tag: UiTag::Static,
            texture: TextureKey::Text {
                text: text.into(),
                color,
                font_size,
            },
            pos: Vec2::new(0.0, y),
            scale: Vec2::new(6.0, 1.5),
            hit_radius: None,
        }
    }

    pub fn button(tag: UiTag, glyph: &'static str) -> Self {
        Self {
            tag,
            texture: TextureKey::Emoji(glyph),
            pos: Vec2::ZERO,
            scale: Vec2::splat(BUTTON_SCALE),
            hit_radius: Some(BUTTON_RADIUS),
        }
    }
}

/// Anything living in the scene
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Ui(UiElement),
    Physical(GameObject),
}

impl Entity {
    pub fn position(&self) -> Vec2 {
        match self {
            Entity::Ui(ui) => ui.pos,
            Entity::Physical(obj) => obj.pos,
        }
    }

    /// Radius the blade tip must get within, `None` if it cannot be sliced right now
    pub fn hit_radius(&self) -> Option<f32> {
        match self {
            Entity::Ui(ui) => ui.hit_radius,
            Entity::Physical(obj) if obj.active => Some(obj.radius),
            Entity::Physical(_) => None,
        }
    }

    pub fn is_ui(&self) -> bool {
        matches!(self, Entity::Ui(_))
    }
}

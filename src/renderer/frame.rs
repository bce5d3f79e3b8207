//! Per-frame snapshot handed to the drawing backend
//!
//! The renderer only draws what is in here; it holds no game logic.

use glam::Vec2;
use serde::Serialize;

use super::vertex::as_floats;
use super::{TextureKey, Vertex};
use crate::sim::GamePhase;

/// One textured quad
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub texture: TextureKey,
}

/// Everything visible this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub phase: GamePhase,
    /// Blade ribbon as a triangle strip (two vertices per path point)
    pub ribbon: Vec<Vertex>,
    pub sprites: Vec<Sprite>,
    /// Score as displayed (never negative)
    pub score: u64,
    pub combo_message: Option<String>,
    /// Hand skeleton polylines in normalized frame coordinates
    pub skeleton: Vec<Vec<Vec2>>,
}

impl RenderFrame {
    /// Ribbon as interleaved `x, y, r, g, b, a` floats, ready for a vertex buffer
    pub fn ribbon_floats(&self) -> &[f32] {
        as_floats(&self.ribbon)
    }
}

/// The drawing backend
pub trait Renderer {
    fn draw(&mut self, frame: &RenderFrame);

    /// Release GPU resources
    fn dispose(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{CutSignal, GameSession, TickInput};
    use crate::{PlayField, Settings};

    #[test]
    fn test_ribbon_floats_follow_blade() {
        let mut session = GameSession::new(
            Settings::default(),
            PlayField::from_viewport(1000.0, 1000.0),
            5,
            Box::new(MemoryStore::new()),
        );
        for (i, x) in [0.2, 0.25, 0.3].into_iter().enumerate() {
            session.tick(&TickInput {
                now_ms: i as f64 * 16.0,
                cut: CutSignal::Point(Vec2::new(x, 0.2)),
                overlay: None,
            });
        }

        let frame = session.render_frame();
        let floats = frame.ribbon_floats();
        assert_eq!(floats.len(), frame.ribbon.len() * Vertex::FLOATS);
        // Middle point of a three-point stroke is full width; the stroke runs
        // toward -x so the first vertex sits below the path
        let middle = &floats[2 * Vertex::FLOATS..3 * Vertex::FLOATS];
        assert_eq!(middle[..2], frame.ribbon[2].position);
        assert!((middle[0] + 5.0).abs() < 1e-4);
        assert!((middle[1] + 6.6).abs() < 1e-4);
    }
}

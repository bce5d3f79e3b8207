//! Blade trail
//!
//! A bounded, newest-first path of world-space cut points and the tapered
//! ribbon mesh derived from it. The ribbon is purely visual; collision only
//! looks at the tip.

use std::f32::consts::PI;

use glam::Vec2;

use crate::renderer::{Vertex, colors};

/// Gesture path plus its ribbon vertex buffer
#[derive(Debug, Clone)]
pub struct BladeTrail {
    /// Newest point first
    path: Vec<Vec2>,
    max_len: usize,
    base_width: f32,
    /// Fixed capacity: two vertices per path slot
    ribbon: Vec<Vertex>,
}

impl BladeTrail {
    pub fn new(max_len: usize, base_width: f32) -> Self {
        let max_len = max_len.max(2);
        Self {
            path: Vec::with_capacity(max_len + 1),
            max_len,
            base_width,
            ribbon: vec![Vertex::default(); max_len * 2],
        }
    }

    /// Add the newest cut point, dropping the oldest past the length limit
    pub fn push(&mut self, point: Vec2) {
        self.path.insert(0, point);
        if self.path.len() > self.max_len {
            self.path.pop();
        }
        self.rebuild();
    }

    /// Drop the two oldest points. Returns false if there was nothing to drop.
    pub fn decay(&mut self) -> bool {
        if self.path.is_empty() {
            return false;
        }
        self.path.pop();
        self.path.pop();
        self.rebuild();
        true
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.rebuild();
    }

    /// Most recent cut point
    #[inline]
    pub fn tip(&self) -> Option<Vec2> {
        self.path.first().copied()
    }

    #[inline]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Current ribbon as a triangle strip
    #[inline]
    pub fn ribbon(&self) -> &[Vertex] {
        &self.ribbon
    }

    fn rebuild(&mut self) {
        build_ribbon(&self.path, self.base_width, &mut self.ribbon);
    }
}

/// Write the tapered ribbon for `path` into `out`.
///
/// Each point gets two vertices offset along the segment normal. The width
/// follows `sin(progress * PI)`, so both ends collapse onto the path and the
/// middle is widest. Slots past the path repeat the last vertex; a path of
/// fewer than two points zeroes the whole buffer.
pub fn build_ribbon(path: &[Vec2], base_width: f32, out: &mut [Vertex]) {
    let len = path.len().min(out.len() / 2);
    if len < 2 {
        out.fill(Vertex::default());
        return;
    }

    for i in 0..len {
        let p = path[i];
        // Last point reuses the direction of the segment leading into it
        let dir = if i + 1 < len {
            (path[i + 1] - p).normalize_or_zero()
        } else {
            (p - path[i - 1]).normalize_or_zero()
        };
        let normal = Vec2::new(-dir.y, dir.x);

        let progress = i as f32 / (len - 1) as f32;
        let half_width = base_width * (progress * PI).sin() / 2.0;
        let (a, b) = (p + normal * half_width, p - normal * half_width);

        out[2 * i] = Vertex::new(a.x, a.y, colors::BLADE);
        out[2 * i + 1] = Vertex::new(b.x, b.y, colors::BLADE);
    }

    let last = out[2 * len - 1];
    out[2 * len..].fill(last);
}

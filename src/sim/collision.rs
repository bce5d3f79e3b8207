//! Blade tip vs. entity hit testing

use glam::Vec2;

use super::state::Entity;

/// Whether `tip` is strictly inside `entity`'s hit radius
#[inline]
pub fn is_hit(tip: Vec2, entity: &Entity) -> bool {
    entity
        .hit_radius()
        .is_some_and(|radius| tip.distance(entity.position()) < radius)
}

/// Indices of every entity the tip slices, newest (highest index) first.
///
/// Descending order lets the caller remove each hit in turn without
/// invalidating the indices still to come.
pub fn find_slices(tip: Vec2, entities: &[Entity]) -> Vec<usize> {
    entities
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, e)| is_hit(tip, e))
        .map(|(i, _)| i)
        .collect()
}

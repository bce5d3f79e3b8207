//! Projectile integration
//!
//! One step per tick: gravity into velocity, velocity into position, then
//! spin. Objects never interact with each other.

use super::state::{Entity, GameObject};
use crate::consts::CULL_Y;

/// Advance one object by one tick. `gravity` is signed (negative is down).
#[inline]
pub fn integrate(obj: &mut GameObject, gravity: f32) {
    obj.vel.y += gravity;
    obj.pos += obj.vel;
    obj.rotation += obj.rotation_speed;
}

/// Integrate every physical entity and drop the ones that fell off screen.
/// Returns how many were culled.
pub fn step(entities: &mut Vec<Entity>, gravity: f32) -> usize {
    for entity in entities.iter_mut() {
        if let Entity::Physical(obj) = entity {
            integrate(obj, gravity);
        }
    }

    let before = entities.len();
    entities.retain(|e| match e {
        Entity::Physical(obj) => obj.pos.y >= CULL_Y,
        Entity::Ui(_) => true,
    });
    before - entities.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayField;
    use crate::sim::spawn::plan_launch;
    use crate::sim::state::{FRUIT_GLYPHS, ObjectKind, UiElement};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn object(pos: Vec2, vel: Vec2) -> GameObject {
        GameObject {
            id: 0,
            kind: ObjectKind::Fruit,
            glyph: FRUIT_GLYPHS[0],
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.1,
            radius: 2.5,
            active: true,
        }
    }

    #[test]
    fn test_velocity_updates_before_position() {
        let mut obj = object(Vec2::ZERO, Vec2::new(1.0, 0.0));
        integrate(&mut obj, -0.5);
        assert_eq!(obj.vel, Vec2::new(1.0, -0.5));
        assert_eq!(obj.pos, Vec2::new(1.0, -0.5));
        assert!((obj.rotation - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_cull_below_threshold_keeps_ui() {
        let mut entities = vec![
            Entity::Physical(object(Vec2::new(0.0, -14.9), Vec2::new(0.0, -0.2))),
            Entity::Physical(object(Vec2::new(0.0, 0.0), Vec2::ZERO)),
            Entity::Ui(UiElement::text("Game Over", "#fff", 80, 4.0)),
        ];
        assert_eq!(step(&mut entities, -0.015), 1);
        assert_eq!(entities.len(), 2);
        assert!(entities[1].is_ui());
    }

    #[test]
    fn test_launched_object_peaks_near_target() {
        let field = PlayField::from_viewport(1280.0, 720.0);
        let mut rng = Pcg32::seed_from_u64(11);
        let launch = plan_launch(&field, 0.015, &mut rng);

        let mut obj = object(launch.pos, launch.vel);
        let mut peak = obj.pos.y;
        while obj.vel.y > 0.0 {
            integrate(&mut obj, -0.015);
            peak = peak.max(obj.pos.y);
        }

        // Discrete steps undershoot the continuous apex by under one tick of travel
        let expected = launch.pos.y + launch.apex_height;
        assert!(peak <= expected + 1e-3);
        assert!(peak >= expected - launch.vel.y);
        assert!(peak > field.bottom() && peak < field.top());
    }
}

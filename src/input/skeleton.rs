//! Hand skeleton overlay for the camera preview

use glam::Vec2;

use super::Detection;

/// Finger chains from the wrist: thumb, index, middle, ring, pinky
pub const HAND_CHAINS: [[usize; 5]; 5] = [
    [0, 1, 2, 3, 4],
    [0, 5, 6, 7, 8],
    [0, 9, 10, 11, 12],
    [0, 13, 14, 15, 16],
    [0, 17, 18, 19, 20],
];

/// One polyline per finger chain per hand, in normalized (unmirrored) frame coordinates.
/// Chains with missing landmarks are skipped.
pub fn skeleton_polylines(detection: &Detection) -> Vec<Vec<Vec2>> {
    let mut lines = Vec::with_capacity(detection.hands.len() * HAND_CHAINS.len());
    for hand in &detection.hands {
        for chain in &HAND_CHAINS {
            let line: Option<Vec<Vec2>> = chain
                .iter()
                .map(|&i| hand.points.get(i).map(|p| Vec2::new(p.x, p.y)))
                .collect();
            if let Some(line) = line {
                lines.push(line);
            }
        }
    }
    lines
}

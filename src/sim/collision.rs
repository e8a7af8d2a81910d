//! Axis-aligned bounding box collision
//!
//! Discrete end-of-tick overlap only. A fast bullet can step over a thin
//! target between ticks.

use super::entity::{Aabb, Entity};

/// Two rectangles overlap unless separated on either axis.
/// Touching edges count as overlapping.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn check_box_collision(
    x1: f32,
    y1: f32,
    w1: f32,
    h1: f32,
    x2: f32,
    y2: f32,
    w2: f32,
    h2: f32,
) -> bool {
    !(y1 + h1 < y2 || y1 > y2 + h2 || x1 + w1 < x2 || x1 > x2 + w2)
}

/// Overlap test between two boxes
#[inline]
pub fn boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
    check_box_collision(a.x, a.y, a.width, a.height, b.x, b.y, b.width, b.height)
}

/// Overlap test between two live entities; destroyed entities never collide
pub fn entities_collide(a: &Entity, b: &Entity) -> bool {
    if a.destroyed || b.destroyed {
        return false;
    }
    boxes_overlap(&a.aabb(), &b.aabb())
}

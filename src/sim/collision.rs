//! Axis-aligned bounding box collision
//!
//! Every entity in the play field is an upright rectangle anchored at its
//! top-left corner, with y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left position + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Grow the rectangle by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            pos: self.pos - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }

    /// Strict overlap test: rectangles that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// Strict AABB intersection on both axes
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_overlaps_player() {
        let obstacle = Rect::new(100.0, 590.0, 40.0, 40.0);
        let player = Rect::new(90.0, 600.0, 60.0, 60.0);
        assert!(obstacle.overlaps(&player));
        assert!(player.overlaps(&obstacle));
    }

    #[test]
    fn test_projectile_overlaps_obstacle() {
        let projectile = Rect::new(95.0, 300.0, 10.0, 20.0);
        let obstacle = Rect::new(90.0, 290.0, 40.0, 40.0);
        assert!(aabb_overlap(&projectile, &obstacle));
    }

    #[test]
    fn test_shared_edge_is_not_a_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Touching on the right edge
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        // Touching on the bottom edge
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        // Touching only at a corner
        assert!(!a.overlaps(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        // A sliver of overlap does collide
        assert!(a.overlaps(&Rect::new(9.5, 9.5, 5.0, 5.0)));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(5.0, 50.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(50.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(10.0, 20.0, 60.0, 60.0).inflate(5.0);
        assert_eq!(r, Rect::new(5.0, 15.0, 70.0, 70.0));
    }
}

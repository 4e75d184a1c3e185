//! Collision geometry for the arena
//!
//! Entities are axis-aligned rectangles (top-left corner + size), projectiles
//! are circles. All overlap tests used by combat live here.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Axis-aligned rectangle, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self { pos, width, height }
    }

    /// Center point of the rectangle
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Check overlap between two rectangles
///
/// Half-open on both axes: rectangles that only share an edge do not overlap.
pub fn rect_intersect(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.pos.x + b.width
        && a.pos.x + a.width > b.pos.x
        && a.pos.y < b.pos.y + b.height
        && a.pos.y + a.height > b.pos.y
}

/// Check overlap between a circle and a rectangle
///
/// Clamps the circle center onto the rectangle to find the nearest point,
/// then compares squared distances (touching counts as a hit).
pub fn circle_rect_intersect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = Vec2::new(
        center.x.clamp(rect.pos.x, rect.pos.x + rect.width),
        center.y.clamp(rect.pos.y, rect.pos.y + rect.height),
    );
    (center - nearest).length_squared() <= radius * radius
}

/// Clamp a top-left position so a `width` x `height` box stays inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (ARENA_WIDTH - width).max(0.0)),
        pos.y.clamp(0.0, (ARENA_HEIGHT - height).max(0.0)),
    )
}

/// True if a point has left the arena
#[inline]
pub fn outside_arena(point: Vec2) -> bool {
    point.x < 0.0 || point.x > ARENA_WIDTH || point.y < 0.0 || point.y > ARENA_HEIGHT
}

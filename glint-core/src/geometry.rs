//! Geometry primitives.
//!
//! All screen-space geometry uses a top-left origin with `y` growing
//! downwards.  `Rect` is float-valued and used for layout, clipping and
//! texture coordinates; `PixelRect` is integer-valued and used for atlas
//! placements and dirty regions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// ── Vec2 ────────────────────────────────────────────────────────────

/// A 2D point or displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise product.
    pub fn scale(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise quotient.
    pub fn div_by(self, other: Self) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<Size> for Vec2 {
    fn from(s: Size) -> Self {
        Self::new(s.width, s.height)
    }
}

// ── Size ────────────────────────────────────────────────────────────

/// Width and height of a laid-out item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ── Rect ────────────────────────────────────────────────────────────

/// Axis-aligned float rectangle spanning `[min, max)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from a top-left corner and a size.
    pub fn from_pos_size(pos: Vec2, size: Size) -> Self {
        Self::new(pos, pos + Vec2::from(size))
    }

    /// Rectangle from raw coordinates.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + w, y + h))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// `true` when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlap of `self` and `other`.
    ///
    /// Disjoint inputs produce a degenerate rectangle with `max == min`
    /// on the disjoint axis; the result is never inverted.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max).max(min);
        Rect::new(min, max)
    }

    /// Half-open point test: `min <= p < max`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// `true` when the two rectangles share some area.  Touching edges
    /// do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.min.x >= other.max.x
            || self.max.x <= other.min.x
            || self.min.y >= other.max.y
            || self.max.y <= other.min.y)
    }

    /// Rectangle moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.min + offset, self.max + offset)
    }

    /// Move so the top-left corner lands on `pos`, keeping the size.
    pub fn move_min(&mut self, pos: Vec2) {
        let size = self.max - self.min;
        self.min = pos;
        self.max = pos + size;
    }

    /// Move so the bottom-right corner lands on `pos`, keeping the size.
    pub fn move_max(&mut self, pos: Vec2) {
        let size = self.max - self.min;
        self.max = pos;
        self.min = pos - size;
    }
}

// ── PixelRect ───────────────────────────────────────────────────────

/// Integer rectangle in pixels, used for atlas placements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bounding box of both rectangles.  Empty rectangles are ignored.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        PixelRect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// `true` when the rectangles share at least one pixel.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_length() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_intersection_clamps_disjoint() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(20.0, 20.0, 5.0, 5.0);
        let r = a.intersection(&b);
        assert!(r.max.x >= r.min.x && r.max.y >= r.min.y);
        assert!(r.is_empty());
    }

    #[test]
    fn test_intersection_overlap() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(5.0, 2.0, 10.0, 4.0);
        assert_eq!(a.intersection(&b), Rect::from_xywh(5.0, 2.0, 5.0, 4.0));
    }

    #[test]
    fn test_union() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(20.0, -5.0, 5.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(Vec2::new(0.0, -5.0), Vec2::new(25.0, 10.0)));
    }

    #[test]
    fn test_contains_half_open() {
        let r = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.9, 9.9)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.0)));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::from_xywh(9.0, 9.0, 2.0, 2.0)));
    }

    #[test]
    fn test_translate_and_center() {
        let r = Rect::from_xywh(0.0, 0.0, 10.0, 20.0).translated(Vec2::new(5.0, 5.0));
        assert_eq!(r.min, Vec2::new(5.0, 5.0));
        assert_eq!(r.center(), Vec2::new(10.0, 15.0));
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 20.0);
    }

    #[test]
    fn test_move_min_max() {
        let mut r = Rect::from_xywh(0.0, 0.0, 4.0, 2.0);
        r.move_min(Vec2::new(10.0, 10.0));
        assert_eq!(r, Rect::from_xywh(10.0, 10.0, 4.0, 2.0));
        r.move_max(Vec2::new(4.0, 2.0));
        assert_eq!(r, Rect::from_xywh(0.0, 0.0, 4.0, 2.0));
    }

    #[test]
    fn test_pixel_rect_union_skips_empty() {
        let a = PixelRect::new(3, 4, 0, 0);
        let b = PixelRect::new(10, 10, 5, 5);
        assert_eq!(a.union(&b), b);
        let c = PixelRect::new(0, 0, 2, 2);
        assert_eq!(b.union(&c), PixelRect::new(0, 0, 15, 15));
    }

    #[test]
    fn test_pixel_rect_intersects() {
        let a = PixelRect::new(0, 0, 10, 10);
        assert!(a.intersects(&PixelRect::new(9, 9, 1, 1)));
        assert!(!a.intersects(&PixelRect::new(10, 0, 5, 5)));
        assert!(!a.intersects(&PixelRect::new(2, 2, 0, 0)));
    }
}

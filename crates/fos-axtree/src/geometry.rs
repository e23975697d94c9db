//! Geometry
//!
//! Float rectangles for tree-relative bounds and integer rectangles for
//! platform-facing results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangle in float coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    /// Zero-sized rect at the origin
    pub const ZERO: Self = Self::from_xywh(0.0, 0.0, 0.0, 0.0);

    /// Create with dimensions
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when either dimension is zero or negative
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when both dimensions are zero (an uninitialised rect)
    pub fn is_zero_sized(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Translate by a delta
    pub fn offset(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Translated copy
    pub fn offset_by(mut self, dx: f32, dy: f32) -> Self {
        self.offset(dx, dy);
        self
    }

    /// Check if point is inside (right and bottom edges exclusive)
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest rect containing both. Empty rects do not contribute.
    pub fn union(&self, other: &RectF) -> RectF {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        RectF::from_xywh(x, y, right - x, bottom - y)
    }

    /// Overlapping area, or a zero rect when the rects do not overlap
    pub fn intersect(&self, other: &RectF) -> RectF {
        if self.is_empty() || other.is_empty() {
            return RectF::ZERO;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return RectF::ZERO;
        }
        RectF::from_xywh(x, y, right - x, bottom - y)
    }

    /// Smallest integer rect that contains this one
    pub fn to_enclosing_rect(&self) -> Rect {
        let x = self.x.floor();
        let y = self.y.floor();
        let right = self.right().ceil();
        let bottom = self.bottom().ceil();
        Rect::from_xywh(x as i32, y as i32, (right - x) as i32, (bottom - y) as i32)
    }
}

impl fmt::Display for RectF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x, self.y, self.width, self.height)
    }
}

impl From<Rect> for RectF {
    fn from(rect: Rect) -> Self {
        RectF::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
    }
}

/// Rectangle in integer (pixel) coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest rect containing both. Empty rects do not contribute.
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::from_xywh(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})-({}, {})", self.x, self.y, self.width, self.height)
    }
}

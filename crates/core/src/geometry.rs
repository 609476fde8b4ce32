//! Axis-aligned rectangles in texture or visual space.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (`left`, `top`, `width`, `height`).
///
/// An empty rectangle has negative size; unioning a point into it yields a
/// zero-size rectangle at that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum x.
    pub left: f64,
    /// Minimum y.
    pub top: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Rect {
    /// The empty rectangle, identity for [`Rect::union_point`].
    pub const EMPTY: Self = Self {
        left: f64::INFINITY,
        top: f64::INFINITY,
        width: f64::NEG_INFINITY,
        height: f64::NEG_INFINITY,
    };

    /// Create a rectangle from its top-left corner and size.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Smallest rectangle containing every point.
    pub fn from_points<I: IntoIterator<Item = DVec2>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |rect, point| rect.union_point(point))
    }

    /// Grow to include `point`.
    pub fn union_point(self, point: DVec2) -> Self {
        if self.is_empty() {
            return Self::new(point.x, point.y, 0.0, 0.0);
        }
        let left = self.left.min(point.x);
        let top = self.top.min(point.y);
        let right = self.right().max(point.x);
        let bottom = self.bottom().max(point.y);
        Self::new(left, top, right - left, bottom - top)
    }

    /// True when no point has been added.
    pub fn is_empty(&self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    /// True when the rectangle cannot be used as a mapping domain.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }

    /// Maximum x.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Maximum y.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left, self.top),
            DVec2::new(self.right(), self.top),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.left, self.bottom()),
        ]
    }

    /// Inclusive overlap test; touching rectangles intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.left <= self.right()
            && other.right() >= self.left
            && other.top <= self.bottom()
            && other.bottom() >= self.top
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_starts_from_first_point() {
        let rect = Rect::from_points([DVec2::new(2.0, 3.0), DVec2::new(-1.0, 5.0)]);
        assert_eq!(rect, Rect::new(-1.0, 3.0, 3.0, 2.0));
        assert!(Rect::EMPTY.is_empty());
        assert!(!rect.is_empty());
    }

    #[test]
    fn touching_rectangles_intersect() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 1.0, 1.0, 1.0);
        let c = Rect::new(1.5, 0.0, 1.0, 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&Rect::EMPTY));
    }

    #[test]
    fn degenerate_detection() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, f64::INFINITY).is_degenerate());
        assert!(!Rect::new(-5.0, 2.0, 10.0, 4.0).is_degenerate());
    }
}

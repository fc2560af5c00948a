//! Planar bounds for grid queries

use crate::point::WorldPoint;

/// Axis-aligned rectangle on the ground plane.
///
/// All containment and intersection tests are inclusive: touching edges count.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect2 {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect2 {
    /// Create an empty (inverted) rectangle
    pub const EMPTY: Self = Self {
        min_x: f32::MAX,
        min_y: f32::MAX,
        max_x: f32::MIN,
        max_y: f32::MIN,
    };

    #[inline]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Create from two arbitrary corners, ordering them
    #[inline]
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Square of half-size `radius` around a point
    #[inline]
    pub fn around(x: f32, y: f32, radius: f32) -> Self {
        let r = radius.abs();
        Self::new(x - r, y - r, x + r, y + r)
    }

    /// Ground-plane bounds of a set of points
    pub fn from_points(points: &[WorldPoint]) -> Self {
        points
            .iter()
            .fold(Self::EMPTY, |rect, p| rect.expand_to_include(p.x, p.y))
    }

    #[inline]
    pub fn expand_to_include(self, x: f32, y: f32) -> Self {
        Self::new(
            self.min_x.min(x),
            self.min_y.min(y),
            self.max_x.max(x),
            self.max_y.max(y),
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        ((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    #[inline]
    pub fn intersects(&self, other: &Rect2) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_intersect() {
        let a = Rect2::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect2::new(2.0, 0.0, 4.0, 2.0);
        assert!(a.intersects(&b));

        let c = Rect2::new(2.01, 0.0, 4.0, 2.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_from_points() {
        let rect = Rect2::from_points(&[
            WorldPoint::new(1.0, 5.0, 0.0),
            WorldPoint::new(-2.0, 3.0, 9.0),
            WorldPoint::new(0.0, 7.0, -1.0),
        ]);
        assert_eq!(rect, Rect2::new(-2.0, 3.0, 1.0, 7.0));
        assert!(Rect2::EMPTY.is_empty());
    }

    #[test]
    fn test_from_corners_orders() {
        let rect = Rect2::from_corners(4.0, -1.0, 1.0, 3.0);
        assert_eq!(rect, Rect2::new(1.0, -1.0, 4.0, 3.0));
        assert!(rect.contains_point(4.0, 3.0));
    }
}
